//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod component;
pub mod pack;
pub mod service;
pub mod variant;

// Lifecycle
pub mod daily_menu;
pub mod day_lock;
pub mod invoice;
pub mod order;

// Re-exports
pub use component::{Component, ComponentCreate, ComponentUpdate};
pub use daily_menu::{DailyMenu, MenuPack, MenuService, MenuStatus, MenuVariant};
pub use day_lock::DayLock;
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use order::{Order, OrderItem, OrderStatus, OrderToken};
pub use pack::{Pack, PackComponent, PackCreate, PackUpdate};
pub use service::{Service, ServiceCreate, ServiceUpdate};
pub use variant::{Variant, VariantCreate, VariantUpdate};
