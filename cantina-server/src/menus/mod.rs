//! Daily Menu Lifecycle Module
//!
//! Owns the menu state machine:
//!
//! ```text
//!           publish              lock
//!   DRAFT ──────────► PUBLISHED ──────► LOCKED
//!     ▲                  │  ▲              │
//!     └──── unpublish ───┘  └─── unlock ───┘
//! ```
//!
//! No other edge is reachable. Composition (packs, services, variant
//! activations) is additive by design: packs can never be removed once
//! added, and variants can only be removed while the menu is a
//! never-published draft.

mod manager;

pub use manager::MenuManager;
