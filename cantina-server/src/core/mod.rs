//! Core module - 配置、状态、服务器

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::{DateLocks, ServerState};
