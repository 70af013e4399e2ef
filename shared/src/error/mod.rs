//! Unified error system for the Cantina platform
//!
//! This module provides the error handling building blocks shared by the
//! server and its clients:
//! - [`ErrorCode`]: Standardized numeric error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Identity errors
//! - 2xxx: Daily menu errors
//! - 3xxx: Order errors
//! - 4xxx: Day lock errors
//! - 5xxx: Invoice errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::MenuNotFound);
//!
//! // Create an error with custom message
//! let err = AppError::with_message(ErrorCode::OutOfStock, "No stock left for this variant");
//!
//! // Create an error with details
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "order_date");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
