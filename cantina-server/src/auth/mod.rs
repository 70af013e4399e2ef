//! Caller identity resolution
//!
//! Session issuance lives in the upstream identity gateway; every request
//! reaches this server with `x-employee-id`, `x-business-id` and `x-role`
//! headers already resolved. This module turns them into a [`CurrentUser`]
//! and guards operator-only routes.

mod extractor;
mod middleware;

pub use extractor::CurrentUser;
pub use middleware::require_operator;

/// Identity header names injected by the gateway
pub const HEADER_EMPLOYEE_ID: &str = "x-employee-id";
pub const HEADER_BUSINESS_ID: &str = "x-business-id";
pub const HEADER_ROLE: &str = "x-role";
