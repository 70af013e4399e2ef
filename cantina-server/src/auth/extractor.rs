//! Identity Extractor
//!
//! Custom extractor resolving the gateway-injected identity headers into a
//! typed caller.

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;
use shared::types::Role;
use shared::AppError;

use super::{HEADER_BUSINESS_ID, HEADER_EMPLOYEE_ID, HEADER_ROLE};

/// The resolved caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub employee_id: String,
    /// Absent for operators not tied to a client business
    pub business_id: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    /// Resolve identity from request headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let employee_id = headers
            .get(HEADER_EMPLOYEE_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(AppError::not_authenticated)?;

        let business_id = headers
            .get(HEADER_BUSINESS_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let role = headers
            .get(HEADER_ROLE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("employee")
            .parse::<Role>()
            .map_err(AppError::permission_denied)?;

        Ok(Self {
            employee_id,
            business_id,
            role,
        })
    }

    /// The caller's business id, required for ordering
    pub fn require_business(&self) -> Result<&str, AppError> {
        self.business_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Caller has no business"))
    }

    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = Self::from_headers(&parts.headers)?;

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
