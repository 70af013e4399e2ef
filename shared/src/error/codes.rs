//! Unified error codes for the Cantina platform
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Identity errors
//! - 2xxx: Daily menu errors
//! - 3xxx: Order errors
//! - 4xxx: Day lock errors
//! - 5xxx: Invoice errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (date, time, id)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Identity ====================
    /// Caller identity headers are missing
    NotAuthenticated = 1001,
    /// Permission denied
    PermissionDenied = 1002,
    /// Specific role required
    RoleRequired = 1003,

    // ==================== 2xxx: Daily Menu ====================
    /// Daily menu not found
    MenuNotFound = 2001,
    /// A menu already exists for that date
    MenuAlreadyExists = 2002,
    /// Menu has no packs attached
    MenuHasNoPacks = 2003,
    /// Operation not valid for the menu's current status
    ConflictingState = 2004,
    /// Menu cannot be locked before its cutoff time
    CutoffNotReached = 2005,
    /// Packs cannot be removed from a menu once added
    PackRemovalNotAllowed = 2006,
    /// Variants can only be removed while the menu is an unpublished draft
    VariantRemovalNotAllowed = 2007,
    /// Menu has orders and deletion was not forced
    MenuDeleteHasOrders = 2008,

    // ==================== 3xxx: Order ====================
    /// Order not found
    OrderNotFound = 3001,
    /// Ordering is closed for the date
    OrderingClosed = 3002,
    /// Employee already has an order for the date
    DuplicateOrder = 3003,
    /// Variant has no remaining stock for the date
    OutOfStock = 3004,
    /// Pack is not on the menu for the date
    PackNotOnMenu = 3005,
    /// A required component has no variant selected
    MissingRequiredComponent = 3006,
    /// Selected variant is not activated on the menu for the date
    VariantNotOnMenu = 3007,
    /// Order can no longer be cancelled
    OrderNotCancellable = 3008,

    // ==================== 4xxx: Day Lock ====================
    /// The date has already been locked
    DayAlreadyLocked = 4001,
    /// No day record exists for the date
    DayNotFound = 4002,

    // ==================== 5xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 5001,
    /// The period overlaps an already-invoiced period for the business
    PeriodAlreadyInvoiced = 5002,
    /// No locked, un-invoiced orders matched the request
    NoOrdersToInvoice = 5003,
    /// Invoice is not in the ISSUED status
    InvoiceNotIssued = 5004,

    // ==================== 6xxx: Catalog ====================
    /// Component not found
    ComponentNotFound = 6001,
    /// Component name already exists
    ComponentNameExists = 6002,
    /// Variant not found
    VariantNotFound = 6101,
    /// Variant is referenced by orders and cannot be deleted
    VariantReferencedByOrders = 6102,
    /// Variant name already exists within the component
    VariantNameExists = 6103,
    /// Pack not found
    PackNotFound = 6201,
    /// Pack name already exists
    PackNameExists = 6202,
    /// Service not found
    ServiceNotFound = 6301,
    /// Service name already exists
    ServiceNameExists = 6302,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Caller identity required",
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",

            Self::MenuNotFound => "Daily menu not found",
            Self::MenuAlreadyExists => "A menu already exists for this date",
            Self::MenuHasNoPacks => "Menu has no packs attached",
            Self::ConflictingState => "Operation not valid for current status",
            Self::CutoffNotReached => "Cutoff time not reached",
            Self::PackRemovalNotAllowed => "Packs cannot be removed once added",
            Self::VariantRemovalNotAllowed => {
                "Variants can only be removed from an unpublished draft"
            }
            Self::MenuDeleteHasOrders => "Menu has orders; deletion must be forced",

            Self::OrderNotFound => "Order not found",
            Self::OrderingClosed => "Ordering is closed for this date",
            Self::DuplicateOrder => "An order already exists for this date",
            Self::OutOfStock => "Variant is out of stock",
            Self::PackNotOnMenu => "Pack is not on the menu for this date",
            Self::MissingRequiredComponent => "A required component has no selection",
            Self::VariantNotOnMenu => "Variant is not activated for this date",
            Self::OrderNotCancellable => "Order can no longer be cancelled",

            Self::DayAlreadyLocked => "Date has already been locked",
            Self::DayNotFound => "No day record for this date",

            Self::InvoiceNotFound => "Invoice not found",
            Self::PeriodAlreadyInvoiced => "Period overlaps an existing invoice",
            Self::NoOrdersToInvoice => "No orders to invoice",
            Self::InvoiceNotIssued => "Invoice is not issued",

            Self::ComponentNotFound => "Component not found",
            Self::ComponentNameExists => "Component name already exists",
            Self::VariantNotFound => "Variant not found",
            Self::VariantReferencedByOrders => "Variant is referenced by orders",
            Self::VariantNameExists => "Variant name already exists",
            Self::PackNotFound => "Pack not found",
            Self::PackNameExists => "Pack name already exists",
            Self::ServiceNotFound => "Service not found",
            Self::ServiceNameExists => "Service name already exists",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::Success => StatusCode::OK,

            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,

            Self::NotFound
            | Self::MenuNotFound
            | Self::OrderNotFound
            | Self::DayNotFound
            | Self::InvoiceNotFound
            | Self::ComponentNotFound
            | Self::VariantNotFound
            | Self::PackNotFound
            | Self::ServiceNotFound => StatusCode::NOT_FOUND,

            // Time- and stock-gated rejections
            Self::CutoffNotReached | Self::OrderingClosed | Self::OutOfStock => {
                StatusCode::PRECONDITION_FAILED
            }

            // Selections that cannot be satisfied by the menu as composed
            Self::MenuHasNoPacks
            | Self::PackNotOnMenu
            | Self::MissingRequiredComponent
            | Self::VariantNotOnMenu => StatusCode::UNPROCESSABLE_ENTITY,

            Self::AlreadyExists
            | Self::MenuAlreadyExists
            | Self::ConflictingState
            | Self::PackRemovalNotAllowed
            | Self::VariantRemovalNotAllowed
            | Self::MenuDeleteHasOrders
            | Self::DuplicateOrder
            | Self::OrderNotCancellable
            | Self::DayAlreadyLocked
            | Self::PeriodAlreadyInvoiced
            | Self::NoOrdersToInvoice
            | Self::InvoiceNotIssued
            | Self::ComponentNameExists
            | Self::VariantReferencedByOrders
            | Self::VariantNameExists
            | Self::PackNameExists
            | Self::ServiceNameExists => StatusCode::CONFLICT,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 value does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            1001 => Self::NotAuthenticated,
            1002 => Self::PermissionDenied,
            1003 => Self::RoleRequired,

            2001 => Self::MenuNotFound,
            2002 => Self::MenuAlreadyExists,
            2003 => Self::MenuHasNoPacks,
            2004 => Self::ConflictingState,
            2005 => Self::CutoffNotReached,
            2006 => Self::PackRemovalNotAllowed,
            2007 => Self::VariantRemovalNotAllowed,
            2008 => Self::MenuDeleteHasOrders,

            3001 => Self::OrderNotFound,
            3002 => Self::OrderingClosed,
            3003 => Self::DuplicateOrder,
            3004 => Self::OutOfStock,
            3005 => Self::PackNotOnMenu,
            3006 => Self::MissingRequiredComponent,
            3007 => Self::VariantNotOnMenu,
            3008 => Self::OrderNotCancellable,

            4001 => Self::DayAlreadyLocked,
            4002 => Self::DayNotFound,

            5001 => Self::InvoiceNotFound,
            5002 => Self::PeriodAlreadyInvoiced,
            5003 => Self::NoOrdersToInvoice,
            5004 => Self::InvoiceNotIssued,

            6001 => Self::ComponentNotFound,
            6002 => Self::ComponentNameExists,
            6101 => Self::VariantNotFound,
            6102 => Self::VariantReferencedByOrders,
            6103 => Self::VariantNameExists,
            6201 => Self::PackNotFound,
            6202 => Self::PackNameExists,
            6301 => Self::ServiceNotFound,
            6302 => Self::ServiceNameExists,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::MenuNotFound.code(), 2001);
        assert_eq!(ErrorCode::DuplicateOrder.code(), 3003);
        assert_eq!(ErrorCode::DayAlreadyLocked.code(), 4001);
        assert_eq!(ErrorCode::PeriodAlreadyInvoiced.code(), 5002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::MenuAlreadyExists,
            ErrorCode::OrderingClosed,
            ErrorCode::OutOfStock,
            ErrorCode::DayAlreadyLocked,
            ErrorCode::VariantReferencedByOrders,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(777), Err(InvalidErrorCode(777)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_http_status() {
        use http::StatusCode;
        assert_eq!(ErrorCode::MenuNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::OrderingClosed.http_status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            ErrorCode::CutoffNotReached.http_status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(ErrorCode::DuplicateOrder.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::MissingRequiredComponent.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OutOfStock).unwrap();
        assert_eq!(json, "3004");

        let code: ErrorCode = serde_json::from_str("3004").unwrap();
        assert_eq!(code, ErrorCode::OutOfStock);
    }
}
