//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Identity errors
/// - 2xxx: Daily menu errors
/// - 3xxx: Order errors
/// - 4xxx: Day lock errors
/// - 5xxx: Invoice errors
/// - 6xxx: Catalog errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Identity errors (1xxx)
    Identity,
    /// Daily menu errors (2xxx)
    Menu,
    /// Order errors (3xxx)
    Order,
    /// Day lock errors (4xxx)
    DayLock,
    /// Invoice errors (5xxx)
    Invoice,
    /// Catalog errors (6xxx)
    Catalog,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Identity,
            2000..3000 => Self::Menu,
            3000..4000 => Self::Order,
            4000..5000 => Self::DayLock,
            5000..6000 => Self::Invoice,
            6000..7000 => Self::Catalog,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Identity => "identity",
            Self::Menu => "menu",
            Self::Order => "order",
            Self::DayLock => "day_lock",
            Self::Invoice => "invoice",
            Self::Catalog => "catalog",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
