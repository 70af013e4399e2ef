//! Day Lock Model
//!
//! One row per date. `locked_at` freezes the day's orders; `ordering_closed`
//! is the manual ordering-window override. Both live in the store (not in
//! process memory) so they survive restarts and are visible to every
//! instance.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Per-date lock and ordering-window row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLock {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Operating date "YYYY-MM-DD" (unique)
    pub date: String,
    /// Set once by the day lock; authoritative for order admission
    #[serde(default)]
    pub locked_at: Option<i64>,
    /// Number of orders frozen by the lock
    #[serde(default)]
    pub orders_locked: Option<i32>,
    /// Manual ordering-window override (close intake before cutoff)
    #[serde(default)]
    pub ordering_closed: bool,
}
