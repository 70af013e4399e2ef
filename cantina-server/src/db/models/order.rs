//! Order Model
//!
//! 订单只存快照：套餐名/价格与菜品名在下单时冻结，目录后续改动不影响历史订单。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Locked,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Locked => "LOCKED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// One selected variant within an order (names snapshotted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub component_id: String,
    pub component_name: String,
    pub variant_id: String,
    pub variant_name: String,
}

/// Employee order for a date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub employee_id: String,
    /// Denormalized from the employee's business at order time
    pub business_id: String,
    /// Operating date "YYYY-MM-DD"
    pub order_date: String,
    pub pack_id: String,
    pub pack_name: String,
    pub pack_price: Decimal,
    /// Pack price snapshot at ordering time, never recomputed
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    #[serde(default)]
    pub locked_at: Option<i64>,
    #[serde(default)]
    pub cancelled_at: Option<i64>,
}

/// Idempotency token record
///
/// Keyed by (employee_id, token); `fingerprint` is the canonical JSON of the
/// original request so a replay with a different payload is rejected instead
/// of answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderToken {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub employee_id: String,
    pub token: String,
    pub order_id: String,
    pub fingerprint: String,
    pub created_at: i64,
}
