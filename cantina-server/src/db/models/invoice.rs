//! Invoice Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Issued => "ISSUED",
            Self::Paid => "PAID",
        }
    }
}

/// One invoiced order line (an order is consumed by at most one invoice)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub order_id: String,
    pub employee_id: String,
    pub order_date: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Invoice for one business over a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub business_id: String,
    /// Covered period "YYYY-MM-DD" (inclusive). For open-ended generation
    /// this is the span of the orders actually included.
    pub period_start: String,
    pub period_end: String,
    pub status: InvoiceStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub items: Vec<InvoiceItem>,
    pub issued_at: i64,
}
