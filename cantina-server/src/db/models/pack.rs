//! Pack Model
//!
//! A pack is a priced meal formula ("Basic": soup + main + dessert).
//! Its component list is append-only once in production use; `required`
//! components drive publish-time validation and order admission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Component slot within a pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackComponent {
    /// Component id ("component:xyz")
    pub component_id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order_index: i32,
}

/// Catalog pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Ordered component slots (append-only)
    #[serde(default)]
    pub components: Vec<PackComponent>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackCreate {
    pub name: String,
    pub price: Decimal,
    pub components: Option<Vec<PackComponent>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
