//! Variant Model
//!
//! A variant is a concrete dish belonging to exactly one component
//! ("Chorba" under "Soup"). `stock_quantity` is the catalog-level default;
//! each daily menu activates a variant with its own per-date stock pool.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Catalog variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Owning component id ("component:xyz")
    pub component_id: String,
    pub name: String,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantCreate {
    pub name: String,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
