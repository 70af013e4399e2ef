//! Component Model
//!
//! A component is a slot in a pack (soup, main course, dessert, drink).
//! Variants are the concrete dishes that can fill the slot.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Catalog component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCreate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
