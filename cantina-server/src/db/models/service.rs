//! Service Model
//!
//! A service is an ordering window (lunch, dinner) with its own start and
//! cutoff times, exposing a set of packs.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Earliest order time, "HH:MM" against the operating date
    pub order_start_time: String,
    /// Latest order time, "HH:MM" against the operating date
    pub cutoff_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_published: bool,
    /// Pack ids exposed by this service
    #[serde(default)]
    pub pack_ids: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub order_start_time: String,
    pub cutoff_time: String,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}
