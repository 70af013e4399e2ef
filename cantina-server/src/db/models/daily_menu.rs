//! Daily Menu Model
//!
//! One menu per date. Pack and service entries carry snapshot fields frozen
//! at selection time so later catalog edits never alter what employees saw.
//! Activated variants live in the `menu_variant` table (one row per
//! (date, variant)) because their remaining stock is mutated by order
//! admission and must be updated row-at-a-time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Menu lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuStatus {
    Draft,
    Published,
    Locked,
}

impl MenuStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Locked => "LOCKED",
        }
    }
}

/// Pack selected onto a menu (price and name frozen at selection time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPack {
    pub pack_id: String,
    pub pack_name: String,
    pub pack_price: Decimal,
}

/// Service attached to a menu, with its packs and cutoff frozen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuService {
    pub service_id: String,
    pub service_name: String,
    /// Service cutoff "HH:MM", overrides the menu cutoff for its packs
    pub cutoff_time: String,
    pub packs: Vec<MenuPack>,
}

/// Daily menu row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenu {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Operating date "YYYY-MM-DD" (unique)
    pub date: String,
    pub status: MenuStatus,
    /// Order cutoff "HH:MM" for directly attached packs
    pub cutoff_hour: String,
    #[serde(default)]
    pub packs: Vec<MenuPack>,
    #[serde(default)]
    pub services: Vec<MenuService>,
    /// Set on first publish and kept through unpublish; the variant-removal
    /// ratchet checks this, not the current status
    #[serde(default)]
    pub published_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

impl DailyMenu {
    /// All packs reachable from this menu (direct plus via services),
    /// direct entries first
    pub fn all_packs(&self) -> impl Iterator<Item = &MenuPack> {
        self.packs
            .iter()
            .chain(self.services.iter().flat_map(|s| s.packs.iter()))
    }

    /// Find a pack entry and the cutoff that governs it: the menu cutoff for
    /// direct entries, the service cutoff for packs reachable only through a
    /// service
    pub fn resolve_pack(&self, pack_id: &str) -> Option<(&MenuPack, &str)> {
        if let Some(p) = self.packs.iter().find(|p| p.pack_id == pack_id) {
            return Some((p, self.cutoff_hour.as_str()));
        }
        self.services.iter().find_map(|s| {
            s.packs
                .iter()
                .find(|p| p.pack_id == pack_id)
                .map(|p| (p, s.cutoff_time.as_str()))
        })
    }
}

/// Variant activated for a date, with its per-date stock pool
///
/// `initial_stock` is immutable once written; `remaining_stock` is the live
/// counter decremented by order admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuVariant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Operating date "YYYY-MM-DD"
    pub date: String,
    pub variant_id: String,
    pub variant_name: String,
    pub component_id: String,
    pub component_name: String,
    pub initial_stock: i32,
    pub remaining_stock: i32,
}
