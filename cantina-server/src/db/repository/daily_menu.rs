//! Daily Menu Repository
//!
//! Row-level operations only; status transitions and their guards live in
//! `menus::MenuManager`.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{DailyMenu, MenuPack, MenuService, MenuStatus, MenuVariant};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "daily_menu";
const VARIANT_TABLE: &str = "menu_variant";

#[derive(Clone)]
pub struct DailyMenuRepository {
    base: BaseRepository,
}

impl DailyMenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menus, newest date first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<DailyMenu>> {
        let menus: Vec<DailyMenu> = self
            .base
            .db()
            .query("SELECT * FROM daily_menu ORDER BY date DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(menus)
    }

    /// Find menu by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DailyMenu>> {
        let menu: Option<DailyMenu> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(menu)
    }

    /// Find menu by date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Option<DailyMenu>> {
        let date_owned = date.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM daily_menu WHERE date = $date LIMIT 1")
            .bind(("date", date_owned))
            .await?;
        let menus: Vec<DailyMenu> = result.take(0)?;
        Ok(menus.into_iter().next())
    }

    /// Create a menu row for a date
    ///
    /// The unique index on `date` is the backstop for races; callers check
    /// for an existing menu first to return a clean error.
    pub async fn create(&self, menu: DailyMenu) -> RepoResult<DailyMenu> {
        let created: Option<DailyMenu> = self
            .base
            .db()
            .create(TABLE)
            .content(menu)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("uniq_menu_date") {
                    RepoError::Duplicate("Menu already exists for this date".into())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu".to_string()))
    }

    /// Set menu status (and first-publish timestamp when given)
    pub async fn set_status(
        &self,
        id: &str,
        status: MenuStatus,
        published_at: Option<i64>,
    ) -> RepoResult<DailyMenu> {
        let rid = record_id(TABLE, id);
        match published_at {
            Some(ts) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET status = $status, published_at = $published_at")
                    .bind(("thing", rid))
                    .bind(("status", status))
                    .bind(("published_at", ts))
                    .await?;
            }
            None => {
                self.base
                    .db()
                    .query("UPDATE $thing SET status = $status")
                    .bind(("thing", rid))
                    .bind(("status", status))
                    .await?;
            }
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }

    /// Append a pack snapshot to a menu
    pub async fn add_pack_entry(&self, id: &str, entry: MenuPack) -> RepoResult<DailyMenu> {
        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET packs += $entry")
            .bind(("thing", rid))
            .bind(("entry", entry))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }

    /// Append a service snapshot to a menu
    pub async fn add_service_entry(&self, id: &str, entry: MenuService) -> RepoResult<DailyMenu> {
        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET services += $entry")
            .bind(("thing", rid))
            .bind(("entry", entry))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }

    /// Update the menu cutoff hour
    pub async fn set_cutoff(&self, id: &str, cutoff_hour: &str) -> RepoResult<DailyMenu> {
        let rid = record_id(TABLE, id);
        let cutoff = cutoff_hour.to_string();
        self.base
            .db()
            .query("UPDATE $thing SET cutoff_hour = $cutoff")
            .bind(("thing", rid))
            .bind(("cutoff", cutoff))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }

    /// Delete a menu row together with its variant activations
    pub async fn delete_with_variants(&self, id: &str, date: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id);
        let date_owned = date.to_string();
        self.base
            .db()
            .query("DELETE menu_variant WHERE date = $date; DELETE $thing;")
            .bind(("date", date_owned))
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(())
    }

    // ==================== Variant activations ====================

    /// Activate a variant for the menu's date with an initial stock pool
    pub async fn add_variant_row(&self, row: MenuVariant) -> RepoResult<MenuVariant> {
        let created: Option<MenuVariant> = self
            .base
            .db()
            .create(VARIANT_TABLE)
            .content(row)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("uniq_menu_variant") {
                    RepoError::Duplicate("Variant already activated for this date".into())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to activate variant".to_string()))
    }

    /// Remove a variant activation (draft menus only; guarded by the caller)
    pub async fn remove_variant_row(&self, date: &str, variant_id: &str) -> RepoResult<bool> {
        let existing = self.variant_for(date, variant_id).await?;
        if existing.is_none() {
            return Ok(false);
        }

        let date_owned = date.to_string();
        let vid = variant_id.to_string();
        self.base
            .db()
            .query("DELETE menu_variant WHERE date = $date AND variant_id = $vid")
            .bind(("date", date_owned))
            .bind(("vid", vid))
            .await?;
        Ok(true)
    }

    /// All variant activations for a date, grouped stable by component
    pub async fn variants_for_date(&self, date: &str) -> RepoResult<Vec<MenuVariant>> {
        let date_owned = date.to_string();
        let variants: Vec<MenuVariant> = self
            .base
            .db()
            .query("SELECT * FROM menu_variant WHERE date = $date ORDER BY component_id, variant_name")
            .bind(("date", date_owned))
            .await?
            .take(0)?;
        Ok(variants)
    }

    /// One variant activation for (date, variant)
    pub async fn variant_for(&self, date: &str, variant_id: &str) -> RepoResult<Option<MenuVariant>> {
        let date_owned = date.to_string();
        let vid = variant_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_variant WHERE date = $date AND variant_id = $vid LIMIT 1")
            .bind(("date", date_owned))
            .bind(("vid", vid))
            .await?;
        let variants: Vec<MenuVariant> = result.take(0)?;
        Ok(variants.into_iter().next())
    }
}
