//! Variant Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Variant, VariantCreate, VariantUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "variant";

#[derive(Clone)]
pub struct VariantRepository {
    base: BaseRepository,
}

impl VariantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all variants of a component
    pub async fn find_by_component(&self, component_id: &str) -> RepoResult<Vec<Variant>> {
        let cid = component_id.to_string();
        let variants: Vec<Variant> = self
            .base
            .db()
            .query("SELECT * FROM variant WHERE component_id = $cid ORDER BY name")
            .bind(("cid", cid))
            .await?
            .take(0)?;
        Ok(variants)
    }

    /// Find variant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Variant>> {
        let variant: Option<Variant> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(variant)
    }

    /// Find variant by name within a component
    pub async fn find_by_name(
        &self,
        component_id: &str,
        name: &str,
    ) -> RepoResult<Option<Variant>> {
        let cid = component_id.to_string();
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM variant WHERE component_id = $cid AND name = $name LIMIT 1")
            .bind(("cid", cid))
            .bind(("name", name_owned))
            .await?;
        let variants: Vec<Variant> = result.take(0)?;
        Ok(variants.into_iter().next())
    }

    /// Create a new variant under a component
    pub async fn create(&self, component_id: &str, data: VariantCreate) -> RepoResult<Variant> {
        if self.find_by_name(component_id, &data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Variant '{}' already exists in component",
                data.name
            )));
        }

        let variant = Variant {
            id: None,
            component_id: component_id.to_string(),
            name: data.name,
            stock_quantity: data.stock_quantity.unwrap_or(0),
            is_active: data.is_active.unwrap_or(true),
        };

        let created: Option<Variant> = self.base.db().create(TABLE).content(variant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create variant".to_string()))
    }

    /// Update a variant
    pub async fn update(&self, id: &str, data: VariantUpdate) -> RepoResult<Variant> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Variant {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self
                .find_by_name(&existing.component_id, new_name)
                .await?
                .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Variant '{}' already exists in component",
                new_name
            )));
        }

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", rid))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Variant {} not found", id)))
    }

    /// Count orders whose items reference this variant
    ///
    /// Billing history must stay resolvable, so a referenced variant can
    /// never be deleted.
    pub async fn count_order_references(&self, id: &str) -> RepoResult<usize> {
        let vid = record_id(TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE items.variant_id CONTAINS $vid")
            .bind(("vid", vid))
            .await?;
        let orders: Vec<crate::db::models::Order> = result.take(0)?;
        Ok(orders.len())
    }

    /// Hard delete a variant (caller must have checked order references)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?;
        Ok(true)
    }
}
