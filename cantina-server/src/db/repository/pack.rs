//! Pack Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Pack, PackComponent, PackCreate, PackUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "pack";

#[derive(Clone)]
pub struct PackRepository {
    base: BaseRepository,
}

impl PackRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all packs ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Pack>> {
        let packs: Vec<Pack> = self
            .base
            .db()
            .query("SELECT * FROM pack ORDER BY name")
            .await?
            .take(0)?;
        Ok(packs)
    }

    /// Find pack by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Pack>> {
        let pack: Option<Pack> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(pack)
    }

    /// Find pack by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Pack>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM pack WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let packs: Vec<Pack> = result.take(0)?;
        Ok(packs.into_iter().next())
    }

    /// Create a new pack
    pub async fn create(&self, data: PackCreate) -> RepoResult<Pack> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Pack '{}' already exists",
                data.name
            )));
        }

        let pack = Pack {
            id: None,
            name: data.name,
            price: data.price,
            is_active: true,
            components: data.components.unwrap_or_default(),
        };

        let created: Option<Pack> = self.base.db().create(TABLE).content(pack).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create pack".to_string()))
    }

    /// Update pack name/price/active flag
    pub async fn update(&self, id: &str, data: PackUpdate) -> RepoResult<Pack> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Pack {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Pack '{}' already exists",
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
            .ok_or_else(|| RepoError::NotFound(format!("Pack {} not found", id)))
    }

    /// Append component slots to a pack
    ///
    /// The component list is append-only: existing entries are never
    /// replaced or removed, an already-present component is rejected.
    pub async fn add_components(
        &self,
        id: &str,
        mut additions: Vec<PackComponent>,
    ) -> RepoResult<Pack> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Pack {} not found", id)))?;

        for add in &additions {
            if existing
                .components
                .iter()
                .any(|c| c.component_id == add.component_id)
            {
                return Err(RepoError::Duplicate(format!(
                    "Component {} already in pack",
                    add.component_id
                )));
            }
        }

        let next_index = existing
            .components
            .iter()
            .map(|c| c.order_index)
            .max()
            .map(|i| i + 1)
            .unwrap_or(0);
        for (offset, add) in additions.iter_mut().enumerate() {
            add.order_index = next_index + offset as i32;
        }

        let mut components = existing.components;
        components.extend(additions);

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET components = $components")
            .bind(("thing", rid))
            .bind(("components", components))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Pack {} not found", id)))
    }
}
