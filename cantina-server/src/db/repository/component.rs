//! Component Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Component, ComponentCreate, ComponentUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "component";

#[derive(Clone)]
pub struct ComponentRepository {
    base: BaseRepository,
}

impl ComponentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all components ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Component>> {
        let components: Vec<Component> = self
            .base
            .db()
            .query("SELECT * FROM component ORDER BY name")
            .await?
            .take(0)?;
        Ok(components)
    }

    /// Find component by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Component>> {
        let component: Option<Component> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(component)
    }

    /// Find component by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Component>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM component WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let components: Vec<Component> = result.take(0)?;
        Ok(components.into_iter().next())
    }

    /// Create a new component
    pub async fn create(&self, data: ComponentCreate) -> RepoResult<Component> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Component '{}' already exists",
                data.name
            )));
        }

        let component = Component {
            id: None,
            name: data.name,
        };

        let created: Option<Component> = self.base.db().create(TABLE).content(component).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create component".to_string()))
    }

    /// Update a component
    pub async fn update(&self, id: &str, data: ComponentUpdate) -> RepoResult<Component> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Component {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Component '{}' already exists",
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
            .ok_or_else(|| RepoError::NotFound(format!("Component {} not found", id)))
    }

    /// Hard delete a component
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
