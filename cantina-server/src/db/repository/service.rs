//! Service Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "service";

#[derive(Clone)]
pub struct ServiceRepository {
    base: BaseRepository,
}

impl ServiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all services ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Service>> {
        let services: Vec<Service> = self
            .base
            .db()
            .query("SELECT * FROM service ORDER BY name")
            .await?
            .take(0)?;
        Ok(services)
    }

    /// Find service by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Service>> {
        let service: Option<Service> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(service)
    }

    /// Find service by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Service>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM service WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let services: Vec<Service> = result.take(0)?;
        Ok(services.into_iter().next())
    }

    /// Create a new service
    pub async fn create(&self, data: ServiceCreate) -> RepoResult<Service> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Service '{}' already exists",
                data.name
            )));
        }

        let service = Service {
            id: None,
            name: data.name,
            order_start_time: data.order_start_time,
            cutoff_time: data.cutoff_time,
            is_active: true,
            is_published: data.is_published.unwrap_or(false),
            pack_ids: Vec::new(),
        };

        let created: Option<Service> = self.base.db().create(TABLE).content(service).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create service".to_string()))
    }

    /// Update a service
    pub async fn update(&self, id: &str, data: ServiceUpdate) -> RepoResult<Service> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Service '{}' already exists",
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
            .ok_or_else(|| RepoError::NotFound(format!("Service {} not found", id)))
    }

    /// Link a pack to a service (idempotent rejection of duplicates)
    pub async fn add_pack(&self, id: &str, pack_id: &str) -> RepoResult<Service> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service {} not found", id)))?;

        if existing.pack_ids.iter().any(|p| p == pack_id) {
            return Err(RepoError::Duplicate(format!(
                "Pack {} already linked to service",
                pack_id
            )));
        }

        let rid = record_id(TABLE, id);
        let pid = pack_id.to_string();
        self.base
            .db()
            .query("UPDATE $thing SET pack_ids += $pack_id")
            .bind(("thing", rid))
            .bind(("pack_id", pid))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service {} not found", id)))
    }
}
