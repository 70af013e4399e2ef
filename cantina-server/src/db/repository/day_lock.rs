//! Day Lock Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::DayLock;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "day_lock";

#[derive(Clone)]
pub struct DayLockRepository {
    base: BaseRepository,
}

impl DayLockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the day row for a date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Option<DayLock>> {
        let date_owned = date.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM day_lock WHERE date = $date LIMIT 1")
            .bind(("date", date_owned))
            .await?;
        let rows: Vec<DayLock> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Record the day lock (creates the row if the date has none yet)
    pub async fn set_locked(
        &self,
        date: &str,
        locked_at: i64,
        orders_locked: i32,
    ) -> RepoResult<DayLock> {
        match self.find_by_date(date).await? {
            Some(existing) => {
                let id = existing
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .ok_or_else(|| RepoError::Database("Day row without id".into()))?;
                let rid = record_id(TABLE, &id);
                self.base
                    .db()
                    .query("UPDATE $thing SET locked_at = $ts, orders_locked = $count")
                    .bind(("thing", rid))
                    .bind(("ts", locked_at))
                    .bind(("count", orders_locked))
                    .await?;
                self.find_by_date(date)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Day row for {} not found", date)))
            }
            None => {
                let row = DayLock {
                    id: None,
                    date: date.to_string(),
                    locked_at: Some(locked_at),
                    orders_locked: Some(orders_locked),
                    ordering_closed: false,
                };
                let created: Option<DayLock> =
                    self.base.db().create(TABLE).content(row).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create day row".to_string()))
            }
        }
    }

    /// Set or clear the manual ordering-window override
    pub async fn set_ordering_closed(&self, date: &str, closed: bool) -> RepoResult<DayLock> {
        match self.find_by_date(date).await? {
            Some(existing) => {
                let id = existing
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .ok_or_else(|| RepoError::Database("Day row without id".into()))?;
                let rid = record_id(TABLE, &id);
                self.base
                    .db()
                    .query("UPDATE $thing SET ordering_closed = $closed")
                    .bind(("thing", rid))
                    .bind(("closed", closed))
                    .await?;
                self.find_by_date(date)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Day row for {} not found", date)))
            }
            None => {
                let row = DayLock {
                    id: None,
                    date: date.to_string(),
                    locked_at: None,
                    orders_locked: None,
                    ordering_closed: closed,
                };
                let created: Option<DayLock> =
                    self.base.db().create(TABLE).content(row).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create day row".to_string()))
            }
        }
    }
}
