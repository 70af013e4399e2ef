//! Idempotency Token Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::OrderToken;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order_token";

#[derive(Clone)]
pub struct OrderTokenRepository {
    base: BaseRepository,
}

impl OrderTokenRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a token record for (employee, token)
    pub async fn find(&self, employee_id: &str, token: &str) -> RepoResult<Option<OrderToken>> {
        let emp = employee_id.to_string();
        let tok = token.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_token WHERE employee_id = $emp AND token = $tok LIMIT 1")
            .bind(("emp", emp))
            .bind(("tok", tok))
            .await?;
        let tokens: Vec<OrderToken> = result.take(0)?;
        Ok(tokens.into_iter().next())
    }

    /// Record a token after a successful placement
    pub async fn create(&self, token: OrderToken) -> RepoResult<OrderToken> {
        let created: Option<OrderToken> = self
            .base
            .db()
            .create(TABLE)
            .content(token)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("uniq_order_token") {
                    RepoError::Duplicate("Token already recorded".into())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to record token".to_string()))
    }
}
