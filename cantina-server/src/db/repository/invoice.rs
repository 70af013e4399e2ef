//! Invoice Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Invoice, InvoiceStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All invoices, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice ORDER BY issued_at DESC")
            .await?
            .take(0)?;
        Ok(invoices)
    }

    /// Find invoice by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let invoice: Option<Invoice> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(invoice)
    }

    /// Non-draft invoices of one business
    pub async fn find_by_business(&self, business_id: &str) -> RepoResult<Vec<Invoice>> {
        let biz = business_id.to_string();
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE business_id = $biz AND status != 'DRAFT' ORDER BY period_start")
            .bind(("biz", biz))
            .await?
            .take(0)?;
        Ok(invoices)
    }

    /// Order ids already consumed by any non-draft invoice, optionally
    /// scoped to one business
    pub async fn consumed_order_ids(
        &self,
        business_id: Option<String>,
    ) -> RepoResult<Vec<String>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT VALUE items.order_id FROM invoice \
                 WHERE status != 'DRAFT' AND ($biz IS NONE OR business_id = $biz)",
            )
            .bind(("biz", business_id))
            .await?;
        let nested: Vec<Vec<String>> = result.take(0)?;
        Ok(nested.into_iter().flatten().collect())
    }

    /// Persist a generated invoice
    pub async fn create(&self, invoice: Invoice) -> RepoResult<Invoice> {
        let created: Option<Invoice> = self.base.db().create(TABLE).content(invoice).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }

    /// Update invoice status
    pub async fn set_status(&self, id: &str, status: InvoiceStatus) -> RepoResult<Invoice> {
        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", rid))
            .bind(("status", status))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))
    }
}
