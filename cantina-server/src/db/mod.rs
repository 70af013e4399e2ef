//! Database Module
//!
//! Embedded SurrealDB storage (RocksDb engine on disk, Mem engine for tests).

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "cantina";
const DATABASE: &str = "main";

/// Schema bootstrap: uniqueness constraints the lifecycle paths rely on.
///
/// Tables stay schemaless; the indexes are the invariants:
/// - one menu per date, one day-lock row per date
/// - one activation per (date, variant)
/// - one idempotency token per (employee, token)
const SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS uniq_component_name ON TABLE component FIELDS name UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_variant_component_name ON TABLE variant FIELDS component_id, name UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_pack_name ON TABLE pack FIELDS name UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_service_name ON TABLE service FIELDS name UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_menu_date ON TABLE daily_menu FIELDS date UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_menu_variant ON TABLE menu_variant FIELDS date, variant_id UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_day_lock_date ON TABLE day_lock FIELDS date UNIQUE;
DEFINE INDEX IF NOT EXISTS uniq_order_token ON TABLE order_token FIELDS employee_id, token UNIQUE;
DEFINE INDEX IF NOT EXISTS idx_order_date ON TABLE order FIELDS order_date;
DEFINE INDEX IF NOT EXISTS idx_order_employee ON TABLE order FIELDS employee_id;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        Self::bootstrap(&db).await?;
        tracing::info!("Database opened at {} (RocksDb)", db_path);

        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {}", e)))?;

        Self::bootstrap(&db).await?;

        Ok(Self { db })
    }

    async fn bootstrap(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {}", e)))?
            .check()
            .map_err(|e| AppError::database(format!("Schema statement failed: {}", e)))?;

        tracing::debug!("Database schema applied");
        Ok(())
    }
}
