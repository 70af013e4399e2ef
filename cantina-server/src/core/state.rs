use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::error::{Result, ServerError};
use crate::core::Config;
use crate::db::DbService;

/// 按日期互斥锁
///
/// 订单准入、取消和日锁定共享同一把按日期的锁：某个日期上的库存扣减、
/// 同员工重复下单检查和锁定标志都是该日期内的临界区。不同日期互不阻塞。
#[derive(Debug, Default)]
pub struct DateLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DateLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 获取指定日期的互斥锁 (持有 guard 期间该日期的准入/锁定操作串行)
    pub async fn acquire(&self, date: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(date.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | date_locks | 按日期的准入互斥锁 |
/// | invoice_guard | 发票生成互斥锁 (防止并发生成重复消费订单) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 按日期的准入互斥锁
    pub date_locks: Arc<DateLocks>,
    /// 发票生成互斥锁
    pub invoice_guard: Arc<Mutex<()>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录结构存在
    /// 2. 打开数据库 (work_dir/database) 并应用 schema
    pub async fn initialize(config: &Config) -> Result<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| ServerError::Config(format!("Failed to create work dir: {}", e)))?;

        let db_dir = config.database_dir();
        let db_service = DbService::new(&db_dir.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self::with_db(config.clone(), db_service.db))
    }

    /// 使用内存数据库初始化 (测试用)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db_service = DbService::memory()
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self::with_db(config.clone(), db_service.db))
    }

    fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            config,
            db,
            date_locks: Arc::new(DateLocks::new()),
            invoice_guard: Arc::new(Mutex::new(())),
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
