//! Cantina Server - B2B 团餐订餐平台服务端
//!
//! # 架构概述
//!
//! 运营方基于套餐/菜品目录编排每日菜单，客户企业的员工在截单时间前下单，
//! 运营方锁定当日订单用于后厨生产和开票。
//!
//! # 模块结构
//!
//! ```text
//! cantina-server/src/
//! ├── core/       # 配置、状态、服务器
//! ├── auth/       # 调用方身份解析 (网关注入的请求头)
//! ├── db/         # 嵌入式 SurrealDB 存储层
//! ├── menus/      # 每日菜单状态机 (DRAFT → PUBLISHED → LOCKED)
//! ├── intake/     # 订单准入 (截单校验、库存扣减、幂等)
//! ├── day_lock/   # 日锁定 (批量冻结订单) 与订餐窗口开关
//! ├── kitchen/    # 后厨汇总视图
//! ├── invoicing/  # 发票生成
//! ├── api/        # HTTP 路由和处理器
//! └── utils/      # 日志、时间等工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod day_lock;
pub mod db;
pub mod intake;
pub mod invoicing;
pub mod kitchen;
pub mod menus;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use day_lock::DayLockService;
pub use intake::OrderIntake;
pub use invoicing::InvoiceService;
pub use kitchen::KitchenService;
pub use menus::MenuManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use shared::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   ______            __  _
  / ____/___ _____  / /_(_)___  ____ _
 / /   / __ `/ __ \/ __/ / __ \/ __ `/
/ /___/ /_/ / / / / /_/ / / / / /_/ /
\____/\__,_/_/ /_/\__/_/_/ /_/\__,_/
    "#
    );
}
