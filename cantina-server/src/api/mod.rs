//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`components`] - 菜品组件/菜品目录接口
//! - [`packs`] - 套餐目录接口
//! - [`services`] - 餐段目录接口
//! - [`daily_menus`] - 每日菜单生命周期接口
//! - [`orders`] - 订单接口
//! - [`days`] - 日锁定与订餐窗口接口
//! - [`kitchen`] - 后厨汇总接口
//! - [`invoices`] - 发票接口

pub mod health;

// Catalog API
pub mod components;
pub mod packs;
pub mod services;

// Lifecycle API
pub mod daily_menus;
pub mod days;
pub mod invoices;
pub mod kitchen;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::AppResult;
