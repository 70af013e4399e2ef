//! 日锁定与订餐窗口
//!
//! `lock_day` 把某日期所有 CREATED 订单一次性冻结为 LOCKED，记录唯一的
//! `locked_at` 时间戳。与订单准入共用同一把按日期互斥锁：锁定完成后该日期
//! 的新订单一律被拒绝，进行中的订单要么进入本次锁定，要么拿不到锁。
//!
//! 重复锁定策略：对已锁定日期再次调用返回 `DayAlreadyLocked` 错误并附带
//! 原始 `locked_at`，绝不重复处理或重复计数。
//!
//! 窗口开关 (`ordering_closed`) 是独立于菜单状态的按日期持久化标志，
//! 用于在截单前手动关闭/重开订餐；已锁定的日期不可重开。

use serde::Serialize;

use shared::error::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;
use crate::db::models::{DayLock, MenuStatus};
use crate::db::repository::{DailyMenuRepository, DayLockRepository, OrderRepository};
use crate::utils::time;

/// Result of a day lock
#[derive(Debug, Clone, Serialize)]
pub struct LockDayResult {
    pub date: String,
    pub orders_locked: i32,
    pub locked_at: i64,
}

/// Combined per-date view: day lock, ordering window and menu status
#[derive(Debug, Clone, Serialize)]
pub struct DayStatus {
    pub date: String,
    pub locked_at: Option<i64>,
    pub orders_locked: Option<i32>,
    pub ordering_closed: bool,
    pub menu_status: Option<MenuStatus>,
}

/// Day-scoped lock and ordering-window operations
#[derive(Clone)]
pub struct DayLockService {
    state: ServerState,
}

impl DayLockService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn days(&self) -> DayLockRepository {
        DayLockRepository::new(self.state.db.clone())
    }

    /// Freeze every CREATED order of the date under one timestamp
    pub async fn lock_day(&self, date: &str, now_ms: i64) -> AppResult<LockDayResult> {
        time::parse_date(date)?;

        let _guard = self.state.date_locks.acquire(date).await;

        if let Some(existing) = self.days().find_by_date(date).await?
            && let Some(locked_at) = existing.locked_at
        {
            return Err(AppError::with_message(
                ErrorCode::DayAlreadyLocked,
                format!("{} was already locked", date),
            )
            .with_detail("locked_at", locked_at)
            .with_detail("orders_locked", existing.orders_locked.unwrap_or(0)));
        }

        let orders_locked = OrderRepository::new(self.state.db.clone())
            .lock_all_created(date, now_ms)
            .await?;
        self.days().set_locked(date, now_ms, orders_locked).await?;

        tracing::info!(date = %date, orders = orders_locked, "Day locked");
        Ok(LockDayResult {
            date: date.to_string(),
            orders_locked,
            locked_at: now_ms,
        })
    }

    /// Manually close the ordering window before the cutoff
    pub async fn close_ordering(&self, date: &str) -> AppResult<DayLock> {
        time::parse_date(date)?;
        let _guard = self.state.date_locks.acquire(date).await;

        let row = self.days().set_ordering_closed(date, true).await?;
        tracing::info!(date = %date, "Ordering window closed");
        Ok(row)
    }

    /// Reopen the ordering window
    ///
    /// A locked day stays closed: the day lock is authoritative for
    /// admission and has no undo here.
    pub async fn open_ordering(&self, date: &str) -> AppResult<DayLock> {
        time::parse_date(date)?;
        let _guard = self.state.date_locks.acquire(date).await;

        if let Some(existing) = self.days().find_by_date(date).await?
            && existing.locked_at.is_some()
        {
            return Err(AppError::with_message(
                ErrorCode::DayAlreadyLocked,
                format!("{} is locked; ordering cannot reopen", date),
            ));
        }

        let row = self.days().set_ordering_closed(date, false).await?;
        tracing::info!(date = %date, "Ordering window reopened");
        Ok(row)
    }

    /// Per-date status for operators (lock, window and menu signals side by
    /// side)
    pub async fn status(&self, date: &str) -> AppResult<DayStatus> {
        time::parse_date(date)?;

        let day = self.days().find_by_date(date).await?;
        let menu = DailyMenuRepository::new(self.state.db.clone())
            .find_by_date(date)
            .await?;

        Ok(DayStatus {
            date: date.to_string(),
            locked_at: day.as_ref().and_then(|d| d.locked_at),
            orders_locked: day.as_ref().and_then(|d| d.orders_locked),
            ordering_closed: day.map(|d| d.ordering_closed).unwrap_or(false),
            menu_status: menu.map(|m| m.status),
        })
    }
}
