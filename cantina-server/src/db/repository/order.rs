//! Order Repository
//!
//! Owns the two multi-statement transactions of the order path: placement
//! (stock decrements + insert, all-or-nothing) and cancellation (status flip
//! + stock restore). Admission *checks* live in `intake::OrderIntake`.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

/// Result of the atomic placement transaction
#[derive(Debug)]
pub enum PlaceOutcome {
    /// Order inserted, every selected variant decremented
    Placed(Box<Order>),
    /// A variant had no remaining stock; nothing was applied
    OutOfStock(String),
}

/// Placement: decrement every selected variant's remaining stock (failing if
/// any is exhausted) and insert the order, as one transaction. A THROW
/// anywhere cancels the whole transaction, so a mid-failure leaves neither
/// the decrement nor the order behind.
const PLACE_QUERY: &str = r#"
BEGIN TRANSACTION;
FOR $vid IN $variant_ids {
    LET $updated = (
        UPDATE menu_variant
        SET remaining_stock -= 1
        WHERE date = $date AND variant_id = $vid AND remaining_stock > 0
        RETURN AFTER
    );
    IF array::len($updated) == 0 {
        THROW "OUT_OF_STOCK " + <string>$vid;
    };
};
CREATE type::thing('order', $order_key) CONTENT $order;
COMMIT TRANSACTION;
"#;

/// Cancellation: flip the order and give every selected variant its unit of
/// stock back, as one transaction.
const CANCEL_QUERY: &str = r#"
BEGIN TRANSACTION;
UPDATE type::thing('order', $order_key) SET status = 'CANCELLED', cancelled_at = $now;
FOR $vid IN $variant_ids {
    UPDATE menu_variant SET remaining_stock += 1 WHERE date = $date AND variant_id = $vid;
};
COMMIT TRANSACTION;
"#;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(order)
    }

    /// Find the employee's non-cancelled order for a date, if any
    pub async fn find_active_by_employee_date(
        &self,
        employee_id: &str,
        date: &str,
    ) -> RepoResult<Option<Order>> {
        let emp = employee_id.to_string();
        let date_owned = date.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE employee_id = $emp AND order_date = $date AND status != 'CANCELLED' LIMIT 1")
            .bind(("emp", emp))
            .bind(("date", date_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All non-cancelled orders for a date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Order>> {
        let date_owned = date.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_date = $date AND status != 'CANCELLED' ORDER BY created_at")
            .bind(("date", date_owned))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders of one employee, newest first
    pub async fn find_by_employee(&self, employee_id: &str) -> RepoResult<Vec<Order>> {
        let emp = employee_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE employee_id = $emp ORDER BY order_date DESC")
            .bind(("emp", emp))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders, paginated (operator view)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// LOCKED orders, optionally filtered by business and an inclusive date
    /// range ("YYYY-MM-DD" compares lexicographically = chronologically)
    pub async fn find_locked(
        &self,
        business_id: Option<String>,
        start: Option<String>,
        end: Option<String>,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status = 'LOCKED' \
                 AND ($biz IS NONE OR business_id = $biz) \
                 AND ($start IS NONE OR order_date >= $start) \
                 AND ($end IS NONE OR order_date <= $end) \
                 ORDER BY business_id, order_date",
            )
            .bind(("biz", business_id))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Atomically decrement stock for every selected variant and insert the
    /// order (see [`PLACE_QUERY`])
    pub async fn place_atomic(
        &self,
        order_key: &str,
        order: Order,
        variant_ids: Vec<String>,
    ) -> RepoResult<PlaceOutcome> {
        let date = order.order_date.clone();
        let result = self
            .base
            .db()
            .query(PLACE_QUERY)
            .bind(("variant_ids", variant_ids))
            .bind(("date", date))
            .bind(("order_key", order_key.to_string()))
            .bind(("order", order))
            .await?;

        if let Err(e) = result.check() {
            let msg = e.to_string();
            if let Some(pos) = msg.find("OUT_OF_STOCK") {
                let variant = msg[pos + "OUT_OF_STOCK".len()..].trim().to_string();
                return Ok(PlaceOutcome::OutOfStock(variant));
            }
            return Err(RepoError::Database(msg));
        }

        let created: Option<Order> = self.base.db().select((TABLE, order_key)).await?;
        created
            .map(|o| PlaceOutcome::Placed(Box::new(o)))
            .ok_or_else(|| RepoError::Database("Order missing after placement".to_string()))
    }

    /// Atomically cancel an order and restore its variants' stock
    pub async fn cancel_atomic(
        &self,
        order_key: &str,
        date: &str,
        variant_ids: Vec<String>,
        now_ms: i64,
    ) -> RepoResult<Order> {
        self.base
            .db()
            .query(CANCEL_QUERY)
            .bind(("order_key", order_key.to_string()))
            .bind(("now", now_ms))
            .bind(("date", date.to_string()))
            .bind(("variant_ids", variant_ids))
            .await?
            .check()?;

        self.find_by_id(order_key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_key)))
    }

    /// Bulk-flip every CREATED order for a date to LOCKED with a single
    /// timestamp; returns how many were flipped
    pub async fn lock_all_created(&self, date: &str, locked_at: i64) -> RepoResult<i32> {
        let date_owned = date.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET status = 'LOCKED', locked_at = $now \
                 WHERE order_date = $date AND status = 'CREATED' RETURN AFTER",
            )
            .bind(("date", date_owned))
            .bind(("now", locked_at))
            .await?;
        let locked: Vec<Order> = result.take(0)?;
        Ok(locked.len() as i32)
    }

    /// Orders for a date in a given status (lock verification, tests)
    pub async fn find_by_date_status(
        &self,
        date: &str,
        status: OrderStatus,
    ) -> RepoResult<Vec<Order>> {
        let date_owned = date.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_date = $date AND status = $status ORDER BY created_at")
            .bind(("date", date_owned))
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Delete every order for a date (forced menu deletion only)
    pub async fn delete_for_date(&self, date: &str) -> RepoResult<()> {
        let date_owned = date.to_string();
        self.base
            .db()
            .query("DELETE order WHERE order_date = $date")
            .bind(("date", date_owned))
            .await?;
        Ok(())
    }
}
