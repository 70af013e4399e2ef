//! Order admission

use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::error::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{DailyMenu, MenuStatus, MenuVariant, Order, OrderItem, OrderStatus, OrderToken};
use crate::db::repository::order::PlaceOutcome;
use crate::db::repository::{
    DailyMenuRepository, DayLockRepository, OrderRepository, OrderTokenRepository, PackRepository,
};
use crate::utils::time;

/// Order placement input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrder {
    /// Operating date "YYYY-MM-DD"
    pub order_date: String,
    pub pack_id: String,
    /// One variant per component consumed
    #[validate(length(min = 1, message = "at least one variant must be selected"))]
    pub variant_ids: Vec<String>,
    /// Client retry token, unique per employee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl PlaceOrder {
    /// Canonical fingerprint used to verify idempotent replays carry the
    /// same payload
    fn fingerprint(&self) -> String {
        let mut sorted = self.variant_ids.clone();
        sorted.sort();
        format!("{}|{}|{}", self.order_date, self.pack_id, sorted.join(","))
    }
}

/// Order admission service
#[derive(Clone)]
pub struct OrderIntake {
    state: ServerState,
}

impl OrderIntake {
    pub fn new(state: &ServerState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.state.db.clone())
    }

    /// Admit one order, or say exactly why not
    ///
    /// Checks, in order, each a hard failure:
    /// 1. a PUBLISHED menu for the date includes the pack
    /// 2. the day is not locked or manually closed, and `now_ms` is before
    ///    the effective cutoff (service cutoff for service-scoped packs)
    /// 3. the employee has no other live order for the date (an idempotent
    ///    replay returns the original order instead)
    /// 4. the selection satisfies the pack and every variant is activated
    ///
    /// Passing all four, the stock decrements and the order insert commit
    /// atomically.
    pub async fn place(
        &self,
        user: &CurrentUser,
        req: PlaceOrder,
        now_ms: i64,
    ) -> AppResult<Order> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        time::parse_date(&req.order_date)?;
        let business_id = user.require_business()?.to_string();

        // All admission state for a date is guarded by the date's mutex
        let _guard = self.state.date_locks.acquire(&req.order_date).await;

        // 1. Published menu includes the pack
        let menu = DailyMenuRepository::new(self.state.db.clone())
            .find_by_date(&req.order_date)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MenuNotFound,
                    format!("No menu for {}", req.order_date),
                )
            })?;
        if menu.status != MenuStatus::Published {
            return Err(AppError::ordering_closed(format!(
                "Menu for {} is not published",
                req.order_date
            )));
        }
        let (pack_entry, cutoff) = menu.resolve_pack(&req.pack_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PackNotOnMenu,
                format!("Pack {} is not on the menu for {}", req.pack_id, req.order_date),
            )
        })?;
        let pack_entry = pack_entry.clone();
        let cutoff = cutoff.to_string();

        // 2. Ordering window: day lock is authoritative, then the manual
        //    override, then the cutoff
        let day = DayLockRepository::new(self.state.db.clone())
            .find_by_date(&req.order_date)
            .await?;
        if let Some(day) = &day {
            if day.locked_at.is_some() {
                return Err(AppError::ordering_closed(format!(
                    "Orders for {} are locked",
                    req.order_date
                )));
            }
            if day.ordering_closed {
                return Err(AppError::ordering_closed(format!(
                    "Ordering for {} is closed",
                    req.order_date
                )));
            }
        }
        let cutoff_ms = time::cutoff_millis(&req.order_date, &cutoff, self.state.config.timezone)?;
        if now_ms >= cutoff_ms {
            return Err(AppError::ordering_closed(format!(
                "Cutoff for {} was {} {}",
                req.order_date, req.order_date, cutoff
            ))
            .with_detail("cutoff", cutoff_ms));
        }

        // 3. One live order per employee per date; a replay with a known
        //    token and identical payload returns the original order
        let fingerprint = req.fingerprint();
        let tokens = OrderTokenRepository::new(self.state.db.clone());
        if let Some(key) = &req.idempotency_key {
            if let Some(record) = tokens.find(&user.employee_id, key).await? {
                if record.fingerprint == fingerprint
                    && let Some(prior) = self.orders().find_by_id(&record.order_id).await?
                {
                    tracing::debug!(
                        employee = %user.employee_id,
                        order = %record.order_id,
                        "Idempotent replay answered with prior order"
                    );
                    return Ok(prior);
                }
                return Err(AppError::with_message(
                    ErrorCode::DuplicateOrder,
                    "Idempotency token was already used with a different request",
                ));
            }
        }
        if let Some(existing) = self
            .orders()
            .find_active_by_employee_date(&user.employee_id, &req.order_date)
            .await?
        {
            return Err(AppError::with_message(
                ErrorCode::DuplicateOrder,
                format!("An order for {} already exists", req.order_date),
            )
            .with_detail(
                "order_id",
                existing.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            ));
        }

        // 4. Selection satisfies the pack; every variant is activated
        let activations = self.resolve_selection(&menu, &req).await?;

        let items: Vec<OrderItem> = activations
            .iter()
            .map(|v| OrderItem {
                component_id: v.component_id.clone(),
                component_name: v.component_name.clone(),
                variant_id: v.variant_id.clone(),
                variant_name: v.variant_name.clone(),
            })
            .collect();

        let order = Order {
            id: None,
            employee_id: user.employee_id.clone(),
            business_id,
            order_date: req.order_date.clone(),
            pack_id: pack_entry.pack_id.clone(),
            pack_name: pack_entry.pack_name.clone(),
            pack_price: pack_entry.pack_price,
            total_amount: pack_entry.pack_price,
            status: OrderStatus::Created,
            items,
            created_at: now_ms,
            locked_at: None,
            cancelled_at: None,
        };

        let order_key = uuid::Uuid::new_v4().simple().to_string();
        let variant_ids: Vec<String> =
            activations.iter().map(|v| v.variant_id.clone()).collect();

        let outcome = self
            .orders()
            .place_atomic(&order_key, order, variant_ids)
            .await?;
        let placed = match outcome {
            PlaceOutcome::Placed(order) => *order,
            PlaceOutcome::OutOfStock(variant_id) => {
                let name = activations
                    .iter()
                    .find(|v| v.variant_id == variant_id)
                    .map(|v| v.variant_name.clone())
                    .unwrap_or(variant_id);
                return Err(AppError::with_message(
                    ErrorCode::OutOfStock,
                    format!("'{}' has no remaining stock for {}", name, req.order_date),
                ));
            }
        };

        if let Some(key) = &req.idempotency_key {
            tokens
                .create(OrderToken {
                    id: None,
                    employee_id: user.employee_id.clone(),
                    token: key.clone(),
                    order_id: placed.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                    fingerprint,
                    created_at: now_ms,
                })
                .await?;
        }

        tracing::info!(
            employee = %user.employee_id,
            date = %placed.order_date,
            pack = %placed.pack_name,
            "Order placed"
        );
        Ok(placed)
    }

    /// Validate the selected variants against the menu and the pack formula
    async fn resolve_selection(
        &self,
        menu: &DailyMenu,
        req: &PlaceOrder,
    ) -> AppResult<Vec<MenuVariant>> {
        let menu_repo = DailyMenuRepository::new(self.state.db.clone());
        let pack = PackRepository::new(self.state.db.clone())
            .find_by_id(&req.pack_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::PackNotFound,
                    format!("Pack {} not found", req.pack_id),
                )
            })?;

        let mut activations: Vec<MenuVariant> = Vec::with_capacity(req.variant_ids.len());
        for vid in &req.variant_ids {
            if activations.iter().any(|v| &v.variant_id == vid) {
                return Err(AppError::validation(format!(
                    "Variant {} selected twice",
                    vid
                )));
            }
            let activation = menu_repo.variant_for(&menu.date, vid).await?.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::VariantNotOnMenu,
                    format!("Variant {} is not activated for {}", vid, menu.date),
                )
            })?;

            if !pack
                .components
                .iter()
                .any(|c| c.component_id == activation.component_id)
            {
                return Err(AppError::validation(format!(
                    "Component '{}' is not part of pack '{}'",
                    activation.component_name, pack.name
                )));
            }
            if activations
                .iter()
                .any(|v| v.component_id == activation.component_id)
            {
                return Err(AppError::validation(format!(
                    "Component '{}' selected twice",
                    activation.component_name
                )));
            }
            activations.push(activation);
        }

        // Every required component needs a selection
        for pc in pack.components.iter().filter(|c| c.required) {
            if !activations.iter().any(|v| v.component_id == pc.component_id) {
                let name = crate::db::repository::ComponentRepository::new(self.state.db.clone())
                    .find_by_id(&pc.component_id)
                    .await?
                    .map(|c| c.name)
                    .unwrap_or_else(|| pc.component_id.clone());
                return Err(AppError::with_message(
                    ErrorCode::MissingRequiredComponent,
                    format!("Required component '{}' has no selection", name),
                ));
            }
        }

        Ok(activations)
    }

    /// Cancel a live order, restoring its variants' stock
    ///
    /// Allowed for the owning employee (or an operator) while the order is
    /// still CREATED; a locked day has already flipped the order to LOCKED,
    /// which rejects here.
    pub async fn cancel(&self, user: &CurrentUser, order_id: &str, now_ms: i64) -> AppResult<Order> {
        let order = self
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;

        if !user.is_operator() && order.employee_id != user.employee_id {
            return Err(AppError::permission_denied("Not your order"));
        }

        let _guard = self.state.date_locks.acquire(&order.order_date).await;

        // Re-read under the lock: the day lock may have flipped it meanwhile
        let order = self
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;
        if order.status != OrderStatus::Created {
            return Err(AppError::with_message(
                ErrorCode::OrderNotCancellable,
                format!("Order is {}", order.status.as_str()),
            ));
        }

        let key = order
            .id
            .as_ref()
            .map(|i| i.key().to_string())
            .ok_or_else(|| AppError::internal("Order row without id"))?;
        let variant_ids: Vec<String> =
            order.items.iter().map(|i| i.variant_id.clone()).collect();

        let cancelled = self
            .orders()
            .cancel_atomic(&key, &order.order_date, variant_ids, now_ms)
            .await?;

        tracing::info!(
            employee = %cancelled.employee_id,
            date = %cancelled.order_date,
            "Order cancelled"
        );
        Ok(cancelled)
    }

    /// One order, visible to its owner or an operator
    pub async fn get(&self, user: &CurrentUser, order_id: &str) -> AppResult<Order> {
        let order = self
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })?;
        if !user.is_operator() && order.employee_id != user.employee_id {
            return Err(AppError::permission_denied("Not your order"));
        }
        Ok(order)
    }

    /// The caller's own orders, newest first
    pub async fn list_mine(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        self.orders()
            .find_by_employee(&user.employee_id)
            .await
            .map_err(Into::into)
    }

    /// All orders, paginated (operator)
    pub async fn list_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Order>> {
        self.orders().find_all(limit, offset).await.map_err(Into::into)
    }
}
