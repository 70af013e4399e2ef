//! Invoice generation
//!
//! Reads LOCKED orders, groups them by business and persists one ISSUED
//! invoice per business. Two rules keep billing exact:
//!
//! - an order is consumed by at most one invoice
//! - a bounded period that overlaps an already-invoiced period for the same
//!   business is rejected outright, never partially re-billed
//!
//! Per-business generation with no bounds skips the period check and sweeps
//! every LOCKED order not yet consumed; the persisted invoice records the
//! actual span of the orders it covered.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use shared::error::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;
use crate::db::models::{Invoice, InvoiceItem, InvoiceStatus, Order};
use crate::db::repository::{InvoiceRepository, OrderRepository};
use crate::utils::time;

/// Invoice generation and read operations
#[derive(Clone)]
pub struct InvoiceService {
    state: ServerState,
}

impl InvoiceService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.state.db.clone())
    }

    /// Generate invoices for every business with LOCKED, un-invoiced orders
    /// in the inclusive date range
    pub async fn generate(
        &self,
        period_start: &str,
        period_end: &str,
        now_ms: i64,
    ) -> AppResult<Vec<Invoice>> {
        self.validate_range(Some(period_start), Some(period_end))?;
        self.generate_internal(
            None,
            Some(period_start.to_string()),
            Some(period_end.to_string()),
            now_ms,
            false,
        )
        .await
    }

    /// Generate one invoice for a single business
    ///
    /// With no bounds this sweeps every LOCKED order of the business not yet
    /// consumed by an invoice, regardless of date.
    pub async fn generate_for_business(
        &self,
        business_id: &str,
        period_start: Option<String>,
        period_end: Option<String>,
        now_ms: i64,
    ) -> AppResult<Vec<Invoice>> {
        self.validate_range(period_start.as_deref(), period_end.as_deref())?;
        self.generate_internal(
            Some(business_id.to_string()),
            period_start,
            period_end,
            now_ms,
            true,
        )
        .await
    }

    fn validate_range(&self, start: Option<&str>, end: Option<&str>) -> AppResult<()> {
        if let Some(start) = start {
            time::parse_date(start)?;
        }
        if let Some(end) = end {
            time::parse_date(end)?;
        }
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(AppError::validation(format!(
                "period_start {} is after period_end {}",
                start, end
            )));
        }
        Ok(())
    }

    async fn generate_internal(
        &self,
        business_id: Option<String>,
        period_start: Option<String>,
        period_end: Option<String>,
        now_ms: i64,
        single_business: bool,
    ) -> AppResult<Vec<Invoice>> {
        // One generation at a time; double-consuming an order is worse than
        // a short wait
        let _guard = self.state.invoice_guard.lock().await;

        let order_repo = OrderRepository::new(self.state.db.clone());
        let candidates = order_repo
            .find_locked(
                business_id.clone(),
                period_start.clone(),
                period_end.clone(),
            )
            .await?;

        // Group by business before consumption filtering so an overlapping
        // re-generation is rejected rather than silently emptied
        let mut by_business: BTreeMap<String, Vec<Order>> = BTreeMap::new();
        for order in candidates {
            by_business
                .entry(order.business_id.clone())
                .or_default()
                .push(order);
        }

        // Bounded ranges must not overlap an already-invoiced period
        if let (Some(start), Some(end)) = (&period_start, &period_end) {
            for business in by_business.keys() {
                let existing = self.invoices().find_by_business(business).await?;
                if let Some(overlap) = existing
                    .iter()
                    .find(|inv| inv.period_start.as_str() <= end.as_str() && inv.period_end.as_str() >= start.as_str())
                {
                    return Err(AppError::with_message(
                        ErrorCode::PeriodAlreadyInvoiced,
                        format!(
                            "Business {} already invoiced for {} to {}",
                            business, overlap.period_start, overlap.period_end
                        ),
                    )
                    .with_detail("business_id", business.clone())
                    .with_detail(
                        "invoice_id",
                        overlap.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                    ));
                }
            }
        }

        // Drop orders already consumed by an invoice
        let consumed = self.invoices().consumed_order_ids(business_id).await?;
        for orders in by_business.values_mut() {
            orders.retain(|o| {
                let id = o.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                !consumed.contains(&id)
            });
        }
        by_business.retain(|_, orders| !orders.is_empty());

        if by_business.is_empty() {
            if single_business {
                return Err(AppError::new(ErrorCode::NoOrdersToInvoice));
            }
            return Ok(Vec::new());
        }

        let mut invoices = Vec::with_capacity(by_business.len());
        for (business, orders) in by_business {
            let invoice = self
                .build_invoice(business, orders, period_start.clone(), period_end.clone(), now_ms)
                .await?;
            invoices.push(invoice);
        }

        tracing::info!(count = invoices.len(), "Invoices generated");
        Ok(invoices)
    }

    async fn build_invoice(
        &self,
        business_id: String,
        orders: Vec<Order>,
        period_start: Option<String>,
        period_end: Option<String>,
        now_ms: i64,
    ) -> AppResult<Invoice> {
        let items: Vec<InvoiceItem> = orders
            .iter()
            .map(|o| InvoiceItem {
                order_id: o.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                employee_id: o.employee_id.clone(),
                order_date: o.order_date.clone(),
                description: format!("{} {}", o.order_date, o.pack_name),
                unit_price: o.total_amount,
                quantity: 1,
                line_total: o.total_amount,
            })
            .collect();

        let subtotal: Decimal = items.iter().map(|i| i.line_total).sum();
        let tax = (subtotal * self.state.config.tax_rate_percent / Decimal::from(100)).round_dp(2);
        let total = subtotal + tax;

        // Open-ended generation records the span actually covered
        let covered_start = orders.iter().map(|o| o.order_date.clone()).min();
        let covered_end = orders.iter().map(|o| o.order_date.clone()).max();
        let period_start = period_start
            .or(covered_start)
            .unwrap_or_default();
        let period_end = period_end.or(covered_end).unwrap_or_default();

        let invoice = Invoice {
            id: None,
            business_id,
            period_start,
            period_end,
            status: InvoiceStatus::Issued,
            subtotal,
            tax,
            total,
            items,
            issued_at: now_ms,
        };

        self.invoices().create(invoice).await.map_err(Into::into)
    }

    /// Mark an ISSUED invoice as paid
    pub async fn mark_paid(&self, id: &str) -> AppResult<Invoice> {
        let invoice = self.get(id).await?;
        if invoice.status != InvoiceStatus::Issued {
            return Err(AppError::with_message(
                ErrorCode::InvoiceNotIssued,
                format!("Invoice is {}", invoice.status.as_str()),
            ));
        }
        self.invoices()
            .set_status(id, InvoiceStatus::Paid)
            .await
            .map_err(Into::into)
    }

    /// One invoice by id
    pub async fn get(&self, id: &str) -> AppResult<Invoice> {
        self.invoices().find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvoiceNotFound,
                format!("Invoice {} not found", id),
            )
        })
    }

    /// All invoices, newest first
    pub async fn list(&self) -> AppResult<Vec<Invoice>> {
        self.invoices().find_all().await.map_err(Into::into)
    }
}
