//! Kitchen aggregation views
//!
//! Read-only projections over a date's non-cancelled orders, available as a
//! preview before the day lock and as the production sheet after it. All
//! three views fold the same fetched order set through [`VariantTally`], so
//! they cannot disagree on per-variant totals.

use std::collections::BTreeMap;

use serde::Serialize;

use shared::error::AppResult;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::time;

/// Per (pack, component, variant) production line
#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub pack_id: String,
    pub pack_name: String,
    pub component_id: String,
    pub component_name: String,
    pub variant_id: String,
    pub variant_name: String,
    pub quantity: i64,
}

/// Production summary for a date
#[derive(Debug, Clone, Serialize)]
pub struct KitchenSummary {
    pub date: String,
    pub lines: Vec<SummaryLine>,
    pub total_orders: i64,
}

/// Per-business quantity of one variant
#[derive(Debug, Clone, Serialize)]
pub struct BusinessCount {
    pub business_id: String,
    pub quantity: i64,
}

/// Per-variant total with its business split
#[derive(Debug, Clone, Serialize)]
pub struct BusinessVariantLine {
    pub variant_id: String,
    pub variant_name: String,
    pub component_name: String,
    pub quantity: i64,
    pub businesses: Vec<BusinessCount>,
}

/// Business breakdown for a date
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSummary {
    pub date: String,
    pub variants: Vec<BusinessVariantLine>,
    pub total_orders: i64,
}

/// Variant total within a component group
#[derive(Debug, Clone, Serialize)]
pub struct VariantCount {
    pub variant_id: String,
    pub variant_name: String,
    pub quantity: i64,
}

/// Component-grouped variant totals
#[derive(Debug, Clone, Serialize)]
pub struct ComponentGroup {
    pub component_id: String,
    pub component_name: String,
    pub variants: Vec<VariantCount>,
}

/// One order in the chef's flat list
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub order_id: String,
    pub employee_id: String,
    pub business_id: String,
    pub pack_name: String,
    pub variant_names: Vec<String>,
}

/// Detailed (chef) summary for a date
#[derive(Debug, Clone, Serialize)]
pub struct DetailedSummary {
    pub date: String,
    pub components: Vec<ComponentGroup>,
    pub orders: Vec<OrderLine>,
    pub total_variants: i64,
    pub total_orders: i64,
}

/// One shared fold over the order set
///
/// Every view reads its numbers from here; each order contributes 1 per
/// selected variant instance.
struct VariantTally {
    /// (pack_id, component_id, variant_id) → (pack_name, component_name, variant_name, qty)
    lines: BTreeMap<(String, String, String), (String, String, String, i64)>,
    /// (component_id, variant_id) → per-business counts
    businesses: BTreeMap<(String, String), BTreeMap<String, i64>>,
}

impl VariantTally {
    fn fold(orders: &[Order]) -> Self {
        let mut lines = BTreeMap::new();
        let mut businesses: BTreeMap<(String, String), BTreeMap<String, i64>> = BTreeMap::new();

        for order in orders {
            for item in &order.items {
                let key = (
                    order.pack_id.clone(),
                    item.component_id.clone(),
                    item.variant_id.clone(),
                );
                let entry = lines.entry(key).or_insert_with(|| {
                    (
                        order.pack_name.clone(),
                        item.component_name.clone(),
                        item.variant_name.clone(),
                        0,
                    )
                });
                entry.3 += 1;

                *businesses
                    .entry((item.component_id.clone(), item.variant_id.clone()))
                    .or_default()
                    .entry(order.business_id.clone())
                    .or_insert(0) += 1;
            }
        }

        Self { lines, businesses }
    }

    /// Per-variant totals summed across packs
    fn variant_totals(&self) -> BTreeMap<(String, String), (String, String, i64)> {
        let mut totals: BTreeMap<(String, String), (String, String, i64)> = BTreeMap::new();
        for ((_pack, component_id, variant_id), (_pack_name, component_name, variant_name, qty)) in
            &self.lines
        {
            let entry = totals
                .entry((component_id.clone(), variant_id.clone()))
                .or_insert_with(|| (component_name.clone(), variant_name.clone(), 0));
            entry.2 += qty;
        }
        totals
    }
}

/// Kitchen view service
#[derive(Clone)]
pub struct KitchenService {
    state: ServerState,
}

impl KitchenService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    async fn orders_for(&self, date: &str) -> AppResult<Vec<Order>> {
        time::parse_date(date)?;
        OrderRepository::new(self.state.db.clone())
            .find_by_date(date)
            .await
            .map_err(Into::into)
    }

    /// Total quantity per (pack, component, variant)
    pub async fn summary(&self, date: &str) -> AppResult<KitchenSummary> {
        let orders = self.orders_for(date).await?;
        let tally = VariantTally::fold(&orders);

        let lines = tally
            .lines
            .iter()
            .map(
                |((pack_id, component_id, variant_id), (pack_name, component_name, variant_name, qty))| {
                    SummaryLine {
                        pack_id: pack_id.clone(),
                        pack_name: pack_name.clone(),
                        component_id: component_id.clone(),
                        component_name: component_name.clone(),
                        variant_id: variant_id.clone(),
                        variant_name: variant_name.clone(),
                        quantity: *qty,
                    }
                },
            )
            .collect();

        Ok(KitchenSummary {
            date: date.to_string(),
            lines,
            total_orders: orders.len() as i64,
        })
    }

    /// Per-variant totals with the per-business split
    pub async fn business_summary(&self, date: &str) -> AppResult<BusinessSummary> {
        let orders = self.orders_for(date).await?;
        let tally = VariantTally::fold(&orders);

        let variants = tally
            .variant_totals()
            .into_iter()
            .map(|((component_id, variant_id), (component_name, variant_name, quantity))| {
                let businesses = tally
                    .businesses
                    .get(&(component_id.clone(), variant_id.clone()))
                    .map(|counts| {
                        counts
                            .iter()
                            .map(|(business_id, quantity)| BusinessCount {
                                business_id: business_id.clone(),
                                quantity: *quantity,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                BusinessVariantLine {
                    variant_id,
                    variant_name,
                    component_name,
                    quantity,
                    businesses,
                }
            })
            .collect();

        Ok(BusinessSummary {
            date: date.to_string(),
            variants,
            total_orders: orders.len() as i64,
        })
    }

    /// Component-grouped totals plus the flat order list
    pub async fn detailed_summary(&self, date: &str) -> AppResult<DetailedSummary> {
        let orders = self.orders_for(date).await?;
        let tally = VariantTally::fold(&orders);

        let mut groups: BTreeMap<String, ComponentGroup> = BTreeMap::new();
        let mut total_variants = 0i64;
        for ((component_id, variant_id), (component_name, variant_name, quantity)) in
            tally.variant_totals()
        {
            total_variants += quantity;
            groups
                .entry(component_id.clone())
                .or_insert_with(|| ComponentGroup {
                    component_id,
                    component_name,
                    variants: Vec::new(),
                })
                .variants
                .push(VariantCount {
                    variant_id,
                    variant_name,
                    quantity,
                });
        }

        let order_lines = orders
            .iter()
            .map(|o| OrderLine {
                order_id: o.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                employee_id: o.employee_id.clone(),
                business_id: o.business_id.clone(),
                pack_name: o.pack_name.clone(),
                variant_names: o.items.iter().map(|i| i.variant_name.clone()).collect(),
            })
            .collect();

        Ok(DetailedSummary {
            date: date.to_string(),
            components: groups.into_values().collect(),
            orders: order_lines,
            total_variants,
            total_orders: orders.len() as i64,
        })
    }
}
