//! Shared test fixtures: in-memory state plus a seeded catalog and menu

#![allow(dead_code)]

use rust_decimal::Decimal;

use cantina_server::auth::CurrentUser;
use cantina_server::core::{Config, ServerState};
use cantina_server::db::models::{
    ComponentCreate, Order, PackComponent, PackCreate, VariantCreate,
};
use cantina_server::db::repository::{ComponentRepository, PackRepository, VariantRepository};
use cantina_server::intake::{OrderIntake, PlaceOrder};
use cantina_server::menus::MenuManager;
use cantina_server::utils::time;
use shared::error::AppResult;
use shared::types::Role;

pub const TZ: chrono_tz::Tz = chrono_tz::Europe::Madrid;
pub const CUTOFF: &str = "14:00";

pub fn test_config() -> Config {
    Config {
        work_dir: "/tmp/cantina-test".into(),
        http_port: 0,
        environment: "test".into(),
        timezone: TZ,
        default_cutoff: CUTOFF.into(),
        tax_rate_percent: Decimal::ZERO,
    }
}

pub async fn test_state() -> ServerState {
    ServerState::initialize_in_memory(&test_config())
        .await
        .expect("in-memory state")
}

pub async fn test_state_with_tax(tax_rate_percent: Decimal) -> ServerState {
    let mut config = test_config();
    config.tax_rate_percent = tax_rate_percent;
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

pub fn operator() -> CurrentUser {
    CurrentUser {
        employee_id: "employee:operator".into(),
        business_id: None,
        role: Role::Operator,
    }
}

pub fn employee(id: &str, business: &str) -> CurrentUser {
    CurrentUser {
        employee_id: format!("employee:{}", id),
        business_id: Some(format!("business:{}", business)),
        role: Role::Employee,
    }
}

/// One minute before the menu cutoff on `date`, as Unix millis
pub fn before_cutoff(date: &str) -> i64 {
    time::cutoff_millis(date, CUTOFF, TZ).unwrap() - 60_000
}

/// One minute after the menu cutoff on `date`, as Unix millis
pub fn after_cutoff(date: &str) -> i64 {
    time::cutoff_millis(date, CUTOFF, TZ).unwrap() + 60_000
}

/// Seeded catalog plus a menu draft for one date
pub struct Fixture {
    pub state: ServerState,
    pub date: String,
    pub menu_id: String,
    /// "Basic" pack, 22.00, soup required + main optional
    pub pack_id: String,
    pub soup_id: String,
    pub main_id: String,
    pub chorba_id: String,
    pub harira_id: String,
    pub couscous_id: String,
}

impl Fixture {
    pub fn manager(&self) -> MenuManager {
        MenuManager::new(&self.state)
    }

    pub fn intake(&self) -> OrderIntake {
        OrderIntake::new(&self.state)
    }

    pub async fn publish(&self) -> Vec<String> {
        let (_, warnings) = self
            .manager()
            .publish(&self.menu_id, before_cutoff(&self.date))
            .await
            .expect("publish");
        warnings
    }

    pub fn order_request(&self, variant_ids: &[&str]) -> PlaceOrder {
        PlaceOrder {
            order_date: self.date.clone(),
            pack_id: self.pack_id.clone(),
            variant_ids: variant_ids.iter().map(|s| s.to_string()).collect(),
            idempotency_key: None,
        }
    }

    /// Place an order for `user` one minute before cutoff
    pub async fn place(&self, user: &CurrentUser, variant_ids: &[&str]) -> AppResult<Order> {
        self.intake()
            .place(user, self.order_request(variant_ids), before_cutoff(&self.date))
            .await
    }
}

pub async fn create_component(state: &ServerState, name: &str) -> String {
    let created = ComponentRepository::new(state.db.clone())
        .create(ComponentCreate { name: name.into() })
        .await
        .expect("create component");
    created.id.unwrap().to_string()
}

pub async fn create_variant(
    state: &ServerState,
    component_id: &str,
    name: &str,
    stock: i32,
) -> String {
    let created = VariantRepository::new(state.db.clone())
        .create(
            component_id,
            VariantCreate {
                name: name.into(),
                stock_quantity: Some(stock),
                is_active: Some(true),
            },
        )
        .await
        .expect("create variant");
    created.id.unwrap().to_string()
}

pub async fn create_pack(
    state: &ServerState,
    name: &str,
    price: Decimal,
    components: Vec<(String, bool)>,
) -> String {
    let components = components
        .into_iter()
        .enumerate()
        .map(|(i, (component_id, required))| PackComponent {
            component_id,
            required,
            order_index: i as i32,
        })
        .collect();
    let created = PackRepository::new(state.db.clone())
        .create(PackCreate {
            name: name.into(),
            price,
            components: Some(components),
        })
        .await
        .expect("create pack");
    created.id.unwrap().to_string()
}

/// Full fixture: catalog, draft menu with the Basic pack, Chorba (stock
/// `chorba_stock`), Harira (3) and Couscous (10) activated
pub async fn fixture_with_stock(date: &str, chorba_stock: i32) -> Fixture {
    let state = test_state().await;
    fixture_on(state, date, chorba_stock).await
}

/// Same as [`fixture_with_stock`] on an existing state (multi-date tests)
pub async fn fixture_on(state: ServerState, date: &str, chorba_stock: i32) -> Fixture {
    let soup_id = create_component(&state, &format!("Soup {}", date)).await;
    let main_id = create_component(&state, &format!("Main {}", date)).await;
    let chorba_id = create_variant(&state, &soup_id, "Chorba", 50).await;
    let harira_id = create_variant(&state, &soup_id, "Harira", 50).await;
    let couscous_id = create_variant(&state, &main_id, "Couscous", 50).await;
    let pack_id = create_pack(
        &state,
        &format!("Basic {}", date),
        Decimal::new(2200, 2),
        vec![(soup_id.clone(), true), (main_id.clone(), false)],
    )
    .await;

    let manager = MenuManager::new(&state);
    let menu = manager.create(date).await.expect("create menu");
    let menu_id = menu.id.unwrap().to_string();
    manager.add_pack(&menu_id, &pack_id).await.expect("add pack");
    manager
        .add_variant(&menu_id, &chorba_id, chorba_stock)
        .await
        .expect("activate chorba");
    manager
        .add_variant(&menu_id, &harira_id, 3)
        .await
        .expect("activate harira");
    manager
        .add_variant(&menu_id, &couscous_id, 10)
        .await
        .expect("activate couscous");

    Fixture {
        state,
        date: date.into(),
        menu_id,
        pack_id,
        soup_id,
        main_id,
        chorba_id,
        harira_id,
        couscous_id,
    }
}

pub async fn fixture(date: &str) -> Fixture {
    fixture_with_stock(date, 5).await
}
