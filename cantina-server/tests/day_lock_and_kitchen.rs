//! Day lock semantics and kitchen view consistency

mod common;

use std::collections::BTreeMap;

use common::*;

use cantina_server::day_lock::DayLockService;
use cantina_server::db::models::OrderStatus;
use cantina_server::db::repository::OrderRepository;
use cantina_server::kitchen::KitchenService;
use shared::error::ErrorCode;

#[tokio::test]
async fn lock_day_freezes_all_created_orders_once() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;

    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();
    fx.place(&employee("bilal", "acme"), &[&fx.harira_id]).await.unwrap();
    fx.place(&employee("nadia", "globex"), &[&fx.chorba_id, &fx.couscous_id])
        .await
        .unwrap();

    let day_lock = DayLockService::new(&fx.state);
    let result = day_lock.lock_day(&fx.date, after_cutoff(&fx.date)).await.unwrap();
    assert_eq!(result.orders_locked, 3);

    // Every order carries the same lock timestamp
    let locked = OrderRepository::new(fx.state.db.clone())
        .find_by_date_status(&fx.date, OrderStatus::Locked)
        .await
        .unwrap();
    assert_eq!(locked.len(), 3);
    assert!(locked.iter().all(|o| o.locked_at == Some(result.locked_at)));

    // Second call: rejected with the original timestamp, nothing re-processed
    let err = day_lock
        .lock_day(&fx.date, after_cutoff(&fx.date) + 3_600_000)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DayAlreadyLocked);
    let details = err.details.unwrap();
    assert_eq!(
        details.get("locked_at").unwrap().as_i64().unwrap(),
        result.locked_at
    );

    let still_locked = OrderRepository::new(fx.state.db.clone())
        .find_by_date_status(&fx.date, OrderStatus::Locked)
        .await
        .unwrap();
    assert_eq!(still_locked.len(), 3);
    assert!(still_locked.iter().all(|o| o.locked_at == Some(result.locked_at)));
}

#[tokio::test]
async fn locked_day_rejects_intake_even_with_a_published_menu() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();

    DayLockService::new(&fx.state)
        .lock_day(&fx.date, before_cutoff(&fx.date))
        .await
        .unwrap();

    // The menu is still PUBLISHED and the cutoff has not passed; the day
    // lock alone closes intake
    let err = fx
        .place(&employee("bilal", "acme"), &[&fx.harira_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderingClosed);
}

#[tokio::test]
async fn ordering_window_override() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    let day_lock = DayLockService::new(&fx.state);

    // Manual close rejects intake before the cutoff
    day_lock.close_ordering(&fx.date).await.unwrap();
    let err = fx
        .place(&employee("amel", "acme"), &[&fx.chorba_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderingClosed);

    // Reopen and intake works again
    day_lock.open_ordering(&fx.date).await.unwrap();
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();

    // A locked day cannot be reopened
    day_lock
        .lock_day(&fx.date, after_cutoff(&fx.date))
        .await
        .unwrap();
    let err = day_lock.open_ordering(&fx.date).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DayAlreadyLocked);

    let status = day_lock.status(&fx.date).await.unwrap();
    assert!(status.locked_at.is_some());
    assert_eq!(status.orders_locked, Some(1));
}

#[tokio::test]
async fn kitchen_views_agree_on_variant_totals() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;

    // 3 Chorba, 1 Harira, 2 Couscous across two businesses
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id, &fx.couscous_id])
        .await
        .unwrap();
    fx.place(&employee("bilal", "acme"), &[&fx.chorba_id]).await.unwrap();
    fx.place(&employee("nadia", "globex"), &[&fx.chorba_id, &fx.couscous_id])
        .await
        .unwrap();
    fx.place(&employee("karim", "globex"), &[&fx.harira_id]).await.unwrap();

    // A cancelled order must vanish from every view
    let doomed = fx.place(&employee("yasmin", "globex"), &[&fx.chorba_id]).await.unwrap();
    fx.intake()
        .cancel(
            &employee("yasmin", "globex"),
            &doomed.id.unwrap().to_string(),
            before_cutoff(&fx.date),
        )
        .await
        .unwrap();

    DayLockService::new(&fx.state)
        .lock_day(&fx.date, after_cutoff(&fx.date))
        .await
        .unwrap();

    let kitchen = KitchenService::new(&fx.state);
    let summary = kitchen.summary(&fx.date).await.unwrap();
    let business = kitchen.business_summary(&fx.date).await.unwrap();
    let detailed = kitchen.detailed_summary(&fx.date).await.unwrap();

    // Totals per variant from each view
    let mut from_summary: BTreeMap<String, i64> = BTreeMap::new();
    for line in &summary.lines {
        *from_summary.entry(line.variant_id.clone()).or_default() += line.quantity;
    }
    let mut from_business: BTreeMap<String, i64> = BTreeMap::new();
    for line in &business.variants {
        *from_business.entry(line.variant_id.clone()).or_default() += line.quantity;
    }
    let mut from_detailed: BTreeMap<String, i64> = BTreeMap::new();
    for group in &detailed.components {
        for v in &group.variants {
            *from_detailed.entry(v.variant_id.clone()).or_default() += v.quantity;
        }
    }

    assert_eq!(from_summary, from_business);
    assert_eq!(from_summary, from_detailed);

    assert_eq!(from_summary.get(&fx.chorba_id), Some(&3));
    assert_eq!(from_summary.get(&fx.harira_id), Some(&1));
    assert_eq!(from_summary.get(&fx.couscous_id), Some(&2));

    // Business split adds up
    let chorba = business
        .variants
        .iter()
        .find(|v| v.variant_id == fx.chorba_id)
        .unwrap();
    let split: BTreeMap<_, _> = chorba
        .businesses
        .iter()
        .map(|b| (b.business_id.as_str(), b.quantity))
        .collect();
    assert_eq!(split.get("business:acme"), Some(&2));
    assert_eq!(split.get("business:globex"), Some(&1));

    assert_eq!(summary.total_orders, 4);
    assert_eq!(detailed.total_orders, 4);
    assert_eq!(detailed.orders.len(), 4);
    assert_eq!(detailed.total_variants, 6);
}
