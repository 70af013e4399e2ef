//! Order admission tests: cutoff gating, duplicates and idempotent replay,
//! selection validation, stock accounting under concurrency, cancellation

mod common;

use common::*;

use cantina_server::db::models::OrderStatus;
use cantina_server::db::repository::DailyMenuRepository;
use rust_decimal::Decimal;
use shared::error::ErrorCode;

#[tokio::test]
async fn placement_snapshots_pack_and_items() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;

    let order = fx
        .place(&employee("amel", "acme"), &[&fx.chorba_id, &fx.couscous_id])
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.order_date, "2024-03-15");
    assert_eq!(order.pack_name, "Basic 2024-03-15");
    assert_eq!(order.total_amount, Decimal::new(2200, 2));
    assert_eq!(order.business_id, "business:acme");
    assert_eq!(order.items.len(), 2);
    assert!(order.items.iter().any(|i| i.variant_name == "Chorba"));
    assert!(order.items.iter().any(|i| i.variant_name == "Couscous"));

    // Stock pool decremented for the date
    let activation = DailyMenuRepository::new(fx.state.db.clone())
        .variant_for(&fx.date, &fx.chorba_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(activation.initial_stock, 5);
    assert_eq!(activation.remaining_stock, 4);
}

#[tokio::test]
async fn cutoff_minute_boundary() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    let intake = fx.intake();

    // One minute before cutoff: admitted
    intake
        .place(
            &employee("amel", "acme"),
            fx.order_request(&[&fx.chorba_id]),
            before_cutoff(&fx.date),
        )
        .await
        .unwrap();

    // One minute after cutoff: rejected as a time-gated failure
    let err = intake
        .place(
            &employee("bilal", "acme"),
            fx.order_request(&[&fx.chorba_id]),
            after_cutoff(&fx.date),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderingClosed);
    assert_eq!(err.http_status(), http::StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn menu_must_exist_and_be_published() {
    let fx = fixture("2024-03-15").await;
    let intake = fx.intake();

    // Draft menu: not orderable
    let err = fx
        .place(&employee("amel", "acme"), &[&fx.chorba_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderingClosed);

    // Unknown date: no menu at all
    let mut req = fx.order_request(&[&fx.chorba_id]);
    req.order_date = "2024-03-22".into();
    let err = intake
        .place(&employee("amel", "acme"), req, before_cutoff("2024-03-22"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MenuNotFound);
}

#[tokio::test]
async fn pack_must_be_on_the_menu() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;

    let stray_pack = create_pack(
        &fx.state,
        "Stray",
        Decimal::new(1800, 2),
        vec![(fx.soup_id.clone(), true)],
    )
    .await;

    let mut req = fx.order_request(&[&fx.chorba_id]);
    req.pack_id = stray_pack;
    let err = fx
        .intake()
        .place(&employee("amel", "acme"), req, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PackNotOnMenu);
}

#[tokio::test]
async fn one_live_order_per_employee_and_date() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    let amel = employee("amel", "acme");

    fx.place(&amel, &[&fx.chorba_id]).await.unwrap();

    // Plain retry
    let err = fx.place(&amel, &[&fx.chorba_id]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateOrder);

    // A different employee is unaffected
    fx.place(&employee("bilal", "acme"), &[&fx.chorba_id])
        .await
        .unwrap();
}

#[tokio::test]
async fn idempotent_replay_returns_original_order() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    let amel = employee("amel", "acme");
    let intake = fx.intake();

    let mut req = fx.order_request(&[&fx.chorba_id]);
    req.idempotency_key = Some("retry-1".into());
    let first = intake
        .place(&amel, req.clone(), before_cutoff(&fx.date))
        .await
        .unwrap();

    // Same token, same payload: the original order comes back
    let replay = intake
        .place(&amel, req.clone(), before_cutoff(&fx.date))
        .await
        .unwrap();
    assert_eq!(
        first.id.as_ref().unwrap().to_string(),
        replay.id.as_ref().unwrap().to_string()
    );

    // Stock was only taken once
    let activation = DailyMenuRepository::new(fx.state.db.clone())
        .variant_for(&fx.date, &fx.chorba_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(activation.remaining_stock, 4);

    // Same token, different payload: rejected, not silently answered
    let mut altered = req.clone();
    altered.variant_ids = vec![fx.harira_id.clone()];
    let err = intake
        .place(&amel, altered, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateOrder);

    // Different token, duplicate order: still a duplicate
    let mut other_token = req;
    other_token.idempotency_key = Some("retry-2".into());
    let err = intake
        .place(&amel, other_token, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateOrder);
}

#[tokio::test]
async fn selection_must_satisfy_the_pack() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;
    let intake = fx.intake();

    // Required soup missing
    let err = fx
        .place(&employee("amel", "acme"), &[&fx.couscous_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredComponent);

    // Variant not activated for the date
    let inactive = create_variant(&fx.state, &fx.soup_id, "Lentil", 9).await;
    let err = fx
        .place(&employee("amel", "acme"), &[&inactive])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::VariantNotOnMenu);

    // Two variants of the same component
    let err = fx
        .place(&employee("amel", "acme"), &[&fx.chorba_id, &fx.harira_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // Empty selection
    let mut req = fx.order_request(&[]);
    req.variant_ids.clear();
    let err = intake
        .place(&employee("amel", "acme"), req, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn stock_is_a_hard_bound() {
    let fx = fixture_with_stock("2024-03-15", 1).await;
    fx.publish().await;

    fx.place(&employee("amel", "acme"), &[&fx.chorba_id])
        .await
        .unwrap();
    let err = fx
        .place(&employee("bilal", "acme"), &[&fx.chorba_id])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfStock);
    assert_eq!(err.http_status(), http::StatusCode::PRECONDITION_FAILED);

    // The failed attempt left no order behind
    let orders = fx.intake().list_all(50, 0).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_cannot_both_take_the_last_unit() {
    let fx = fixture_with_stock("2024-03-15", 1).await;
    fx.publish().await;

    let mut handles = Vec::new();
    for i in 0..2 {
        let state = fx.state.clone();
        let req = fx.order_request(&[&fx.chorba_id]);
        let date = fx.date.clone();
        handles.push(tokio::spawn(async move {
            // Jitter so either task can reach the guard first
            let pause = u64::from(rand::random::<u8>() % 5);
            tokio::time::sleep(std::time::Duration::from_millis(pause)).await;
            let user = employee(&format!("racer-{}", i), "acme");
            cantina_server::intake::OrderIntake::new(&state)
                .place(&user, req, before_cutoff(&date))
                .await
        }));
    }

    let results = futures::future::join_all(handles).await;
    let mut placed = 0;
    let mut out_of_stock = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => placed += 1,
            Err(e) => {
                assert_eq!(e.code, ErrorCode::OutOfStock);
                out_of_stock += 1;
            }
        }
    }
    assert_eq!(placed, 1);
    assert_eq!(out_of_stock, 1);

    let activation = DailyMenuRepository::new(fx.state.db.clone())
        .variant_for(&fx.date, &fx.chorba_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(activation.remaining_stock, 0);
}

#[tokio::test]
async fn cancellation_restores_stock_and_frees_the_slot() {
    let fx = fixture_with_stock("2024-03-15", 1).await;
    fx.publish().await;
    let amel = employee("amel", "acme");
    let intake = fx.intake();

    let order = fx.place(&amel, &[&fx.chorba_id]).await.unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // Someone else cannot cancel it
    let err = intake
        .cancel(&employee("bilal", "acme"), &order_id, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let cancelled = intake
        .cancel(&amel, &order_id, before_cutoff(&fx.date))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let activation = DailyMenuRepository::new(fx.state.db.clone())
        .variant_for(&fx.date, &fx.chorba_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(activation.remaining_stock, 1);

    // The employee can order again: cancelled orders do not count
    fx.place(&amel, &[&fx.chorba_id]).await.unwrap();

    // A cancelled order cannot be cancelled twice
    let err = intake
        .cancel(&amel, &order_id, before_cutoff(&fx.date))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotCancellable);
}

#[tokio::test]
async fn ordering_requires_a_business() {
    let fx = fixture("2024-03-15").await;
    fx.publish().await;

    let err = fx.place(&operator(), &[&fx.chorba_id]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}
