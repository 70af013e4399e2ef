//! Invoice generation: grouping, period overlap rejection, one-time order
//! consumption, open-ended per-business sweeps, tax

mod common;

use common::*;

use cantina_server::core::ServerState;
use cantina_server::day_lock::DayLockService;
use cantina_server::db::models::InvoiceStatus;
use cantina_server::invoicing::InvoiceService;
use cantina_server::utils::time;
use rust_decimal::Decimal;
use shared::error::ErrorCode;

/// Place one order each for acme and globex on `date`, then lock the day
async fn locked_day(state: &ServerState, date: &str) -> Fixture {
    let fx = fixture_on(state.clone(), date, 5).await;
    fx.publish().await;
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();
    fx.place(&employee("nadia", "globex"), &[&fx.harira_id]).await.unwrap();
    DayLockService::new(state)
        .lock_day(date, after_cutoff(date))
        .await
        .unwrap();
    fx
}

#[tokio::test]
async fn generate_groups_by_business_and_totals_lines() {
    let state = test_state().await;
    locked_day(&state, "2024-03-15").await;
    locked_day(&state, "2024-03-18").await;

    let invoices = InvoiceService::new(&state)
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap();

    assert_eq!(invoices.len(), 2);
    for invoice in &invoices {
        assert_eq!(invoice.status, InvoiceStatus::Issued);
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.subtotal, Decimal::new(4400, 2));
        assert_eq!(invoice.tax, Decimal::ZERO);
        assert_eq!(invoice.total, Decimal::new(4400, 2));
        assert_eq!(invoice.period_start, "2024-03-01");
        assert_eq!(invoice.period_end, "2024-03-31");
        for item in &invoice.items {
            assert_eq!(item.quantity, 1);
            assert_eq!(item.unit_price, Decimal::new(2200, 2));
        }
    }
    let businesses: Vec<_> = invoices.iter().map(|i| i.business_id.as_str()).collect();
    assert!(businesses.contains(&"business:acme"));
    assert!(businesses.contains(&"business:globex"));
}

#[tokio::test]
async fn only_locked_orders_are_invoiced() {
    let state = test_state().await;
    let fx = fixture_on(state.clone(), "2024-03-15", 5).await;
    fx.publish().await;
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();

    // Day not locked: nothing to invoice
    let invoices = InvoiceService::new(&state)
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap();
    assert!(invoices.is_empty());
}

#[tokio::test]
async fn overlapping_period_is_rejected_not_skipped() {
    let state = test_state().await;
    locked_day(&state, "2024-03-15").await;

    let service = InvoiceService::new(&state);
    service
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap();

    // Identical range
    let err = service
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PeriodAlreadyInvoiced);

    // Partially overlapping range
    locked_day(&state, "2024-04-01").await;
    let err = service
        .generate("2024-03-20", "2024-04-30", time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PeriodAlreadyInvoiced);

    // Disjoint range invoices only the new orders
    let invoices = service
        .generate("2024-04-01", "2024-04-30", time::now_millis())
        .await
        .unwrap();
    assert_eq!(invoices.len(), 2);
    for invoice in &invoices {
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].order_date, "2024-04-01");
    }
}

#[tokio::test]
async fn open_ended_business_sweep_consumes_leftovers() {
    let state = test_state().await;
    locked_day(&state, "2024-03-15").await;
    locked_day(&state, "2024-03-18").await;

    let service = InvoiceService::new(&state);

    // Globex first, open-ended: both its orders, span recorded from data
    let invoices = service
        .generate_for_business("business:globex", None, None, time::now_millis())
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
    let globex = &invoices[0];
    assert_eq!(globex.business_id, "business:globex");
    assert_eq!(globex.items.len(), 2);
    assert_eq!(globex.period_start, "2024-03-15");
    assert_eq!(globex.period_end, "2024-03-18");

    // The sweep did not touch acme's orders
    let invoices = service
        .generate_for_business("business:acme", None, None, time::now_millis())
        .await
        .unwrap();
    assert_eq!(invoices[0].items.len(), 2);

    // Everything is consumed now
    let err = service
        .generate_for_business("business:globex", None, None, time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoOrdersToInvoice);
}

#[tokio::test]
async fn orders_are_consumed_exactly_once() {
    let state = test_state().await;
    locked_day(&state, "2024-03-15").await;

    let service = InvoiceService::new(&state);
    service
        .generate_for_business(
            "business:acme",
            Some("2024-03-01".into()),
            Some("2024-03-31".into()),
            time::now_millis(),
        )
        .await
        .unwrap();

    // An open-ended sweep finds nothing left for acme
    let err = service
        .generate_for_business("business:acme", None, None, time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoOrdersToInvoice);
}

#[tokio::test]
async fn invalid_ranges_are_rejected() {
    let state = test_state().await;
    let service = InvoiceService::new(&state);

    let err = service
        .generate("2024-03-31", "2024-03-01", time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let err = service
        .generate("March 1st", "2024-03-31", time::now_millis())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn mark_paid_requires_issued() {
    let state = test_state().await;
    locked_day(&state, "2024-03-15").await;

    let service = InvoiceService::new(&state);
    let invoices = service
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap();
    let id = invoices[0].id.as_ref().unwrap().to_string();

    let paid = service.mark_paid(&id).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    let err = service.mark_paid(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvoiceNotIssued);
}

#[tokio::test]
async fn tax_rate_applies_to_subtotal() {
    let state = test_state_with_tax(Decimal::from(10)).await;
    let fx = fixture_on(state.clone(), "2024-03-15", 5).await;
    fx.publish().await;
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id]).await.unwrap();
    DayLockService::new(&state)
        .lock_day(&fx.date, after_cutoff(&fx.date))
        .await
        .unwrap();

    let invoices = InvoiceService::new(&state)
        .generate("2024-03-01", "2024-03-31", time::now_millis())
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].subtotal, Decimal::new(2200, 2));
    assert_eq!(invoices[0].tax, Decimal::new(220, 2));
    assert_eq!(invoices[0].total, Decimal::new(2420, 2));
}
