//! Daily menu state machine tests: reachable edges, publish validation,
//! one-way composition ratchets and deletion rules

mod common;

use common::*;

use cantina_server::db::models::MenuStatus;
use cantina_server::db::repository::DailyMenuRepository;
use cantina_server::menus::MenuManager;
use shared::error::ErrorCode;

#[tokio::test]
async fn one_menu_per_date() {
    let state = test_state().await;
    let manager = MenuManager::new(&state);

    manager.create("2024-03-15").await.unwrap();
    let err = manager.create("2024-03-15").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MenuAlreadyExists);

    // A different date is untouched
    manager.create("2024-03-16").await.unwrap();
}

#[tokio::test]
async fn create_rejects_malformed_date() {
    let state = test_state().await;
    let err = MenuManager::new(&state).create("15/03/2024").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn publish_requires_at_least_one_pack() {
    let state = test_state().await;
    let manager = MenuManager::new(&state);
    let menu = manager.create("2024-03-15").await.unwrap();
    let menu_id = menu.id.unwrap().to_string();

    let err = manager
        .publish(&menu_id, before_cutoff("2024-03-15"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MenuHasNoPacks);
}

#[tokio::test]
async fn publish_warns_but_does_not_block() {
    let fx = fixture("2024-03-15").await;

    // Remove nothing: required soup has variants, so no required warning.
    let warnings = fx.publish().await;
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[tokio::test]
async fn publish_warns_on_missing_required_variant() {
    let state = test_state().await;
    let soup = create_component(&state, "Soup").await;
    let pack = create_pack(
        &state,
        "Basic",
        rust_decimal::Decimal::new(2200, 2),
        vec![(soup.clone(), true)],
    )
    .await;

    let manager = MenuManager::new(&state);
    let menu = manager.create("2024-03-15").await.unwrap();
    let menu_id = menu.id.unwrap().to_string();
    manager.add_pack(&menu_id, &pack).await.unwrap();

    // No variant activated for the required soup component
    let (menu, warnings) = manager
        .publish(&menu_id, before_cutoff("2024-03-15"))
        .await
        .unwrap();
    assert_eq!(menu.status, MenuStatus::Published);
    assert!(
        warnings.iter().any(|w| w.contains("required")),
        "missing required warning in {:?}",
        warnings
    );
}

#[tokio::test]
async fn publish_warns_on_zero_stock_activation() {
    let fx = fixture_with_stock("2024-03-15", 0).await;
    let warnings = fx.publish().await;
    assert!(
        warnings.iter().any(|w| w.contains("zero stock")),
        "missing zero stock warning in {:?}",
        warnings
    );
}

#[tokio::test]
async fn status_moves_only_along_allowed_edges() {
    let fx = fixture("2024-03-15").await;
    let manager = fx.manager();
    let id = &fx.menu_id;

    // DRAFT: lock and unlock are unreachable
    assert_eq!(
        manager.lock(id, after_cutoff(&fx.date)).await.unwrap_err().code,
        ErrorCode::ConflictingState
    );
    assert_eq!(
        manager.unlock(id).await.unwrap_err().code,
        ErrorCode::ConflictingState
    );
    assert_eq!(
        manager.unpublish(id).await.unwrap_err().code,
        ErrorCode::ConflictingState
    );

    // DRAFT → PUBLISHED
    fx.publish().await;

    // PUBLISHED: publish and unlock are unreachable
    assert_eq!(
        manager
            .publish(id, before_cutoff(&fx.date))
            .await
            .unwrap_err()
            .code,
        ErrorCode::ConflictingState
    );
    assert_eq!(
        manager.unlock(id).await.unwrap_err().code,
        ErrorCode::ConflictingState
    );

    // PUBLISHED → DRAFT → PUBLISHED (unpublish is a real edge)
    manager.unpublish(id).await.unwrap();
    let (menu, _) = manager.publish(id, before_cutoff(&fx.date)).await.unwrap();
    assert_eq!(menu.status, MenuStatus::Published);

    // PUBLISHED → LOCKED only after cutoff
    let err = manager.lock(id, before_cutoff(&fx.date)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CutoffNotReached);
    let menu = manager.lock(id, after_cutoff(&fx.date)).await.unwrap();
    assert_eq!(menu.status, MenuStatus::Locked);

    // LOCKED: publish/lock/unpublish unreachable, unlock goes back
    assert_eq!(
        manager
            .publish(id, before_cutoff(&fx.date))
            .await
            .unwrap_err()
            .code,
        ErrorCode::ConflictingState
    );
    assert_eq!(
        manager.unpublish(id).await.unwrap_err().code,
        ErrorCode::ConflictingState
    );
    let menu = manager.unlock(id).await.unwrap();
    assert_eq!(menu.status, MenuStatus::Published);
}

#[tokio::test]
async fn packs_are_never_removable_and_not_addable_twice() {
    let fx = fixture("2024-03-15").await;
    let err = fx
        .manager()
        .add_pack(&fx.menu_id, &fx.pack_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyExists);
}

#[tokio::test]
async fn variants_removable_only_before_first_publish() {
    let fx = fixture("2024-03-15").await;
    let manager = fx.manager();

    // Never-published draft: removal works
    manager
        .remove_variant(&fx.menu_id, &fx.harira_id)
        .await
        .unwrap();

    // After publish + unpublish the ratchet holds even in DRAFT
    fx.publish().await;
    manager.unpublish(&fx.menu_id).await.unwrap();
    let err = manager
        .remove_variant(&fx.menu_id, &fx.chorba_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::VariantRemovalNotAllowed);

    // Adding stays possible while published
    fx.publish().await;
    let extra = create_variant(&fx.state, &fx.main_id, "Tajine", 4).await;
    manager.add_variant(&fx.menu_id, &extra, 4).await.unwrap();
}

#[tokio::test]
async fn duplicate_activation_is_rejected() {
    let fx = fixture("2024-03-15").await;
    let err = fx
        .manager()
        .add_variant(&fx.menu_id, &fx.chorba_id, 2)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyExists);
}

#[tokio::test]
async fn cutoff_update_validates_format() {
    let fx = fixture("2024-03-15").await;
    let manager = fx.manager();

    let menu = manager.update_cutoff(&fx.menu_id, "11:30").await.unwrap();
    assert_eq!(menu.cutoff_hour, "11:30");

    let err = manager.update_cutoff(&fx.menu_id, "noon").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn delete_rules() {
    // Draft without orders deletes normally
    let fx = fixture("2024-03-15").await;
    fx.manager().delete(&fx.menu_id, false).await.unwrap();
    assert!(
        DailyMenuRepository::new(fx.state.db.clone())
            .find_by_date(&fx.date)
            .await
            .unwrap()
            .is_none()
    );

    // Published requires force
    let fx = fixture("2024-03-16").await;
    fx.publish().await;
    let err = fx.manager().delete(&fx.menu_id, false).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConflictingState);

    // Draft with orders requires force and force cascades them
    fx.place(&employee("amel", "acme"), &[&fx.chorba_id])
        .await
        .unwrap();
    fx.manager().unpublish(&fx.menu_id).await.unwrap();
    let err = fx.manager().delete(&fx.menu_id, false).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MenuDeleteHasOrders);

    fx.manager().delete(&fx.menu_id, true).await.unwrap();
    let orders = fx.intake().list_all(50, 0).await.unwrap();
    assert!(orders.iter().all(|o| o.order_date != fx.date));
}
