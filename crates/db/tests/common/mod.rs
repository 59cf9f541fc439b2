//! Behaviour shared by every `Store` implementation.
//!
//! Each function drives the repositories against whatever store it is given,
//! so `memory_store.rs` and `postgres_store.rs` assert the same contract.

#![allow(dead_code)]

use assert_matches::assert_matches;
use huecos_core::error::CoreError;
use huecos_core::location::{LocationSize, LocationStatus};
use huecos_db::models::location::{CreateLocation, LocationFilter, UpdateLocation};
use huecos_db::models::movement::{MovementFilter, RecordMovement};
use huecos_db::repositories::{LocationRepo, MovementRecorder};
use huecos_db::{Store, StoreError};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn new_location(id: &str, size: LocationSize, status: LocationStatus) -> CreateLocation {
    CreateLocation {
        id: id.to_string(),
        size,
        status,
    }
}

pub fn movement(cart: &str, location: &str, status: LocationStatus) -> RecordMovement {
    RecordMovement {
        cart_barcode: cart.to_string(),
        location_code: location.to_string(),
        status,
        request_id: None,
    }
}

// ---------------------------------------------------------------------------
// Location CRUD
// ---------------------------------------------------------------------------

pub async fn create_then_get_round_trips(store: &dyn Store) {
    let created = LocationRepo::create(
        store,
        &new_location("U010101A1", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();

    let fetched = LocationRepo::find_by_id(store, "U010101A1")
        .await
        .unwrap()
        .expect("location should exist");
    assert_eq!(fetched, created);
    assert_eq!(fetched.size, LocationSize::Small);
    assert_eq!(fetched.status, LocationStatus::Empty);
}

pub async fn create_trims_scanned_code(store: &dyn Store) {
    let created = LocationRepo::create(
        store,
        &new_location("  U020202B2\n", LocationSize::Large, LocationStatus::Half),
    )
    .await
    .unwrap();
    assert_eq!(created.id, "U020202B2");
    assert!(LocationRepo::find_by_id(store, "U020202B2").await.unwrap().is_some());
}

pub async fn duplicate_create_is_rejected(store: &dyn Store) {
    let input = new_location("DUP1", LocationSize::Medium, LocationStatus::Empty);
    LocationRepo::create(store, &input).await.unwrap();

    let err = LocationRepo::create(store, &input).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::DuplicateKey { entity: "Location", ref id }) if id == "DUP1"
    );

    let all = LocationRepo::list(store).await.unwrap();
    assert_eq!(all.iter().filter(|l| l.id == "DUP1").count(), 1);
}

pub async fn update_status_keeps_other_fields(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("U1", LocationSize::Large, LocationStatus::Empty),
    )
    .await
    .unwrap();
    LocationRepo::create(
        store,
        &new_location("U2", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();

    let update = UpdateLocation {
        size: None,
        status: Some(LocationStatus::Half),
    };
    LocationRepo::update(store, "U1", &update).await.unwrap();

    let all = LocationRepo::list(store).await.unwrap();
    let matching: Vec<_> = all.iter().filter(|l| l.id == "U1").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].status, LocationStatus::Half);
    assert_eq!(matching[0].size, LocationSize::Large);

    let other = all.iter().find(|l| l.id == "U2").unwrap();
    assert_eq!(other.status, LocationStatus::Empty);
}

pub async fn update_missing_is_not_found(store: &dyn Store) {
    let update = UpdateLocation {
        size: Some(LocationSize::Small),
        status: None,
    };
    let err = LocationRepo::update(store, "GHOST", &update).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

pub async fn empty_update_is_rejected(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("U1", LocationSize::Large, LocationStatus::Empty),
    )
    .await
    .unwrap();
    let err = LocationRepo::update(store, "U1", &UpdateLocation::default())
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
}

pub async fn delete_then_get_is_absent(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("DEL1", LocationSize::Small, LocationStatus::Full),
    )
    .await
    .unwrap();

    LocationRepo::delete(store, "DEL1").await.unwrap();

    assert!(LocationRepo::find_by_id(store, "DEL1").await.unwrap().is_none());
    let err = LocationRepo::get(store, "DEL1").await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));

    let err = LocationRepo::delete(store, "DEL1").await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

pub async fn list_filters_and_orders(store: &dyn Store) {
    for (id, size, status) in [
        ("A-01", LocationSize::Small, LocationStatus::Empty),
        ("A-02", LocationSize::Medium, LocationStatus::Full),
        ("B-01", LocationSize::Large, LocationStatus::Full),
    ] {
        LocationRepo::create(store, &new_location(id, size, status))
            .await
            .unwrap();
    }

    let all = LocationRepo::list(store).await.unwrap();
    let ids: Vec<_> = all.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["B-01", "A-02", "A-01"]);

    let filter = LocationFilter {
        q: Some("a-".into()),
        status: Some(LocationStatus::Full),
        size: None,
    };
    let filtered = LocationRepo::list_filtered(store, &filter).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "A-02");

    let summary = LocationRepo::summary(store).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.full, 2);
    assert_eq!(summary.empty, 1);
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

pub async fn movement_updates_status_and_appends_log(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("U010101A1", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();

    let recorded = MovementRecorder::record(
        store,
        &movement("C1", "U010101A1", LocationStatus::Full),
    )
    .await
    .unwrap();
    assert!(!recorded.replayed);
    assert_eq!(recorded.location.unwrap().status, LocationStatus::Full);

    let location = LocationRepo::get(store, "U010101A1").await.unwrap();
    assert_eq!(location.status, LocationStatus::Full);

    let logs = MovementRecorder::history(store, &MovementFilter::default())
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].cart_barcode, "C1");
    assert_eq!(logs[0].location_code, "U010101A1");
    assert_eq!(logs[0].status, LocationStatus::Full);
}

pub async fn second_movement_wins(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("U9", LocationSize::Medium, LocationStatus::Empty),
    )
    .await
    .unwrap();

    MovementRecorder::record(store, &movement("C1", "U9", LocationStatus::Half))
        .await
        .unwrap();
    MovementRecorder::record(store, &movement("C2", "U9", LocationStatus::Full))
        .await
        .unwrap();

    let filter = MovementFilter {
        location_code: Some("U9".into()),
        limit: None,
    };
    let logs = MovementRecorder::history(store, &filter).await.unwrap();
    assert_eq!(logs.len(), 2);
    // Newest first.
    assert_eq!(logs[0].cart_barcode, "C2");
    assert_eq!(logs[1].cart_barcode, "C1");

    let location = LocationRepo::get(store, "U9").await.unwrap();
    assert_eq!(location.status, LocationStatus::Full);
}

pub async fn movement_for_unknown_location_is_rejected(store: &dyn Store) {
    let err = MovementRecorder::record(store, &movement("C1", "NOWHERE", LocationStatus::Full))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Location", .. }));

    let logs = MovementRecorder::history(store, &MovementFilter::default())
        .await
        .unwrap();
    assert!(logs.is_empty(), "no orphan audit entry may be written");
}

pub async fn movement_with_blank_fields_is_rejected(store: &dyn Store) {
    let err = MovementRecorder::record(store, &movement("  ", "U1", LocationStatus::Full))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let err = MovementRecorder::record(store, &movement("C1", "", LocationStatus::Full))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
}

pub async fn retried_movement_is_applied_once(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("R1", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();

    let mut input = movement("C7", "R1", LocationStatus::Half);
    input.request_id = Some(Uuid::new_v4());

    let first = MovementRecorder::record(store, &input).await.unwrap();
    let second = MovementRecorder::record(store, &input).await.unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(first.movement.id, second.movement.id);

    let logs = MovementRecorder::history(store, &MovementFilter::default())
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
}

pub async fn reused_request_id_with_different_movement_is_rejected(store: &dyn Store) {
    for code in ["P1", "P2"] {
        LocationRepo::create(
            store,
            &new_location(code, LocationSize::Small, LocationStatus::Empty),
        )
        .await
        .unwrap();
    }
    let request_id = Some(Uuid::new_v4());

    let mut first = movement("C1", "P1", LocationStatus::Full);
    first.request_id = request_id;
    MovementRecorder::record(store, &first).await.unwrap();

    let mut second = movement("C2", "P2", LocationStatus::Half);
    second.request_id = request_id;
    let err = MovementRecorder::record(store, &second).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Conflict(_)));

    let untouched = LocationRepo::get(store, "P2").await.unwrap();
    assert_eq!(untouched.status, LocationStatus::Empty);

    let logs = MovementRecorder::history(store, &MovementFilter::default())
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].cart_barcode, "C1");
}

pub async fn history_respects_limit(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("L1", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();
    for cart in ["C1", "C2", "C3"] {
        MovementRecorder::record(store, &movement(cart, "L1", LocationStatus::Half))
            .await
            .unwrap();
    }

    let filter = MovementFilter {
        location_code: None,
        limit: Some(2),
    };
    let logs = MovementRecorder::history(store, &filter).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].cart_barcode, "C3");
}

pub async fn logs_survive_location_deletion(store: &dyn Store) {
    LocationRepo::create(
        store,
        &new_location("GONE", LocationSize::Small, LocationStatus::Empty),
    )
    .await
    .unwrap();
    MovementRecorder::record(store, &movement("C1", "GONE", LocationStatus::Full))
        .await
        .unwrap();
    LocationRepo::delete(store, "GONE").await.unwrap();

    let filter = MovementFilter {
        location_code: Some("GONE".into()),
        limit: None,
    };
    let logs = MovementRecorder::history(store, &filter).await.unwrap();
    assert_eq!(logs.len(), 1);
}
