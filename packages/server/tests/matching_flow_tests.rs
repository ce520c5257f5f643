//! End-to-end matching scenarios over the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use server_core::common::Coordinate;
use server_core::domains::matching::data::{InMemoryLocationStore, LocationStore};
use server_core::domains::matching::models::{BuddyResponse, RequestStatus};
use server_core::domains::matching::{
    MatchEngine, MatchOutcome, MatchingError, MatchingService, RequestLedger,
};

const FRESHNESS_SECS: i64 = 300;

fn service_with_store() -> (Arc<InMemoryLocationStore>, MatchingService) {
    let store = Arc::new(InMemoryLocationStore::new());
    let engine = MatchEngine::new(store.clone(), Duration::seconds(FRESHNESS_SECS));
    let ledger = RequestLedger::new(store.clone());
    (store, MatchingService::new(engine, ledger))
}

async fn report(store: &InMemoryLocationStore, id: &str, name: &str, lat: f64, lng: f64) {
    store
        .upsert(id, name, Coordinate::new(lat, lng), true, Utc::now())
        .await
        .unwrap();
}

fn must_match(outcome: MatchOutcome) -> (uuid::Uuid, server_core::domains::matching::models::AssignedBuddy) {
    match outcome {
        MatchOutcome::Matched { request_id, buddy } => (request_id, buddy),
        MatchOutcome::NoCandidate => panic!("expected a match"),
    }
}

#[tokio::test]
async fn nearby_available_buddy_is_matched() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (_, buddy) = must_match(outcome);

    assert_eq!(buddy.buddy_id, "b1");
    assert_eq!(buddy.name, "Sam");
    // One thousandth of a degree each way is roughly 140 m here.
    assert!(buddy.distance_km > 0.1 && buddy.distance_km < 0.2);
}

#[tokio::test]
async fn matched_buddy_is_unavailable_until_released() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (request_id, _) = must_match(outcome);

    // A second request finds nobody while b1 is reserved.
    let second = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    assert!(matches!(second, MatchOutcome::NoCandidate));

    // Decline releases the buddy; the next request matches again.
    let status = service
        .respond(request_id, "b1", BuddyResponse::Declined)
        .await
        .unwrap();
    assert_eq!(status, RequestStatus::Declined);

    let third = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (_, buddy) = must_match(third);
    assert_eq!(buddy.buddy_id, "b1");
}

#[tokio::test]
async fn accept_then_complete_restores_availability() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (request_id, _) = must_match(outcome);

    let status = service
        .respond(request_id, "b1", BuddyResponse::Accepted)
        .await
        .unwrap();
    assert_eq!(status, RequestStatus::Accepted);

    // Accepting keeps the buddy reserved through the engagement.
    let during = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    assert!(matches!(during, MatchOutcome::NoCandidate));

    let status = service.complete(request_id).await.unwrap();
    assert_eq!(status, RequestStatus::Completed);

    let (status, buddy_id) = service.status_of(request_id).await.unwrap();
    assert_eq!(status, RequestStatus::Completed);
    assert_eq!(buddy_id, "b1");

    // Buddy is available again.
    let after = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    must_match(after);
}

#[tokio::test]
async fn completing_twice_is_invalid() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (request_id, _) = must_match(outcome);

    service
        .respond(request_id, "b1", BuddyResponse::Accepted)
        .await
        .unwrap();
    service.complete(request_id).await.unwrap();

    let err = service.complete(request_id).await.unwrap_err();
    assert!(matches!(err, MatchingError::InvalidTransition { .. }));
}

#[tokio::test]
async fn completing_a_pending_request_is_invalid() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (request_id, _) = must_match(outcome);

    let err = service.complete(request_id).await.unwrap_err();
    assert!(matches!(err, MatchingError::InvalidTransition { .. }));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (_store, service) = service_with_store();
    let ghost = uuid::Uuid::now_v7();

    assert!(matches!(
        service.status_of(ghost).await.unwrap_err(),
        MatchingError::NotFound
    ));
    assert!(matches!(
        service.complete(ghost).await.unwrap_err(),
        MatchingError::NotFound
    ));
    assert!(matches!(
        service
            .respond(ghost, "b1", BuddyResponse::Accepted)
            .await
            .unwrap_err(),
        MatchingError::NotFound
    ));
}

#[tokio::test]
async fn responding_after_accept_is_invalid() {
    let (store, service) = service_with_store();
    report(&store, "b1", "Sam", 40.0, -74.0).await;

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    let (request_id, _) = must_match(outcome);

    service
        .respond(request_id, "b1", BuddyResponse::Accepted)
        .await
        .unwrap();

    let err = service
        .respond(request_id, "b1", BuddyResponse::Declined)
        .await
        .unwrap_err();
    assert!(matches!(err, MatchingError::InvalidTransition { .. }));
}

#[tokio::test]
async fn stale_location_reports_are_not_matched() {
    let (store, service) = service_with_store();
    store
        .upsert(
            "b1",
            "Sam",
            Coordinate::new(40.0, -74.0),
            true,
            Utc::now() - Duration::seconds(FRESHNESS_SECS + 60),
        )
        .await
        .unwrap();

    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    assert!(matches!(outcome, MatchOutcome::NoCandidate));

    // A fresh report makes the buddy eligible again.
    report(&store, "b1", "Sam", 40.0, -74.0).await;
    let outcome = service
        .create_request(Coordinate::new(40.001, -74.001), 5.0)
        .await
        .unwrap();
    must_match(outcome);
}

#[tokio::test]
async fn closest_of_several_buddies_wins() {
    let (store, service) = service_with_store();
    report(&store, "far", "Robin", 40.02, -74.02).await;
    report(&store, "near", "Sam", 40.001, -74.001).await;
    report(&store, "mid", "Alex", 40.01, -74.01).await;

    let outcome = service
        .create_request(Coordinate::new(40.0, -74.0), 5.0)
        .await
        .unwrap();
    let (_, buddy) = must_match(outcome);
    assert_eq!(buddy.buddy_id, "near");
}

#[tokio::test]
async fn out_of_radius_buddy_is_no_candidate() {
    let (store, service) = service_with_store();
    // Minneapolis to St. Paul is roughly 16 km.
    report(&store, "b1", "Sam", 44.95, -93.09).await;

    let outcome = service
        .create_request(Coordinate::new(44.98, -93.27), 5.0)
        .await
        .unwrap();
    assert!(matches!(outcome, MatchOutcome::NoCandidate));

    // A wider radius reaches the same buddy.
    let outcome = service
        .create_request(Coordinate::new(44.98, -93.27), 20.0)
        .await
        .unwrap();
    must_match(outcome);
}
