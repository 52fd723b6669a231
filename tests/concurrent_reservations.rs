use std::collections::HashSet;
use std::sync::Arc;

use coach_booking::error::AllocationError;
use coach_booking::models::{SeatLayout, SeatNumber};
use coach_booking::services::{AllocationService, ReservationCoordinator};
use coach_booking::storage::{MemorySeatStore, SeatStore};
use futures::future::join_all;

async fn coach() -> Arc<ReservationCoordinator<MemorySeatStore>> {
    let store = MemorySeatStore::new();
    store.provision(80).await.unwrap();
    Arc::new(ReservationCoordinator::new(store, SeatLayout::default(), 7))
}

async fn run_concurrently(
    service: Arc<ReservationCoordinator<MemorySeatStore>>,
    requests: Vec<(i64, &'static str)>,
) -> Vec<(i64, Result<Vec<SeatNumber>, AllocationError>)> {
    let handles = requests.into_iter().map(|(count, priority)| {
        let service = service.clone();
        tokio::spawn(async move { (count, service.reserve(count, priority).await) })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("reservation task panicked"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_within_capacity_all_succeed_without_overlap() {
    let service = coach().await;
    let priorities = ["default", "together", "comfort", "whatever"];
    let requests: Vec<(i64, &'static str)> =
        (0..20).map(|i| ((i % 4) + 1, priorities[(i % 4) as usize])).collect();
    let requested: i64 = requests.iter().map(|(count, _)| count).sum();
    assert!(requested <= 80);

    let results = run_concurrently(service.clone(), requests).await;

    let mut seen = HashSet::new();
    for (count, result) in results {
        let seats = result.expect("reservation within capacity must succeed");
        assert_eq!(seats.len(), count as usize);
        for seat in seats {
            assert!(seen.insert(seat), "seat {} allocated twice", seat);
        }
    }

    let map = service.seat_map().await.unwrap();
    assert_eq!(map.reserved as i64, requested);
    assert_eq!(seen.len() as i64, requested);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn oversubscribed_coach_never_double_books() {
    let service = coach().await;
    let requests: Vec<(i64, &'static str)> = (0..16).map(|_| (7, "together")).collect();

    let results = run_concurrently(service.clone(), requests).await;

    let mut seen = HashSet::new();
    let mut failures = 0;
    for (count, result) in results {
        match result {
            Ok(seats) => {
                assert_eq!(seats.len(), count as usize);
                for seat in seats {
                    assert!(seen.insert(seat), "seat {} allocated twice", seat);
                }
            }
            Err(err) => {
                assert_eq!(err.code(), "INSUFFICIENT_AVAILABILITY");
                failures += 1;
            }
        }
    }

    // 80 seats fit eleven requests of seven
    assert_eq!(seen.len(), 77);
    assert_eq!(failures, 5);
    assert_eq!(service.seat_map().await.unwrap().available, 3);
}

#[tokio::test]
async fn failed_requests_leave_the_coach_untouched() {
    let service = coach().await;
    service.reserve(7, "default").await.unwrap();
    let before = service.seat_map().await.unwrap();

    assert_eq!(service.reserve(0, "default").await.unwrap_err().code(), "INVALID_REQUEST");
    assert_eq!(service.reserve(8, "comfort").await.unwrap_err().code(), "INVALID_REQUEST");

    assert_eq!(service.seat_map().await.unwrap(), before);
}

#[tokio::test]
async fn cluster_fallback_is_used_before_reporting_unavailability() {
    // leave only the odd seats of the first two rows free
    let reserved: Vec<SeatNumber> = (1..=80).filter(|s| *s > 14 || s % 2 == 0).collect();
    let store = MemorySeatStore::with_reserved(80, &reserved);
    let service = ReservationCoordinator::new(store, SeatLayout::default(), 7);

    let seats = service.reserve(3, "together").await.unwrap();
    assert_eq!(seats, vec![1, 3, 5]);
}
