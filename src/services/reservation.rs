//! Reservation coordinator.
//!
//! Each call runs `Start -> SnapshotLocked -> Committed | Aborted`:
//! validate the request, open a transaction and lock the free seats, pick
//! seats from that locked snapshot, mark exactly those seats reserved and
//! commit. Every failure after `begin` rolls the transaction back, so a
//! request reserves either all of its seats or none.

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::{selection, snapshot};
use crate::error::{AllocationError, StoreError};
use crate::models::{Priority, SeatLayout, SeatMap, SeatNumber};
use crate::storage::{SeatStore, SeatTransaction};

/// Contract used by the HTTP layer.
#[async_trait]
pub trait AllocationService: Send + Sync {
    /// Reserves `count` seats chosen according to `priority`.
    /// Unrecognised priorities are treated as `default`.
    async fn reserve(&self, count: i64, priority: &str) -> Result<Vec<SeatNumber>, AllocationError>;

    async fn seat_map(&self) -> Result<SeatMap, AllocationError>;

    /// Frees the whole coach and pre-books a random share of it.
    async fn reset_demo(&self, prebook_ratio: f64) -> Result<u64, AllocationError>;
}

pub struct ReservationCoordinator<S: SeatStore> {
    store: S,
    layout: SeatLayout,
    max_seats_per_request: u32,
}

impl<S: SeatStore> ReservationCoordinator<S> {
    pub fn new(store: S, layout: SeatLayout, max_seats_per_request: u32) -> Self {
        Self { store, layout, max_seats_per_request }
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validate_count(&self, count: i64) -> Result<u32, AllocationError> {
        if count < 1 || count > i64::from(self.max_seats_per_request) {
            return Err(AllocationError::InvalidRequest {
                requested: count,
                max: self.max_seats_per_request,
            });
        }
        Ok(count as u32)
    }

    pub async fn reserve_seats(
        &self,
        count: i64,
        priority: Priority,
    ) -> Result<Vec<SeatNumber>, AllocationError> {
        let requested = self.validate_count(count).inspect_err(|err| {
            warn!(count, error = %err, "Rejected reservation request");
        })?;

        let mut tx = self.store.begin().await.map_err(|err| {
            error!(error = %err, "Failed to open reservation transaction");
            AllocationError::from(err)
        })?;

        match self.allocate_locked(&mut tx, requested, priority).await {
            Ok(seats) => {
                tx.commit().await.map_err(|err| {
                    error!(error = %err, "Failed to commit reservation");
                    AllocationError::from(err)
                })?;
                info!(seats = ?seats, priority = %priority, "Seats reserved");
                Ok(seats)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed, transaction dropped");
                }
                if err.is_retryable() {
                    error!(requested, priority = %priority, error = %err, "Reservation aborted");
                } else {
                    warn!(requested, priority = %priority, code = err.code(), "Reservation aborted");
                }
                Err(err)
            }
        }
    }

    async fn allocate_locked(
        &self,
        tx: &mut S::Tx,
        requested: u32,
        priority: Priority,
    ) -> Result<Vec<SeatNumber>, AllocationError> {
        let snapshot = snapshot::read_locked(tx, &self.layout).await?;

        let available = tx.count_free().await?;
        if available < requested {
            return Err(AllocationError::InsufficientAvailability { requested, available });
        }

        let selected = selection::select_seats(&self.layout, &snapshot.free, requested as usize, priority);
        if selected.len() < requested as usize {
            return Err(AllocationError::NoMatchingAllocation { requested, priority });
        }

        let updated = tx.mark_reserved(&selected).await?;
        if updated != selected.len() as u64 {
            return Err(StoreError::Conflict(format!(
                "{} of {} selected seats could be reserved",
                updated,
                selected.len()
            ))
            .into());
        }

        Ok(selected)
    }
}

#[async_trait]
impl<S: SeatStore> AllocationService for ReservationCoordinator<S> {
    async fn reserve(&self, count: i64, priority: &str) -> Result<Vec<SeatNumber>, AllocationError> {
        self.reserve_seats(count, Priority::decode(priority)).await
    }

    async fn seat_map(&self) -> Result<SeatMap, AllocationError> {
        let seats = self.store.list_seats().await?;
        Ok(SeatMap::from_seats(seats, &self.layout))
    }

    async fn reset_demo(&self, prebook_ratio: f64) -> Result<u64, AllocationError> {
        let ratio = if prebook_ratio.is_nan() { 0.0 } else { prebook_ratio.clamp(0.0, 1.0) };
        let prebooked = self.store.reset(ratio).await?;
        warn!(prebooked, ratio, "Seat table reset for demo");
        Ok(prebooked)
    }
}
