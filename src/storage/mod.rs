//! Storage boundary for the seat table.
//!
//! A [`SeatStore`] hands out [`SeatTransaction`]s. Everything the reservation
//! coordinator reads and writes goes through one transaction, and the free
//! seats it reads are locked exclusively until that transaction commits or
//! rolls back, so two coordinators can never act on the same free seat.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Seat, SeatNumber};

pub use memory::MemorySeatStore;
pub use postgres::PgSeatStore;

#[async_trait]
pub trait SeatStore: Send + Sync + 'static {
    type Tx: SeatTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Creates seats `1..=total` that do not exist yet. Returns how many were inserted.
    async fn provision(&self, total: u32) -> Result<u64, StoreError>;

    /// All seats ordered by seat number. Not locked.
    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError>;

    /// Frees every seat, then reserves each one with probability `prebook_ratio`.
    /// Returns the number of pre-booked seats.
    async fn reset(&self, prebook_ratio: f64) -> Result<u64, StoreError>;
}

/// One open transaction against the seat table. Dropping it without
/// calling [`SeatTransaction::commit`] discards every staged write.
#[async_trait]
pub trait SeatTransaction: Send + Sized {
    /// Locks and returns free seat numbers in ascending order, at most `limit` of them.
    async fn lock_free_seats(&mut self, limit: Option<u32>) -> Result<Vec<SeatNumber>, StoreError>;

    async fn count_free(&mut self) -> Result<u32, StoreError>;

    async fn count_total(&mut self) -> Result<u32, StoreError>;

    async fn reserved_seats(&mut self) -> Result<Vec<SeatNumber>, StoreError>;

    /// Marks exactly the given seats reserved, skipping any already reserved.
    /// Returns the number of seats that changed.
    async fn mark_reserved(&mut self, seats: &[SeatNumber]) -> Result<u64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}
