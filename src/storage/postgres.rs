use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use super::{SeatStore, SeatTransaction};
use crate::database::Database;
use crate::error::StoreError;
use crate::models::{Seat, SeatNumber};

/// Seat store backed by the `seats` table in Postgres.
#[derive(Clone)]
pub struct PgSeatStore {
    db: Database,
    lock_timeout_ms: u64,
}

impl PgSeatStore {
    pub fn new(db: Database, lock_timeout_ms: u64) -> Self {
        Self { db, lock_timeout_ms }
    }
}

pub struct PgSeatTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SeatStore for PgSeatStore {
    type Tx = PgSeatTx;

    async fn begin(&self) -> Result<PgSeatTx, StoreError> {
        let mut tx = self.db.pool.begin().await?;

        // bounded wait on row locks held by other reservations
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await?;

        Ok(PgSeatTx { tx })
    }

    async fn provision(&self, total: u32) -> Result<u64, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO seats (seat_number)
             SELECT generate_series(1, $1)
             ON CONFLICT (seat_number) DO NOTHING"
        )
        .bind(total as i32)
        .execute(&self.db.pool)
        .await?
        .rows_affected();

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats")
            .fetch_one(&self.db.pool)
            .await?;
        if existing != total as i64 {
            warn!(existing, expected = total, "Seat table size differs from configured layout");
        }

        info!(inserted, total, "Seats provisioned");
        Ok(inserted)
    }

    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT seat_number, is_reserved FROM seats ORDER BY seat_number"
        )
        .fetch_all(&self.db.pool)
        .await?;
        Ok(seats)
    }

    async fn reset(&self, prebook_ratio: f64) -> Result<u64, StoreError> {
        let mut tx = self.db.pool.begin().await?;

        sqlx::query("UPDATE seats SET is_reserved = FALSE")
            .execute(&mut *tx)
            .await?;

        let prebooked = sqlx::query("UPDATE seats SET is_reserved = TRUE WHERE random() < $1")
            .bind(prebook_ratio)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(prebooked)
    }
}

#[async_trait]
impl SeatTransaction for PgSeatTx {
    async fn lock_free_seats(&mut self, limit: Option<u32>) -> Result<Vec<SeatNumber>, StoreError> {
        // LIMIT NULL means no limit
        let seats = sqlx::query_scalar::<_, SeatNumber>(
            "SELECT seat_number FROM seats
             WHERE is_reserved = FALSE
             ORDER BY seat_number
             LIMIT $1
             FOR UPDATE"
        )
        .bind(limit.map(i64::from))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(seats)
    }

    async fn count_free(&mut self) -> Result<u32, StoreError> {
        let free: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE is_reserved = FALSE")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(free as u32)
    }

    async fn count_total(&mut self) -> Result<u32, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(total as u32)
    }

    async fn reserved_seats(&mut self) -> Result<Vec<SeatNumber>, StoreError> {
        let seats = sqlx::query_scalar::<_, SeatNumber>(
            "SELECT seat_number FROM seats WHERE is_reserved = TRUE ORDER BY seat_number"
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(seats)
    }

    async fn mark_reserved(&mut self, seats: &[SeatNumber]) -> Result<u64, StoreError> {
        let updated = sqlx::query(
            "UPDATE seats
             SET is_reserved = TRUE
             WHERE seat_number = ANY($1) AND is_reserved = FALSE"
        )
        .bind(seats)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(updated)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
