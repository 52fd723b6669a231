//! In-memory seat store for single-node deployments and tests.
//!
//! A transaction owns the table mutex from `begin` until it is committed,
//! rolled back or dropped, so coordinators are fully serialized. Writes are
//! staged inside the transaction and only applied on commit.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::{SeatStore, SeatTransaction};
use crate::error::StoreError;
use crate::models::{Seat, SeatNumber};

#[derive(Debug, Default)]
struct SeatTable {
    /// `reserved[i]` is the state of seat `i + 1`.
    reserved: Vec<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySeatStore {
    table: Arc<Mutex<SeatTable>>,
}

impl MemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store with `total` seats, of which `reserved` are already taken.
    pub fn with_reserved(total: u32, reserved: &[SeatNumber]) -> Self {
        let mut flags = vec![false; total as usize];
        for &seat in reserved {
            if seat >= 1 && (seat as u32) <= total {
                flags[(seat - 1) as usize] = true;
            }
        }
        Self { table: Arc::new(Mutex::new(SeatTable { reserved: flags })) }
    }
}

pub struct MemorySeatTx {
    table: OwnedMutexGuard<SeatTable>,
    staged: BTreeSet<SeatNumber>,
}

impl MemorySeatTx {
    fn is_free(&self, seat: SeatNumber) -> bool {
        seat >= 1
            && self
                .table
                .reserved
                .get((seat - 1) as usize)
                .is_some_and(|reserved| !reserved)
            && !self.staged.contains(&seat)
    }

    fn free_seats(&self) -> impl Iterator<Item = SeatNumber> + '_ {
        (1..=self.table.reserved.len() as SeatNumber).filter(|&seat| self.is_free(seat))
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    type Tx = MemorySeatTx;

    async fn begin(&self) -> Result<MemorySeatTx, StoreError> {
        let table = self.table.clone().lock_owned().await;
        Ok(MemorySeatTx { table, staged: BTreeSet::new() })
    }

    async fn provision(&self, total: u32) -> Result<u64, StoreError> {
        let mut table = self.table.lock().await;
        let existing = table.reserved.len();
        let target = (total as usize).max(existing);
        table.reserved.resize(target, false);
        let inserted = (target - existing) as u64;
        info!(inserted, total = target, "In-memory seats provisioned");
        Ok(inserted)
    }

    async fn list_seats(&self) -> Result<Vec<Seat>, StoreError> {
        let table = self.table.lock().await;
        Ok(table
            .reserved
            .iter()
            .enumerate()
            .map(|(i, &is_reserved)| Seat { seat_number: i as SeatNumber + 1, is_reserved })
            .collect())
    }

    async fn reset(&self, prebook_ratio: f64) -> Result<u64, StoreError> {
        let mut table = self.table.lock().await;
        let prebooked = {
            let mut rng = rand::thread_rng();
            let mut prebooked: u64 = 0;
            for seat in table.reserved.iter_mut() {
                *seat = rng.gen_bool(prebook_ratio);
                if *seat {
                    prebooked += 1;
                }
            }
            prebooked
        };
        Ok(prebooked)
    }
}

#[async_trait]
impl SeatTransaction for MemorySeatTx {
    async fn lock_free_seats(&mut self, limit: Option<u32>) -> Result<Vec<SeatNumber>, StoreError> {
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(self.free_seats().take(limit).collect())
    }

    async fn count_free(&mut self) -> Result<u32, StoreError> {
        Ok(self.free_seats().count() as u32)
    }

    async fn count_total(&mut self) -> Result<u32, StoreError> {
        Ok(self.table.reserved.len() as u32)
    }

    async fn reserved_seats(&mut self) -> Result<Vec<SeatNumber>, StoreError> {
        let staged = &self.staged;
        Ok(self
            .table
            .reserved
            .iter()
            .enumerate()
            .map(|(i, &reserved)| (i as SeatNumber + 1, reserved))
            .filter(|(seat, reserved)| *reserved || staged.contains(seat))
            .map(|(seat, _)| seat)
            .collect())
    }

    async fn mark_reserved(&mut self, seats: &[SeatNumber]) -> Result<u64, StoreError> {
        let mut changed = 0;
        for &seat in seats {
            if self.is_free(seat) {
                self.staged.insert(seat);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        for seat in std::mem::take(&mut self.staged) {
            self.table.reserved[(seat - 1) as usize] = true;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        debug!(discarded = self.staged.len(), "In-memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provision_is_idempotent() {
        let store = MemorySeatStore::new();
        assert_eq!(store.provision(80).await.unwrap(), 80);
        assert_eq!(store.provision(80).await.unwrap(), 0);
        assert_eq!(store.list_seats().await.unwrap().len(), 80);
    }

    #[tokio::test]
    async fn commit_applies_staged_seats() {
        let store = MemorySeatStore::with_reserved(10, &[2]);
        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.lock_free_seats(Some(3)).await.unwrap(), vec![1, 3, 4]);
        assert_eq!(tx.mark_reserved(&[1, 2, 3]).await.unwrap(), 2);
        assert_eq!(tx.count_free().await.unwrap(), 7);
        tx.commit().await.unwrap();

        let reserved: Vec<SeatNumber> = store
            .list_seats()
            .await
            .unwrap()
            .into_iter()
            .filter(|s| s.is_reserved)
            .map(|s| s.seat_number)
            .collect();
        assert_eq!(reserved, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn rollback_and_drop_discard_writes() {
        let store = MemorySeatStore::with_reserved(5, &[]);

        let mut tx = store.begin().await.unwrap();
        tx.mark_reserved(&[1, 2]).await.unwrap();
        tx.rollback().await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.mark_reserved(&[3]).await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_free().await.unwrap(), 5);
        assert!(tx.reserved_seats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_reserved_ignores_unknown_seats() {
        let store = MemorySeatStore::with_reserved(3, &[]);
        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.mark_reserved(&[0, 4, 99]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reset_with_full_ratio_books_everything() {
        let store = MemorySeatStore::with_reserved(6, &[1]);
        assert_eq!(store.reset(1.0).await.unwrap(), 6);
        assert_eq!(store.reset(0.0).await.unwrap(), 0);
        assert!(store.list_seats().await.unwrap().iter().all(|s| !s.is_reserved));
    }
}
