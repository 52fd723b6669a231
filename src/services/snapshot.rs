use crate::error::StoreError;
use crate::models::{FreeSeat, SeatLayout, SeatNumber};
use crate::storage::SeatTransaction;

/// Occupancy as seen from inside a reservation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub total_seats: u32,
    /// Free seats in ascending seat order, each locked by the reading transaction.
    pub free: Vec<FreeSeat>,
    pub reserved: Vec<SeatNumber>,
}

impl OccupancySnapshot {
    pub fn free_count(&self) -> u32 {
        self.free.len() as u32
    }
}

/// Locks every free seat and reads the occupancy through `tx`.
///
/// The locks live as long as `tx`, so whatever the caller decides from this
/// snapshot still holds when it writes in the same transaction.
pub async fn read_locked<T: SeatTransaction>(
    tx: &mut T,
    layout: &SeatLayout,
) -> Result<OccupancySnapshot, StoreError> {
    let free = tx
        .lock_free_seats(None)
        .await?
        .into_iter()
        .map(|seat| FreeSeat::new(seat, layout))
        .collect();
    let total_seats = tx.count_total().await?;
    let reserved = tx.reserved_seats().await?;

    Ok(OccupancySnapshot { total_seats, free, reserved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySeatStore, SeatStore};

    #[tokio::test]
    async fn snapshot_splits_free_and_reserved() {
        let layout = SeatLayout::new(10, 7);
        let store = MemorySeatStore::with_reserved(10, &[2, 9]);
        let mut tx = store.begin().await.unwrap();

        let snapshot = read_locked(&mut tx, &layout).await.unwrap();
        assert_eq!(snapshot.total_seats, 10);
        assert_eq!(snapshot.reserved, vec![2, 9]);
        assert_eq!(snapshot.free_count(), 8);
        assert_eq!(snapshot.free[0], FreeSeat { seat_number: 1, row: 0 });
        assert_eq!(snapshot.free.last(), Some(&FreeSeat { seat_number: 10, row: 1 }));
    }
}
