//! Geometry of the coach: where a seat number sits and how far apart two seats are.
//!
//! Seats are numbered `1..=total_seats` left to right, row by row. Every row
//! holds `row_width` seats except possibly the last one.

use serde::{Deserialize, Serialize};

/// Seat identifier as stored in the `seats` table.
pub type SeatNumber = i32;

/// Columns (0-based) that sit next to the aisle.
pub const AISLE_COLUMNS: [u32; 2] = [2, 4];

/// Comfort classification of a seat by its column within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortTier {
    Window,
    Aisle,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLayout {
    pub total_seats: u32,
    pub row_width: u32,
}

impl SeatLayout {
    pub fn new(total_seats: u32, row_width: u32) -> Self {
        Self { total_seats, row_width }
    }

    /// `(row, column)` of a seat, both 0-based.
    pub fn coordinates_of(&self, seat: SeatNumber) -> (u32, u32) {
        let index = (seat - 1).max(0) as u32;
        (index / self.row_width, index % self.row_width)
    }

    pub fn row_of(&self, seat: SeatNumber) -> u32 {
        self.coordinates_of(seat).0
    }

    pub fn column_of(&self, seat: SeatNumber) -> u32 {
        self.coordinates_of(seat).1
    }

    /// Manhattan distance between two seats on the row/column grid.
    pub fn distance(&self, a: SeatNumber, b: SeatNumber) -> u32 {
        let (row_a, col_a) = self.coordinates_of(a);
        let (row_b, col_b) = self.coordinates_of(b);
        row_a.abs_diff(row_b) + col_a.abs_diff(col_b)
    }

    pub fn comfort_tier(&self, seat: SeatNumber) -> ComfortTier {
        let column = self.column_of(seat);
        if column == 0 || column == self.row_width - 1 {
            ComfortTier::Window
        } else if AISLE_COLUMNS.contains(&column) {
            ComfortTier::Aisle
        } else {
            ComfortTier::Middle
        }
    }

    pub fn contains(&self, seat: SeatNumber) -> bool {
        seat >= 1 && (seat as u32) <= self.total_seats
    }
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self::new(80, 7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_follow_row_width() {
        let layout = SeatLayout::default();
        assert_eq!(layout.coordinates_of(1), (0, 0));
        assert_eq!(layout.coordinates_of(7), (0, 6));
        assert_eq!(layout.coordinates_of(8), (1, 0));
        assert_eq!(layout.coordinates_of(80), (11, 2));
    }

    #[test]
    fn distance_is_manhattan() {
        let layout = SeatLayout::default();
        assert_eq!(layout.distance(1, 1), 0);
        assert_eq!(layout.distance(1, 2), 1);
        // seat 9 is row 1, column 1
        assert_eq!(layout.distance(1, 9), 2);
        assert_eq!(layout.distance(7, 8), 7);
        assert_eq!(layout.distance(9, 1), layout.distance(1, 9));
    }

    #[test]
    fn comfort_tiers_by_column() {
        let layout = SeatLayout::default();
        let tiers: Vec<ComfortTier> = (1..=7).map(|s| layout.comfort_tier(s)).collect();
        assert_eq!(
            tiers,
            vec![
                ComfortTier::Window,
                ComfortTier::Middle,
                ComfortTier::Aisle,
                ComfortTier::Middle,
                ComfortTier::Aisle,
                ComfortTier::Middle,
                ComfortTier::Window,
            ]
        );
        // short last row still uses the full-width columns
        assert_eq!(layout.comfort_tier(80), ComfortTier::Aisle);
    }

    #[test]
    fn contains_is_dense_range() {
        let layout = SeatLayout::default();
        assert!(!layout.contains(0));
        assert!(layout.contains(1));
        assert!(layout.contains(80));
        assert!(!layout.contains(81));
    }
}
