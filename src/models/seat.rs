use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::layout::{SeatLayout, SeatNumber};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub seat_number: SeatNumber,
    pub is_reserved: bool,
}

/// A free seat together with the row it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSeat {
    pub seat_number: SeatNumber,
    pub row: u32,
}

impl FreeSeat {
    pub fn new(seat_number: SeatNumber, layout: &SeatLayout) -> Self {
        Self { seat_number, row: layout.row_of(seat_number) }
    }
}

// Seat as shown on the seat map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat_number: SeatNumber,
    pub is_reserved: bool,
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatMap {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub seats: Vec<SeatView>,
}

impl SeatMap {
    pub fn from_seats(seats: Vec<Seat>, layout: &SeatLayout) -> Self {
        let seats: Vec<SeatView> = seats
            .into_iter()
            .map(|seat| {
                let (row, column) = layout.coordinates_of(seat.seat_number);
                SeatView { seat_number: seat.seat_number, is_reserved: seat.is_reserved, row, column }
            })
            .collect();
        let reserved = seats.iter().filter(|s| s.is_reserved).count();

        SeatMap {
            total: seats.len(),
            available: seats.len() - reserved,
            reserved,
            seats,
        }
    }
}
