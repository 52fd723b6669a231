pub mod layout;
pub mod priority;
pub mod seat;

pub use layout::{ComfortTier, SeatLayout, SeatNumber};
pub use priority::Priority;
pub use seat::{FreeSeat, Seat, SeatMap, SeatView};
