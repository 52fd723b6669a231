pub mod reservation;
pub mod selection;
pub mod snapshot;

pub use reservation::{AllocationService, ReservationCoordinator};
