//! Domain logic of the portal.
//!
//! Everything here is synchronous and storage-free; [`crate::db::services`]
//! combines these functions with a repository.

pub mod audit;
pub mod booking;
pub mod counseling;
pub mod reservations;
pub mod schedule_grid;

pub use booking::{BookingError, QuickReservationForm, SpaceReservationForm, SUCCESS_MESSAGE};
pub use counseling::{CounselingError, CounselingForm};
pub use reservations::ReservationQuery;
pub use schedule_grid::{block_options, build_weekly_grid, derive_rows, resolve_cell};
