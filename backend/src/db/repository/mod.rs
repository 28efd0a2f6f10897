//! Repository traits for the portal's storage.
//!
//! Each trait covers one area of the portal; [`FullRepository`] is the union
//! handed to the HTTP layer and the service functions.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` so one instance can be shared across
//! async handlers behind an `Arc`.

pub mod error;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{
    AcademicCatalog, AuditRecord, Reservation, ReservationId, ReservationStatus, ScheduleEntry,
    Space, SpaceId, TimeBlockCatalog, UserId, UserProfile,
};

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Spaces and their weekly occupation.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check whether the backing store is usable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    async fn list_spaces(&self) -> RepositoryResult<Vec<Space>>;

    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the space doesn't exist
    async fn get_space(&self, space_id: SpaceId) -> RepositoryResult<Space>;

    /// The time-block catalog shared by every space.
    async fn time_blocks(&self) -> RepositoryResult<TimeBlockCatalog>;

    /// Occupied-slot records of a space, in stored order.
    ///
    /// # Returns
    /// * `Ok(vec![])` - If the space exists but has nothing scheduled
    /// * `Err(RepositoryError::NotFound)` - If the space doesn't exist
    async fn schedule_for_space(&self, space_id: SpaceId) -> RepositoryResult<Vec<ScheduleEntry>>;
}

/// Reservations of spaces and counseling appointments.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>>;

    async fn get_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation>;

    /// Allocate an id for a reservation about to be inserted.
    async fn next_reservation_id(&self) -> RepositoryResult<ReservationId>;

    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - If the id is already taken
    async fn insert_reservation(&self, reservation: Reservation) -> RepositoryResult<Reservation>;

    /// Set a reservation's status and append the matching audit record as a
    /// single write.
    ///
    /// # Returns
    /// * `Ok((reservation, record))` - The updated reservation and its new audit record
    /// * `Err(RepositoryError::NotFound)` - If the reservation doesn't exist
    /// * `Err(RepositoryError::ValidationError)` - If it already has `status`
    async fn change_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
        changed_by: UserId,
        changed_at: NaiveDateTime,
    ) -> RepositoryResult<(Reservation, AuditRecord)>;

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()>;
}

/// The reservation status audit trail.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append a status change. The repository assigns the audit id.
    async fn record_status_change(
        &self,
        reservation: ReservationId,
        previous_status: &str,
        new_status: &str,
        changed_by: UserId,
        changed_at: NaiveDateTime,
    ) -> RepositoryResult<AuditRecord>;

    /// Every stored record, without display names.
    async fn list_audit_records(&self) -> RepositoryResult<Vec<AuditRecord>>;

    /// Delete records older than the retention window relative to `now`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records removed
    async fn prune_audit_records(&self, now: NaiveDateTime) -> RepositoryResult<usize>;
}

/// Faculties, schools and the user directory.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn academic_catalog(&self) -> RepositoryResult<AcademicCatalog>;

    async fn list_users(&self) -> RepositoryResult<Vec<UserProfile>>;
}

/// Every repository capability the portal needs.
pub trait FullRepository:
    ScheduleRepository + ReservationRepository + AuditRepository + CatalogRepository
{
}

impl<T> FullRepository for T where
    T: ScheduleRepository + ReservationRepository + AuditRepository + CatalogRepository
{
}
