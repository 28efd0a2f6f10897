//! In-memory local repository implementation.
//!
//! Stores all portal data in memory behind a single `parking_lot::RwLock`.
//! Used for local development, the bundled demo fixture and tests. Locks are
//! never held across an `.await`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::db::seed::PortalSeed;
use crate::models::{
    AcademicCatalog, AuditId, AuditRecord, Faculty, Reservation, ReservationId, ReservationStatus,
    ScheduleEntry, School, Space, SpaceId, TimeBlock, TimeBlockCatalog, UserId, UserProfile,
};
use crate::services::audit::prune_older_than_retention;

/// In-memory local repository.
///
/// # Example
/// ```
/// use integraupt_portal::db::repositories::LocalRepository;
/// use integraupt_portal::db::repository::ScheduleRepository;
/// use integraupt_portal::models::TimeBlock;
///
/// let repo = LocalRepository::new();
/// repo.add_time_block(TimeBlock::new(1, "8:00", "8:50").with_order(1));
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let catalog = rt.block_on(repo.time_blocks()).unwrap();
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    spaces: BTreeMap<SpaceId, Space>,
    time_blocks: TimeBlockCatalog,
    schedules: HashMap<SpaceId, Vec<ScheduleEntry>>,
    reservations: BTreeMap<ReservationId, Reservation>,
    users: BTreeMap<UserId, UserProfile>,
    faculties: Vec<Faculty>,
    schools: Vec<School>,
    audit: Vec<AuditRecord>,

    // ID counters
    next_reservation_id: i64,
    next_audit_id: i64,

    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            spaces: BTreeMap::new(),
            time_blocks: TimeBlockCatalog::new(),
            schedules: HashMap::new(),
            reservations: BTreeMap::new(),
            users: BTreeMap::new(),
            faculties: Vec::new(),
            schools: Vec::new(),
            audit: Vec::new(),
            next_reservation_id: 1,
            next_audit_id: 1,
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository holding the contents of a seed fixture.
    ///
    /// Id counters continue after the highest seeded reservation and audit ids.
    pub fn from_seed(seed: PortalSeed) -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data.write();
            data.spaces = seed.spaces.into_iter().map(|s| (s.id, s)).collect();
            data.time_blocks = seed.time_blocks.into_iter().collect();
            data.schedules = seed
                .schedules
                .into_iter()
                .map(|s| (s.space_id, s.entries))
                .collect();
            data.next_reservation_id = seed
                .reservations
                .iter()
                .map(|r| r.id.value())
                .max()
                .unwrap_or(0)
                + 1;
            data.reservations = seed.reservations.into_iter().map(|r| (r.id, r)).collect();
            data.users = seed.users.into_iter().map(|u| (u.id, u)).collect();
            data.faculties = seed.faculties;
            data.schools = seed.schools;
            data.next_audit_id =
                seed.audit.iter().map(|a| a.id_audit.value()).max().unwrap_or(0) + 1;
            data.audit = seed.audit;
        }
        repo
    }

    pub fn add_space(&self, space: Space) {
        self.data.write().spaces.insert(space.id, space);
    }

    pub fn add_time_block(&self, block: TimeBlock) {
        self.data.write().time_blocks.insert(block);
    }

    /// Replace the weekly occupation of a space.
    pub fn set_schedule(&self, space_id: SpaceId, entries: Vec<ScheduleEntry>) {
        self.data.write().schedules.insert(space_id, entries);
    }

    pub fn add_user(&self, user: UserProfile) {
        self.data.write().users.insert(user.id, user);
    }

    pub fn add_school(&self, faculty: Faculty, school: School) {
        let mut data = self.data.write();
        if !data.faculties.iter().any(|f| f.id == faculty.id) {
            data.faculties.push(faculty);
        }
        data.schools.push(school);
    }

    /// Set the health status for testing failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    pub fn reservation_count(&self) -> usize {
        self.data.read().reservations.len()
    }

    pub fn audit_count(&self) -> usize {
        self.data.read().audit.len()
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    fn check_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::internal_with_context(
                "Repository is unavailable",
                ErrorContext::new(operation).retryable(),
            ))
        }
    }
}

fn space_not_found(operation: &str, space_id: SpaceId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Space {} not found", space_id),
        ErrorContext::new(operation)
            .with_entity("space")
            .with_entity_id(space_id),
    )
}

fn reservation_not_found(operation: &str, id: ReservationId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Reservation {} not found", id),
        ErrorContext::new(operation)
            .with_entity("reservation")
            .with_entity_id(id),
    )
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_spaces(&self) -> RepositoryResult<Vec<Space>> {
        self.check_healthy("list_spaces")?;
        Ok(self.data.read().spaces.values().cloned().collect())
    }

    async fn get_space(&self, space_id: SpaceId) -> RepositoryResult<Space> {
        self.check_healthy("get_space")?;
        self.data
            .read()
            .spaces
            .get(&space_id)
            .cloned()
            .ok_or_else(|| space_not_found("get_space", space_id))
    }

    async fn time_blocks(&self) -> RepositoryResult<TimeBlockCatalog> {
        self.check_healthy("time_blocks")?;
        Ok(self.data.read().time_blocks.clone())
    }

    async fn schedule_for_space(&self, space_id: SpaceId) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.check_healthy("schedule_for_space")?;
        let data = self.data.read();
        if !data.spaces.contains_key(&space_id) {
            return Err(space_not_found("schedule_for_space", space_id));
        }
        Ok(data.schedules.get(&space_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>> {
        self.check_healthy("list_reservations")?;
        Ok(self.data.read().reservations.values().cloned().collect())
    }

    async fn get_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        self.check_healthy("get_reservation")?;
        self.data
            .read()
            .reservations
            .get(&id)
            .cloned()
            .ok_or_else(|| reservation_not_found("get_reservation", id))
    }

    async fn next_reservation_id(&self) -> RepositoryResult<ReservationId> {
        self.check_healthy("next_reservation_id")?;
        let mut data = self.data.write();
        let id = ReservationId::new(data.next_reservation_id);
        data.next_reservation_id += 1;
        Ok(id)
    }

    async fn insert_reservation(&self, reservation: Reservation) -> RepositoryResult<Reservation> {
        self.check_healthy("insert_reservation")?;
        let mut data = self.data.write();
        if data.reservations.contains_key(&reservation.id) {
            return Err(RepositoryError::validation_with_context(
                format!("Reservation {} already exists", reservation.id),
                ErrorContext::new("insert_reservation")
                    .with_entity("reservation")
                    .with_entity_id(reservation.id),
            ));
        }
        if reservation.id.value() >= data.next_reservation_id {
            data.next_reservation_id = reservation.id.value() + 1;
        }
        log::debug!(
            "Inserting reservation {} for '{}'",
            reservation.id,
            reservation.resource
        );
        data.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn change_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
        changed_by: UserId,
        changed_at: NaiveDateTime,
    ) -> RepositoryResult<(Reservation, AuditRecord)> {
        self.check_healthy("change_reservation_status")?;
        let mut data = self.data.write();
        let audit_id = AuditId::new(data.next_audit_id);
        let reservation = data
            .reservations
            .get_mut(&id)
            .ok_or_else(|| reservation_not_found("change_reservation_status", id))?;

        let previous = reservation.status;
        if previous == status {
            return Err(RepositoryError::validation_with_context(
                format!("La reserva ya se encuentra en estado {}", status.label()),
                ErrorContext::new("change_reservation_status")
                    .with_entity("reservation")
                    .with_entity_id(id),
            ));
        }
        reservation.status = status;
        let reservation = reservation.clone();

        let record = AuditRecord::new(
            audit_id,
            id,
            previous.audit_label(),
            status.audit_label(),
            changed_at,
            changed_by,
        );
        data.next_audit_id += 1;
        data.audit.push(record.clone());
        log::debug!("Reservation {} status: {} -> {}", id, previous, status);
        Ok((reservation, record))
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()> {
        self.check_healthy("delete_reservation")?;
        self.data
            .write()
            .reservations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| reservation_not_found("delete_reservation", id))
    }
}

#[async_trait]
impl AuditRepository for LocalRepository {
    async fn record_status_change(
        &self,
        reservation: ReservationId,
        previous_status: &str,
        new_status: &str,
        changed_by: UserId,
        changed_at: NaiveDateTime,
    ) -> RepositoryResult<AuditRecord> {
        self.check_healthy("record_status_change")?;
        let mut data = self.data.write();
        let record = AuditRecord::new(
            AuditId::new(data.next_audit_id),
            reservation,
            previous_status,
            new_status,
            changed_at,
            changed_by,
        );
        data.next_audit_id += 1;
        data.audit.push(record.clone());
        Ok(record)
    }

    async fn list_audit_records(&self) -> RepositoryResult<Vec<AuditRecord>> {
        self.check_healthy("list_audit_records")?;
        Ok(self.data.read().audit.clone())
    }

    async fn prune_audit_records(&self, now: NaiveDateTime) -> RepositoryResult<usize> {
        self.check_healthy("prune_audit_records")?;
        let mut data = self.data.write();
        Ok(prune_older_than_retention(&mut data.audit, now))
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn academic_catalog(&self) -> RepositoryResult<AcademicCatalog> {
        self.check_healthy("academic_catalog")?;
        let data = self.data.read();
        Ok(AcademicCatalog::new(
            data.faculties.clone(),
            data.schools.clone(),
        ))
    }

    async fn list_users(&self) -> RepositoryResult<Vec<UserProfile>> {
        self.check_healthy("list_users")?;
        Ok(self.data.read().users.values().cloned().collect())
    }
}
