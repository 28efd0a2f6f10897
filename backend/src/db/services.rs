//! High-level portal service layer.
//!
//! Repository-agnostic operations that combine the pure domain logic in
//! [`crate::services`] with storage. Form validation, status rules and audit
//! bookkeeping live here so every backend behaves the same.
//!
//! Functions that depend on the current date take it as a parameter; the HTTP
//! layer passes the local clock.
//!
//! # Usage
//!
//! ```
//! use integraupt_portal::db::{repositories::LocalRepository, services};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let repo = LocalRepository::new();
//! let spaces = rt.block_on(services::list_spaces(&repo, None)).unwrap();
//! assert!(spaces.is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use serde::Serialize;

use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    format_time, AuditRecord, BlockOption, CatalogItem, FacultyId, Reservation, ReservationId,
    ReservationKind, ReservationRequest, ReservationStatus, SchoolId, Space, SpaceId, UserId,
    UserProfile, WeeklyGrid,
};
use crate::services::audit::{self, AuditFilter, AuditStatistics};
use crate::services::booking::{BookingError, QuickReservationForm, SpaceReservationForm};
use crate::services::counseling::{self, CounselingError, CounselingForm};
use crate::services::reservations::{
    self, filter_reservations, spaces_for_school, ReservationQuery,
};
use crate::services::schedule_grid::{block_options, build_weekly_grid};

// ==================== Health & Catalogs ====================

/// Check if the repository is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

pub async fn list_faculties<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<CatalogItem>> {
    Ok(repo.academic_catalog().await?.faculties())
}

/// Schools, optionally restricted to one faculty.
pub async fn list_schools<R: FullRepository + ?Sized>(
    repo: &R,
    faculty: Option<FacultyId>,
) -> RepositoryResult<Vec<CatalogItem>> {
    Ok(repo.academic_catalog().await?.schools(faculty))
}

// ==================== Spaces & Schedules ====================

/// Spaces, optionally restricted to the school of the signed-in user.
pub async fn list_spaces<R: FullRepository + ?Sized>(
    repo: &R,
    school: Option<SchoolId>,
) -> RepositoryResult<Vec<Space>> {
    let spaces = repo.list_spaces().await?;
    if school.is_none() {
        return Ok(spaces);
    }
    let catalog = repo.academic_catalog().await?;
    Ok(spaces_for_school(&spaces, school, &catalog))
}

/// Weekly occupation grid of one space.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If the space doesn't exist
pub async fn load_weekly_grid<R: FullRepository + ?Sized>(
    repo: &R,
    space_id: SpaceId,
) -> RepositoryResult<WeeklyGrid> {
    let entries = repo.schedule_for_space(space_id).await?;
    let catalog = repo.time_blocks().await?;
    Ok(build_weekly_grid(space_id, &entries, &catalog))
}

/// Options of the block selector, ordered by rank.
pub async fn list_block_options<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<BlockOption>> {
    Ok(block_options(&repo.time_blocks().await?))
}

// ==================== Reservations ====================

/// All reservations, or those matching an overlay query (newest first).
pub async fn list_reservations<R: FullRepository + ?Sized>(
    repo: &R,
    query: Option<&ReservationQuery>,
) -> RepositoryResult<Vec<Reservation>> {
    let reservations = repo.list_reservations().await?;
    Ok(match query {
        Some(query) => filter_reservations(&reservations, query),
        None => reservations,
    })
}

fn booking_error(operation: &str, err: BookingError) -> RepositoryError {
    let context = ErrorContext::new(operation).with_entity("reservation");
    match err {
        BookingError::SpaceNotFound => {
            RepositoryError::not_found_with_context(err.to_string(), context)
        }
        _ => RepositoryError::validation_with_context(err.to_string(), context),
    }
}

fn counseling_error(err: CounselingError) -> RepositoryError {
    RepositoryError::validation_with_context(
        err.to_string(),
        ErrorContext::new("schedule_counseling").with_entity("reservation"),
    )
}

/// Store a validated request as a new pending reservation.
async fn store_request<R: FullRepository + ?Sized>(
    repo: &R,
    request: ReservationRequest,
    space: &Space,
    course: &str,
) -> RepositoryResult<Reservation> {
    let catalog = repo.time_blocks().await?;
    let block = catalog.get(request.block);
    let id = repo.next_reservation_id().await?;

    let reservation = Reservation {
        id,
        kind: ReservationKind::from(space.kind),
        resource: space.name.clone(),
        date: Some(request.date),
        start_time: block.map(|b| format_time(b.start.as_deref())),
        end_time: block.map(|b| format_time(b.end.as_deref())),
        status: ReservationStatus::Pending,
        reason: request.reason,
        course: Some(course.trim().to_string()),
        block_id: Some(request.block),
        space_id: Some(request.space),
        user_id: Some(request.user),
    };
    info!(
        "Reservation {} requested for '{}' on {}",
        reservation.id, reservation.resource, request.date
    );
    repo.insert_reservation(reservation).await
}

/// Submit the quick reservation modal of a space card.
pub async fn submit_quick_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    space_id: SpaceId,
    user: UserId,
    form: &QuickReservationForm,
    today: NaiveDate,
) -> RepositoryResult<Reservation> {
    let space = repo.get_space(space_id).await?;
    let catalog = repo.time_blocks().await?;
    let request = form
        .validate(&space, user, &catalog, today)
        .map_err(|e| booking_error("submit_quick_reservation", e))?;
    store_request(repo, request, &space, &form.course).await
}

/// Submit the general "Nueva reserva" form.
pub async fn submit_form_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    user: UserId,
    form: &SpaceReservationForm,
    today: NaiveDate,
) -> RepositoryResult<Reservation> {
    let spaces = repo.list_spaces().await?;
    let catalog = repo.time_blocks().await?;
    let request = form
        .validate(&spaces, user, &catalog, today)
        .map_err(|e| booking_error("submit_form_reservation", e))?;
    let space = spaces
        .iter()
        .find(|s| s.id == request.space)
        .ok_or_else(|| booking_error("submit_form_reservation", BookingError::SpaceNotFound))?;
    store_request(repo, request, space, &form.course).await
}

/// Book a counseling appointment.
pub async fn schedule_counseling<R: FullRepository + ?Sized>(
    repo: &R,
    user: Option<UserId>,
    form: &CounselingForm,
    today: NaiveDate,
) -> RepositoryResult<Reservation> {
    let id = repo.next_reservation_id().await?;
    let appointment =
        counseling::schedule_counseling(id, user, form, today).map_err(counseling_error)?;
    repo.insert_reservation(appointment).await
}

/// A status change together with the audit record it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    #[serde(rename = "reserva")]
    pub reservation: Reservation,
    #[serde(rename = "auditoria")]
    pub audit: AuditRecord,
}

/// Change a reservation's status and append the audit record.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If the reservation doesn't exist
/// * `Err(RepositoryError::ValidationError)` - If it already has that status
pub async fn update_reservation_status<R: FullRepository + ?Sized>(
    repo: &R,
    id: ReservationId,
    status: ReservationStatus,
    changed_by: UserId,
    now: NaiveDateTime,
) -> RepositoryResult<StatusChange> {
    let (reservation, record) = repo
        .change_reservation_status(id, status, changed_by, now)
        .await?;
    info!(
        "Reservation {} changed from {} to {} by user {}",
        id, record.previous_status, record.new_status, changed_by
    );

    let audit = enriched_records(repo, vec![record])
        .await?
        .pop()
        .ok_or_else(|| RepositoryError::internal("Audit record lost during enrichment"))?;
    Ok(StatusChange { reservation, audit })
}

/// Cancel a reservation that is still open.
pub async fn cancel_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    id: ReservationId,
    changed_by: UserId,
    now: NaiveDateTime,
) -> RepositoryResult<StatusChange> {
    let mut current = vec![repo.get_reservation(id).await?];
    if !reservations::cancel(&mut current, id) {
        return Err(RepositoryError::validation_with_context(
            format!(
                "No se puede cancelar una reserva {}",
                current[0].status.label().to_lowercase()
            ),
            ErrorContext::new("cancel_reservation")
                .with_entity("reservation")
                .with_entity_id(id),
        ));
    }
    update_reservation_status(repo, id, ReservationStatus::Cancelled, changed_by, now).await
}

/// Delete a cancelled or rejected reservation.
pub async fn delete_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    id: ReservationId,
) -> RepositoryResult<()> {
    let mut current = vec![repo.get_reservation(id).await?];
    if !reservations::remove(&mut current, id) {
        return Err(RepositoryError::validation_with_context(
            "Solo se pueden eliminar reservas canceladas o rechazadas",
            ErrorContext::new("delete_reservation")
                .with_entity("reservation")
                .with_entity_id(id),
        ));
    }
    repo.delete_reservation(id).await
}

// ==================== Audit Trail ====================

/// Lookup tables used to attach display names to audit records.
struct AuditDirectory {
    users: HashMap<UserId, UserProfile>,
    reservations: HashMap<ReservationId, Reservation>,
    spaces: HashMap<SpaceId, String>,
}

impl AuditDirectory {
    async fn load<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Self> {
        Ok(Self {
            users: repo
                .list_users()
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect(),
            reservations: repo
                .list_reservations()
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect(),
            spaces: repo
                .list_spaces()
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect(),
        })
    }

    fn enrich(&self, record: AuditRecord) -> AuditRecord {
        let reservation = self.reservations.get(&record.id_reserva);
        let space_name = reservation.map(|r| {
            r.space_id
                .and_then(|id| self.spaces.get(&id))
                .map(String::as_str)
                .unwrap_or(r.resource.as_str())
        });
        let requester = reservation
            .and_then(|r| r.user_id)
            .and_then(|id| self.users.get(&id));
        let changed_by = self.users.get(&record.changed_by);
        audit::enrich(record, changed_by, space_name, requester)
    }
}

async fn enriched_records<R: FullRepository + ?Sized>(
    repo: &R,
    records: Vec<AuditRecord>,
) -> RepositoryResult<Vec<AuditRecord>> {
    let directory = AuditDirectory::load(repo).await?;
    Ok(records.into_iter().map(|r| directory.enrich(r)).collect())
}

/// Every audit record with display names, newest first.
pub async fn list_audit_records<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<AuditRecord>> {
    let mut records = repo.list_audit_records().await?;
    audit::sort_newest_first(&mut records);
    enriched_records(repo, records).await
}

/// History of one reservation, newest first.
pub async fn audit_for_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation: ReservationId,
) -> RepositoryResult<Vec<AuditRecord>> {
    let records = repo.list_audit_records().await?;
    enriched_records(repo, audit::for_reservation(&records, reservation)).await
}

/// Records matching every set criterion of the filter, newest first.
pub async fn search_audit<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &AuditFilter,
) -> RepositoryResult<Vec<AuditRecord>> {
    let records = repo.list_audit_records().await?;
    enriched_records(repo, audit::search(&records, filter)).await
}

/// Free-text search over the previous and new status, newest first.
pub async fn search_audit_text<R: FullRepository + ?Sized>(
    repo: &R,
    text: &str,
) -> RepositoryResult<Vec<AuditRecord>> {
    let records = repo.list_audit_records().await?;
    enriched_records(repo, audit::search_text(&records, text)).await
}

/// Changes of the last week.
pub async fn recent_audit_changes<R: FullRepository + ?Sized>(
    repo: &R,
    now: NaiveDateTime,
) -> RepositoryResult<Vec<AuditRecord>> {
    let records = repo.list_audit_records().await?;
    enriched_records(repo, audit::recent_changes(&records, now)).await
}

pub async fn audit_statistics<R: FullRepository + ?Sized>(
    repo: &R,
    now: NaiveDateTime,
) -> RepositoryResult<AuditStatistics> {
    let records = repo.list_audit_records().await?;
    Ok(audit::statistics(&records, now))
}

/// Changes per month (1..=12) of a year.
pub async fn audit_monthly_summary<R: FullRepository + ?Sized>(
    repo: &R,
    year: i32,
) -> RepositoryResult<BTreeMap<u32, usize>> {
    let records = repo.list_audit_records().await?;
    Ok(audit::monthly_summary(&records, year))
}

/// Delete audit records past the retention window.
pub async fn prune_audit_records<R: FullRepository + ?Sized>(
    repo: &R,
    now: NaiveDateTime,
) -> RepositoryResult<usize> {
    let removed = repo.prune_audit_records(now).await?;
    if removed > 0 {
        info!("Pruned {} audit records older than {} months", removed, audit::RETENTION_MONTHS);
    }
    Ok(removed)
}

/// Most recent change of a reservation.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If the reservation has no audit history
pub async fn latest_audit_change<R: FullRepository + ?Sized>(
    repo: &R,
    reservation: ReservationId,
) -> RepositoryResult<AuditRecord> {
    let records = repo.list_audit_records().await?;
    let latest = audit::latest_for(&records, reservation)
        .cloned()
        .ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("No audit records for reservation {}", reservation),
                ErrorContext::new("latest_audit_change")
                    .with_entity("audit_record")
                    .with_entity_id(reservation),
            )
        })?;
    let directory = AuditDirectory::load(repo).await?;
    Ok(directory.enrich(latest))
}

pub async fn audit_change_count<R: FullRepository + ?Sized>(
    repo: &R,
    reservation: ReservationId,
) -> RepositoryResult<usize> {
    let records = repo.list_audit_records().await?;
    Ok(audit::change_count(&records, reservation))
}

/// Reservations with at least one audit record, ascending.
pub async fn audited_reservations<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ReservationId>> {
    let records = repo.list_audit_records().await?;
    Ok(audit::distinct_reservations(&records))
}

/// Users that changed at least one status, ascending.
pub async fn audit_users<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<UserId>> {
    let records = repo.list_audit_records().await?;
    Ok(audit::distinct_users(&records))
}
