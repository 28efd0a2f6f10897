//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer in [`crate::db::services`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};

use super::dto::{
    AuditTextQuery, CancelBody, ChangeCountResponse, CounselingBody, FormReservationBody,
    HealthResponse, MonthlySummaryResponse, PruneResponse, QuickReservationBody,
    ReservationCreated, ReservationsQuery, SchoolsQuery, SpacesQuery, StatusUpdateBody,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::db::services::StatusChange;
use crate::models::{
    AuditRecord, BlockOption, CatalogItem, Reservation, ReservationId, Space, SpaceId, UserId,
    WeeklyGrid,
};
use crate::services::audit::{AuditFilter, AuditStatistics};
use crate::services::booking::SUCCESS_MESSAGE;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository is usable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Catalogs
// =============================================================================

/// GET /v1/catalogos/facultades
pub async fn list_faculties(State(state): State<AppState>) -> HandlerResult<Vec<CatalogItem>> {
    let faculties = db_services::list_faculties(state.repository.as_ref()).await?;
    Ok(Json(faculties))
}

/// GET /v1/catalogos/escuelas?facultadId=
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<SchoolsQuery>,
) -> HandlerResult<Vec<CatalogItem>> {
    let schools = db_services::list_schools(state.repository.as_ref(), query.facultad_id).await?;
    Ok(Json(schools))
}

// =============================================================================
// Spaces & Schedules
// =============================================================================

/// GET /v1/espacios?escuelaId=
pub async fn list_spaces(
    State(state): State<AppState>,
    Query(query): Query<SpacesQuery>,
) -> HandlerResult<Vec<Space>> {
    let spaces = db_services::list_spaces(state.repository.as_ref(), query.escuela_id).await?;
    Ok(Json(spaces))
}

/// GET /v1/espacios/{id}/horario
///
/// Weekly occupation grid of a space. A space without blocks yields an empty
/// grid carrying the empty-state message.
pub async fn get_weekly_grid(
    State(state): State<AppState>,
    Path(space_id): Path<i64>,
) -> HandlerResult<WeeklyGrid> {
    let grid =
        db_services::load_weekly_grid(state.repository.as_ref(), SpaceId::new(space_id)).await?;
    Ok(Json(grid))
}

/// GET /v1/bloques
pub async fn list_block_options(State(state): State<AppState>) -> HandlerResult<Vec<BlockOption>> {
    let options = db_services::list_block_options(state.repository.as_ref()).await?;
    Ok(Json(options))
}

// =============================================================================
// Reservations
// =============================================================================

/// GET /v1/reservas?estado=&busqueda=
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationsQuery>,
) -> HandlerResult<Vec<Reservation>> {
    let query = query.to_query();
    let reservations =
        db_services::list_reservations(state.repository.as_ref(), query.as_ref()).await?;
    Ok(Json(reservations))
}

/// POST /v1/reservas
///
/// Submit the quick reservation of a space card.
pub async fn create_quick_reservation(
    State(state): State<AppState>,
    Json(body): Json<QuickReservationBody>,
) -> Result<(StatusCode, Json<ReservationCreated>), AppError> {
    let reservation = db_services::submit_quick_reservation(
        state.repository.as_ref(),
        body.espacio_id,
        body.usuario_id,
        &body.form,
        today(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationCreated {
            reserva: reservation,
            mensaje: SUCCESS_MESSAGE.to_string(),
        }),
    ))
}

/// POST /v1/reservas/formulario
///
/// Submit the general reservation form.
pub async fn create_form_reservation(
    State(state): State<AppState>,
    Json(body): Json<FormReservationBody>,
) -> Result<(StatusCode, Json<ReservationCreated>), AppError> {
    let reservation = db_services::submit_form_reservation(
        state.repository.as_ref(),
        body.usuario_id,
        &body.form,
        today(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationCreated {
            reserva: reservation,
            mensaje: SUCCESS_MESSAGE.to_string(),
        }),
    ))
}

/// PATCH /v1/reservas/{id}/estado
///
/// Change the status of a reservation and record it in the audit trail.
pub async fn update_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusUpdateBody>,
) -> HandlerResult<StatusChange> {
    let status = body.status().map_err(AppError::BadRequest)?;
    let change = db_services::update_reservation_status(
        state.repository.as_ref(),
        ReservationId::new(id),
        status,
        body.usuario_cambio,
        now(),
    )
    .await?;
    tracing::info!(
        "Reservation {} set to {} by user {}",
        id,
        status,
        body.usuario_cambio
    );
    Ok(Json(change))
}

/// POST /v1/reservas/{id}/cancelar
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CancelBody>,
) -> HandlerResult<StatusChange> {
    let change = db_services::cancel_reservation(
        state.repository.as_ref(),
        ReservationId::new(id),
        body.usuario_cambio,
        now(),
    )
    .await?;
    Ok(Json(change))
}

/// DELETE /v1/reservas/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_reservation(state.repository.as_ref(), ReservationId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/citas
///
/// Book a psychological counseling appointment.
pub async fn create_counseling(
    State(state): State<AppState>,
    Json(body): Json<CounselingBody>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let appointment = db_services::schedule_counseling(
        state.repository.as_ref(),
        body.usuario_id,
        &body.form,
        today(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

// =============================================================================
// Audit Trail
// =============================================================================

/// GET /v1/auditoria-reservas
pub async fn list_audit_records(State(state): State<AppState>) -> HandlerResult<Vec<AuditRecord>> {
    let records = db_services::list_audit_records(state.repository.as_ref()).await?;
    Ok(Json(records))
}

/// GET /v1/auditoria-reservas/reserva/{id}
pub async fn get_reservation_audit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Vec<AuditRecord>> {
    let records =
        db_services::audit_for_reservation(state.repository.as_ref(), ReservationId::new(id))
            .await?;
    Ok(Json(records))
}

/// GET /v1/auditoria-reservas/reserva/{id}/ultimo
pub async fn get_latest_reservation_change(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<AuditRecord> {
    let record =
        db_services::latest_audit_change(state.repository.as_ref(), ReservationId::new(id))
            .await?;
    Ok(Json(record))
}

/// GET /v1/auditoria-reservas/reserva/{id}/conteo
pub async fn count_reservation_changes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ChangeCountResponse> {
    let id = ReservationId::new(id);
    let cambios = db_services::audit_change_count(state.repository.as_ref(), id).await?;
    Ok(Json(ChangeCountResponse {
        id_reserva: id,
        cambios,
    }))
}

/// GET /v1/auditoria-reservas/reservas
pub async fn list_audited_reservations(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ReservationId>> {
    let ids = db_services::audited_reservations(state.repository.as_ref()).await?;
    Ok(Json(ids))
}

/// GET /v1/auditoria-reservas/usuarios
pub async fn list_audit_users(State(state): State<AppState>) -> HandlerResult<Vec<UserId>> {
    let users = db_services::audit_users(state.repository.as_ref()).await?;
    Ok(Json(users))
}

/// GET /v1/auditoria-reservas/buscar
///
/// Filtered search; every parameter is optional.
pub async fn search_audit(
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
) -> HandlerResult<Vec<AuditRecord>> {
    if let (Some(from), Some(to)) = (filter.fecha_inicio, filter.fecha_fin) {
        if from > to {
            return Err(AppError::BadRequest(
                "fechaInicio must not be after fechaFin".to_string(),
            ));
        }
    }
    let records = db_services::search_audit(state.repository.as_ref(), &filter).await?;
    Ok(Json(records))
}

/// GET /v1/auditoria-reservas/texto?q=
pub async fn search_audit_text(
    State(state): State<AppState>,
    Query(query): Query<AuditTextQuery>,
) -> HandlerResult<Vec<AuditRecord>> {
    let records = db_services::search_audit_text(state.repository.as_ref(), &query.q).await?;
    Ok(Json(records))
}

/// GET /v1/auditoria-reservas/recientes
pub async fn recent_audit_changes(
    State(state): State<AppState>,
) -> HandlerResult<Vec<AuditRecord>> {
    let records = db_services::recent_audit_changes(state.repository.as_ref(), now()).await?;
    Ok(Json(records))
}

/// GET /v1/auditoria-reservas/estadisticas
pub async fn audit_statistics(State(state): State<AppState>) -> HandlerResult<AuditStatistics> {
    let stats = db_services::audit_statistics(state.repository.as_ref(), now()).await?;
    Ok(Json(stats))
}

/// GET /v1/auditoria-reservas/resumen/{year}
pub async fn audit_monthly_summary(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> HandlerResult<MonthlySummaryResponse> {
    let months = db_services::audit_monthly_summary(state.repository.as_ref(), year).await?;
    Ok(Json(MonthlySummaryResponse {
        anio: year,
        meses: months,
    }))
}

/// POST /v1/auditoria-reservas/depurar
///
/// Delete audit records older than the retention window.
pub async fn prune_audit_records(State(state): State<AppState>) -> HandlerResult<PruneResponse> {
    let removed = db_services::prune_audit_records(state.repository.as_ref(), now()).await?;
    Ok(Json(PruneResponse { eliminados: removed }))
}
