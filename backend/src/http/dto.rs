//! Data Transfer Objects for the HTTP API.
//!
//! Domain types already derive `Serialize`/`Deserialize` with the portal's
//! wire names, so most responses are returned as-is. The types here cover
//! query strings, request envelopes and small response wrappers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    FacultyId, Reservation, ReservationId, ReservationStatus, SchoolId, SpaceId, StatusFilter,
    UserId,
};
use crate::services::booking::{QuickReservationForm, SpaceReservationForm};
use crate::services::counseling::CounselingForm;
use crate::services::reservations::ReservationQuery;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Repository status ("connected", "disconnected" or the error)
    pub database: String,
}

/// Query of `GET /v1/catalogos/escuelas`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolsQuery {
    #[serde(default)]
    pub facultad_id: Option<FacultyId>,
}

/// Query of `GET /v1/espacios`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacesQuery {
    #[serde(default)]
    pub escuela_id: Option<SchoolId>,
}

/// Query of `GET /v1/reservas`. Without parameters every reservation is listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationsQuery {
    #[serde(default)]
    pub estado: Option<StatusFilter>,
    #[serde(default)]
    pub busqueda: Option<String>,
}

impl ReservationsQuery {
    /// The overlay query, or `None` when no parameter was given.
    pub fn to_query(&self) -> Option<ReservationQuery> {
        if self.estado.is_none() && self.busqueda.is_none() {
            return None;
        }
        Some(ReservationQuery::new(
            self.estado.unwrap_or_default(),
            self.busqueda.clone().unwrap_or_default(),
        ))
    }
}

/// Body of `POST /v1/reservas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReservationBody {
    pub espacio_id: SpaceId,
    pub usuario_id: UserId,
    #[serde(flatten)]
    pub form: QuickReservationForm,
}

/// Body of `POST /v1/reservas/formulario`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReservationBody {
    pub usuario_id: UserId,
    #[serde(flatten)]
    pub form: SpaceReservationForm,
}

/// Body of `POST /v1/citas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselingBody {
    #[serde(default)]
    pub usuario_id: Option<UserId>,
    #[serde(flatten)]
    pub form: CounselingForm,
}

/// Body of `PATCH /v1/reservas/{id}/estado`.
///
/// `estado` accepts the status code, its label or its audit spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateBody {
    pub estado: String,
    pub usuario_cambio: UserId,
}

impl StatusUpdateBody {
    pub fn status(&self) -> Result<ReservationStatus, String> {
        self.estado.parse()
    }
}

/// Body of `POST /v1/reservas/{id}/cancelar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBody {
    pub usuario_cambio: UserId,
}

/// A newly created reservation plus the confirmation shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreated {
    pub reserva: Reservation,
    pub mensaje: String,
}

/// Query of `GET /v1/auditoria-reservas/texto`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditTextQuery {
    #[serde(default)]
    pub q: String,
}

/// Response of `GET /v1/auditoria-reservas/resumen/{year}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummaryResponse {
    pub anio: i32,
    /// Month number (1..=12) to change count
    pub meses: BTreeMap<u32, usize>,
}

/// Response of `GET /v1/auditoria-reservas/reserva/{id}/conteo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCountResponse {
    pub id_reserva: ReservationId,
    pub cambios: usize,
}

/// Response of `POST /v1/auditoria-reservas/depurar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneResponse {
    pub eliminados: usize,
}
