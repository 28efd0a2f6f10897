//! Reservations, their lifecycle status and the request sent to the booking backend.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::ids::{ReservationId, SpaceId, TimeBlockId, UserId};
use super::space::SpaceKind;
use super::time::timestamp_of;

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Presentation attributes of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub label: &'static str,
    pub css_class: &'static str,
    /// Spelling used by the audit trail (`"Cancelado"`, not `"Cancelada"`).
    pub audit_label: &'static str,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        ReservationStatus::Active,
        ReservationStatus::Pending,
        ReservationStatus::Approved,
        ReservationStatus::Rejected,
        ReservationStatus::Cancelled,
    ];

    pub fn info(&self) -> StatusInfo {
        match self {
            ReservationStatus::Active => StatusInfo {
                label: "Activa",
                css_class: "servicios-status-active",
                audit_label: "Activa",
            },
            ReservationStatus::Pending => StatusInfo {
                label: "Pendiente",
                css_class: "servicios-status-pending",
                audit_label: "Pendiente",
            },
            ReservationStatus::Approved => StatusInfo {
                label: "Aprobada",
                css_class: "servicios-status-approved",
                audit_label: "Aprobada",
            },
            ReservationStatus::Rejected => StatusInfo {
                label: "Rechazada",
                css_class: "servicios-status-rejected",
                audit_label: "Rechazada",
            },
            ReservationStatus::Cancelled => StatusInfo {
                label: "Cancelada",
                css_class: "servicios-status-cancelled",
                audit_label: "Cancelado",
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn css_class(&self) -> &'static str {
        self.info().css_class
    }

    pub fn audit_label(&self) -> &'static str {
        self.info().audit_label
    }

    fn code(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled and rejected reservations are final.
    pub fn can_cancel(&self) -> bool {
        !self.is_closed()
    }

    /// Only closed reservations may be removed from the list.
    pub fn can_delete(&self) -> bool {
        self.is_closed()
    }

    fn is_closed(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Rejected
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    /// Accepts wire codes (`"approved"`) as well as display or audit labels (`"Aprobada"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReservationStatus::ALL
            .iter()
            .copied()
            .find(|status| {
                status.code().eq_ignore_ascii_case(trimmed)
                    || status.label().eq_ignore_ascii_case(trimmed)
                    || status.audit_label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown reservation status: {}", s))
    }
}

/// The three statuses offered by the "Mis reservas" overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::Pending,
        StatusFilter::Approved,
        StatusFilter::Rejected,
    ];

    pub fn status(&self) -> ReservationStatus {
        match self {
            StatusFilter::Pending => ReservationStatus::Pending,
            StatusFilter::Approved => ReservationStatus::Approved,
            StatusFilter::Rejected => ReservationStatus::Rejected,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StatusFilter::Pending => "Pendientes",
            StatusFilter::Approved => "Aprobadas",
            StatusFilter::Rejected => "Rechazadas",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatusFilter::Pending => "Solicitudes en revisión por el administrador",
            StatusFilter::Approved => "Solicitudes aprobadas y listas para usarse",
            StatusFilter::Rejected => "Solicitudes rechazadas por el administrador",
        }
    }
}

impl TryFrom<ReservationStatus> for StatusFilter {
    type Error = ReservationStatus;

    fn try_from(status: ReservationStatus) -> Result<Self, Self::Error> {
        match status {
            ReservationStatus::Pending => Ok(StatusFilter::Pending),
            ReservationStatus::Approved => Ok(StatusFilter::Approved),
            ReservationStatus::Rejected => Ok(StatusFilter::Rejected),
            other => Err(other),
        }
    }
}

/// What a reservation books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationKind {
    #[serde(rename = "laboratorio")]
    Laboratory,
    #[serde(rename = "aula")]
    Classroom,
    #[serde(rename = "psicologia")]
    Counseling,
}

impl From<SpaceKind> for ReservationKind {
    fn from(kind: SpaceKind) -> Self {
        match kind {
            SpaceKind::Laboratory => ReservationKind::Laboratory,
            SpaceKind::Classroom => ReservationKind::Classroom,
        }
    }
}

impl ReservationKind {
    /// The space kind booked by this reservation, if it books a space at all.
    pub fn space_kind(&self) -> Option<SpaceKind> {
        match self {
            ReservationKind::Laboratory => Some(SpaceKind::Laboratory),
            ReservationKind::Classroom => Some(SpaceKind::Classroom),
            ReservationKind::Counseling => None,
        }
    }
}

/// A reservation as listed to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    #[serde(rename = "type")]
    pub kind: ReservationKind,
    pub resource: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub status: ReservationStatus,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "curso", default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(rename = "bloqueId", default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<TimeBlockId>,
    #[serde(rename = "espacioId", default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<SpaceId>,
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl Reservation {
    /// Date plus start time, used for newest-first ordering.
    ///
    /// Reservations without a date sort as the Unix epoch.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self.date {
            Some(date) => timestamp_of(date, self.start_time.as_deref()),
            None => NaiveDateTime::UNIX_EPOCH,
        }
    }
}

/// Payload of a reservation submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    #[serde(rename = "usuario")]
    pub user: UserId,
    #[serde(rename = "espacio")]
    pub space: SpaceId,
    #[serde(rename = "fechaReserva")]
    pub date: NaiveDate,
    #[serde(rename = "bloque")]
    pub block: TimeBlockId,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
