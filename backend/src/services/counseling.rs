//! Psychological counseling appointments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    add_minutes, clock_label, parse_clock, Reservation, ReservationId, ReservationKind,
    ReservationStatus, UserId,
};

/// Fixed length of a counseling session.
pub const SESSION_MINUTES: i64 = 40;

pub const COUNSELING_RESOURCE: &str = "Orientación Psicológica";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounselingError {
    #[error("Selecciona la fecha de tu cita.")]
    InvalidDate,
    #[error("La fecha de la cita no puede ser anterior a hoy.")]
    DateInPast(NaiveDate),
    #[error("Selecciona una hora de inicio válida.")]
    InvalidStartTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselingForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(rename = "motivo", default)]
    pub reason: String,
}

/// Book a counseling session starting at the requested time.
///
/// The appointment is pending until confirmed and ends [`SESSION_MINUTES`] later.
pub fn schedule_counseling(
    id: ReservationId,
    user: Option<UserId>,
    form: &CounselingForm,
    today: NaiveDate,
) -> Result<Reservation, CounselingError> {
    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| CounselingError::InvalidDate)?;
    if date < today {
        return Err(CounselingError::DateInPast(date));
    }
    let start = parse_clock(&form.start_time).ok_or(CounselingError::InvalidStartTime)?;
    let start_time = clock_label(start);
    let end_time =
        add_minutes(&start_time, SESSION_MINUTES).ok_or(CounselingError::InvalidStartTime)?;

    Ok(Reservation {
        id,
        kind: ReservationKind::Counseling,
        resource: COUNSELING_RESOURCE.to_string(),
        date: Some(date),
        start_time: Some(start_time),
        end_time: Some(end_time),
        status: ReservationStatus::Pending,
        reason: Some(form.reason.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        course: None,
        block_id: None,
        space_id: None,
        user_id: user,
    })
}
