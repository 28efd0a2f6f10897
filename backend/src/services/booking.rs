//! Validation of the two reservation paths: the general form and the
//! per-space quick reservation opened from a space card.
//!
//! Both produce the same [`ReservationRequest`]; they differ in how the space
//! is chosen and in the description sent along with it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    format_time, BlockOption, ReservationRequest, Space, SpaceKind, TimeBlock, TimeBlockCatalog,
    TimeBlockId, UserId,
};

/// Academic cycles offered by the forms.
pub const CYCLES: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

pub const SUCCESS_MESSAGE: &str =
    "¡Reserva enviada! Tu solicitud está pendiente de aprobación por el administrador.";

const NO_EXTRA_DESCRIPTION: &str = "Sin descripción adicional";

/// Why a reservation form cannot be submitted. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Selecciona un bloque horario disponible antes de enviar tu solicitud.")]
    MissingBlock,
    #[error("El bloque horario seleccionado no es válido.")]
    InvalidBlock,
    #[error("No se pudo identificar el bloque horario seleccionado. Intenta nuevamente.")]
    UnknownBlock(TimeBlockId),
    #[error("Selecciona la fecha de tu reserva.")]
    MissingDate,
    #[error("La fecha de la reserva no puede ser anterior a hoy.")]
    DateInPast(NaiveDate),
    #[error("Selecciona un ciclo válido.")]
    InvalidCycle,
    #[error("Ingresa el curso para el que necesitas el espacio.")]
    MissingCourse,
    #[error("El espacio seleccionado no está disponible para reservas.")]
    SpaceUnavailable,
    #[error("Espacio no encontrado")]
    SpaceNotFound,
}

/// Quick reservation modal opened from a space card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReservationForm {
    #[serde(rename = "ciclo", default)]
    pub cycle: String,
    #[serde(rename = "curso", default)]
    pub course: String,
    #[serde(default)]
    pub date: String,
    /// Raw value of the block `<select>`.
    #[serde(default)]
    pub bloque_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(rename = "motivo", default)]
    pub reason: String,
}

impl QuickReservationForm {
    /// Apply a block selection, copying its times into the form.
    pub fn select_block(&mut self, value: &str, options: &[BlockOption]) {
        apply_block_selection(
            value,
            options,
            &mut self.bloque_id,
            &mut self.start_time,
            &mut self.end_time,
        );
    }

    /// Check the form against the space and catalog and build the request.
    pub fn validate(
        &self,
        space: &Space,
        user: UserId,
        catalog: &TimeBlockCatalog,
        today: NaiveDate,
    ) -> Result<ReservationRequest, BookingError> {
        let block = resolve_block(&self.bloque_id, catalog)?;
        let date = resolve_date(&self.date, today)?;
        let cycle = resolve_cycle(&self.cycle)?;
        let course = resolve_course(&self.course)?;
        if !space.is_bookable() {
            return Err(BookingError::SpaceUnavailable);
        }

        let start = format_time(block.start.as_deref());
        let end = format_time(block.end.as_deref());
        let extra = if self.reason.is_empty() {
            NO_EXTRA_DESCRIPTION
        } else {
            self.reason.as_str()
        };
        let reason = Some(self.reason.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(ReservationRequest {
            user,
            space: space.id,
            date,
            block: block.id,
            description: format!(
                "Ciclo: {} - Curso: {} - Horario: {} a {} - {}",
                cycle, course, start, end, extra
            ),
            reason,
        })
    }
}

/// General "Nueva reserva" form: the space is picked by kind and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceReservationForm {
    #[serde(rename = "type")]
    pub kind: SpaceKind,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub bloque_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(rename = "ciclo", default)]
    pub cycle: String,
    #[serde(rename = "curso", default)]
    pub course: String,
}

impl SpaceReservationForm {
    pub fn new(kind: SpaceKind) -> Self {
        Self {
            kind,
            resource: String::new(),
            date: String::new(),
            bloque_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            cycle: String::new(),
            course: String::new(),
        }
    }

    pub fn select_block(&mut self, value: &str, options: &[BlockOption]) {
        apply_block_selection(
            value,
            options,
            &mut self.bloque_id,
            &mut self.start_time,
            &mut self.end_time,
        );
    }

    /// Resolve the named space and validate the rest like the quick path.
    pub fn validate(
        &self,
        spaces: &[Space],
        user: UserId,
        catalog: &TimeBlockCatalog,
        today: NaiveDate,
    ) -> Result<ReservationRequest, BookingError> {
        let space = spaces
            .iter()
            .find(|s| s.kind == self.kind && s.name == self.resource)
            .ok_or(BookingError::SpaceNotFound)?;
        let block = resolve_block(&self.bloque_id, catalog)?;
        let date = resolve_date(&self.date, today)?;
        let cycle = resolve_cycle(&self.cycle)?;
        let course = resolve_course(&self.course)?;
        if !space.is_bookable() {
            return Err(BookingError::SpaceUnavailable);
        }

        Ok(ReservationRequest {
            user,
            space: space.id,
            date,
            block: block.id,
            description: format!("Ciclo: {} - Curso: {}", cycle, course),
            reason: None,
        })
    }
}

fn apply_block_selection(
    value: &str,
    options: &[BlockOption],
    block_id: &mut String,
    start: &mut String,
    end: &mut String,
) {
    let selected = value
        .trim()
        .parse::<TimeBlockId>()
        .ok()
        .and_then(|id| options.iter().find(|o| o.id == id));

    match selected {
        Some(option) => {
            *block_id = value.trim().to_string();
            *start = option.start.clone();
            *end = option.end.clone();
        }
        None => {
            *block_id = value.trim().to_string();
            start.clear();
            end.clear();
        }
    }
}

fn resolve_block<'a>(
    raw: &str,
    catalog: &'a TimeBlockCatalog,
) -> Result<&'a TimeBlock, BookingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BookingError::MissingBlock);
    }
    let id: TimeBlockId = raw.parse().map_err(|_| BookingError::InvalidBlock)?;
    catalog.get(id).ok_or(BookingError::UnknownBlock(id))
}

fn resolve_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, BookingError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::MissingDate)?;
    if date < today {
        return Err(BookingError::DateInPast(date));
    }
    Ok(date)
}

fn resolve_cycle(raw: &str) -> Result<&str, BookingError> {
    let cycle = raw.trim();
    CYCLES
        .iter()
        .find(|c| **c == cycle)
        .copied()
        .ok_or(BookingError::InvalidCycle)
}

fn resolve_course(raw: &str) -> Result<&str, BookingError> {
    let course = raw.trim();
    if course.is_empty() {
        Err(BookingError::MissingCourse)
    } else {
        Ok(course)
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod booking_tests;
