//! Listing, filtering and lifecycle actions on a user's reservations.

use serde::{Deserialize, Serialize};

use crate::models::text::contains_folded;
use crate::models::{
    AcademicCatalog, Reservation, ReservationId, ReservationStatus, SchoolId, Space, SpaceKind,
    StatusFilter,
};

/// Criteria of the "Mis reservas" overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationQuery {
    #[serde(rename = "estado", default)]
    pub status: StatusFilter,
    #[serde(rename = "busqueda", default)]
    pub search: String,
}

impl ReservationQuery {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }
}

/// Reservations in the queried status whose resource matches the search text,
/// newest first.
pub fn filter_reservations(
    reservations: &[Reservation],
    query: &ReservationQuery,
) -> Vec<Reservation> {
    let wanted = query.status.status();
    let mut matching: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.status == wanted)
        .filter(|r| contains_folded(&r.resource, &query.search))
        .cloned()
        .collect();

    // stable: equal timestamps keep list order
    matching.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    matching
}

/// Mark a reservation as cancelled. Returns false when it is missing or already closed.
pub fn cancel(reservations: &mut [Reservation], id: ReservationId) -> bool {
    match reservations.iter_mut().find(|r| r.id == id) {
        Some(reservation) if reservation.status.can_cancel() => {
            reservation.status = ReservationStatus::Cancelled;
            true
        }
        _ => false,
    }
}

/// Remove a cancelled or rejected reservation. Returns false when nothing was removed.
pub fn remove(reservations: &mut Vec<Reservation>, id: ReservationId) -> bool {
    let Some(index) = reservations.iter().position(|r| r.id == id) else {
        return false;
    };
    if !reservations[index].status.can_delete() {
        return false;
    }
    reservations.remove(index);
    true
}

/// Spaces offered by the general reservation form for a kind.
pub fn spaces_of_kind(spaces: &[Space], kind: SpaceKind) -> Vec<&Space> {
    spaces.iter().filter(|s| s.kind == kind).collect()
}

/// Spaces belonging to a school. `None` disables the filter.
///
/// Space records carry the school by name, so each name is resolved through the catalog.
pub fn spaces_for_school(
    spaces: &[Space],
    school: Option<SchoolId>,
    catalog: &AcademicCatalog,
) -> Vec<Space> {
    match school {
        None => spaces.to_vec(),
        Some(id) => spaces
            .iter()
            .filter(|s| catalog.school_id_by_name(&s.school) == Some(id))
            .cloned()
            .collect(),
    }
}
