//! View-state machine of the services portal.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ReservationId, SpaceId};

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "vista", rename_all = "camelCase")]
pub enum PortalView {
    /// Service picker (spaces or counseling).
    #[default]
    Menu,
    /// The user's space reservations.
    ReservationList,
    SpacesGrid,
    WeeklySchedule { space: SpaceId },
    NewReservation,
    EditReservation { reservation: ReservationId },
    /// Quick reservation modal over the spaces grid.
    ReservationModal { space: SpaceId },
    Counseling,
}

impl PortalView {
    /// Views from which the "Mis reservas" overlay can be opened.
    pub fn allows_status_overlay(&self) -> bool {
        matches!(self, PortalView::SpacesGrid | PortalView::ReservationList)
    }
}

impl fmt::Display for PortalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalView::Menu => write!(f, "menu"),
            PortalView::ReservationList => write!(f, "reservation list"),
            PortalView::SpacesGrid => write!(f, "spaces grid"),
            PortalView::WeeklySchedule { space } => write!(f, "weekly schedule of space {}", space),
            PortalView::NewReservation => write!(f, "new reservation"),
            PortalView::EditReservation { reservation } => {
                write!(f, "edit reservation {}", reservation)
            }
            PortalView::ReservationModal { space } => {
                write!(f, "reservation modal for space {}", space)
            }
            PortalView::Counseling => write!(f, "counseling"),
        }
    }
}

/// User actions that move between views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "evento", rename_all = "camelCase")]
pub enum PortalEvent {
    SelectSpacesService,
    SelectCounselingService,
    ViewSchedule { space: SpaceId },
    OpenReservationModal { space: SpaceId },
    CloseModal,
    NewReservation,
    EditReservation { reservation: ReservationId },
    ShowSpacesGrid,
    /// "Mis reservas de espacios" list, reachable from the menu and the grid.
    ShowReservationList,
    Back,
    Submitted,
}

impl fmt::Display for PortalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalEvent::SelectSpacesService => write!(f, "select spaces service"),
            PortalEvent::SelectCounselingService => write!(f, "select counseling service"),
            PortalEvent::ViewSchedule { space } => write!(f, "view schedule of space {}", space),
            PortalEvent::OpenReservationModal { space } => {
                write!(f, "open reservation modal for space {}", space)
            }
            PortalEvent::CloseModal => write!(f, "close modal"),
            PortalEvent::NewReservation => write!(f, "new reservation"),
            PortalEvent::EditReservation { reservation } => {
                write!(f, "edit reservation {}", reservation)
            }
            PortalEvent::ShowSpacesGrid => write!(f, "show spaces grid"),
            PortalEvent::ShowReservationList => write!(f, "show reservation list"),
            PortalEvent::Back => write!(f, "back"),
            PortalEvent::Submitted => write!(f, "submitted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Event '{event}' is not valid in view '{view}'")]
    InvalidTransition { view: PortalView, event: PortalEvent },

    #[error("The reservation status overlay cannot be opened from view '{0}'")]
    OverlayUnavailable(PortalView),
}

/// Next view for an event, or an error leaving the current view untouched.
pub fn transition(view: PortalView, event: PortalEvent) -> Result<PortalView, TransitionError> {
    use PortalEvent as E;
    use PortalView as V;

    let next = match (view, event) {
        (V::Menu, E::SelectSpacesService) => V::SpacesGrid,
        (V::Menu, E::SelectCounselingService) => V::Counseling,
        (V::Menu, E::ShowReservationList) => V::ReservationList,

        (V::SpacesGrid, E::ViewSchedule { space }) => V::WeeklySchedule { space },
        (V::SpacesGrid, E::OpenReservationModal { space }) => V::ReservationModal { space },
        (V::SpacesGrid, E::ShowReservationList) => V::ReservationList,
        (V::SpacesGrid, E::Back) => V::Menu,

        (V::WeeklySchedule { .. }, E::Back) => V::SpacesGrid,

        // the modal stays open after a successful submission to show the confirmation
        (V::ReservationModal { space }, E::Submitted) => V::ReservationModal { space },
        (V::ReservationModal { .. }, E::CloseModal) => V::SpacesGrid,

        (V::ReservationList, E::ShowSpacesGrid) => V::SpacesGrid,
        (V::ReservationList, E::NewReservation) => V::NewReservation,
        (V::ReservationList, E::EditReservation { reservation }) => {
            V::EditReservation { reservation }
        }
        (V::ReservationList, E::Back) => V::Menu,

        (V::NewReservation, E::Submitted) => V::NewReservation,
        (V::NewReservation, E::Back) => V::ReservationList,

        (V::EditReservation { .. }, E::Submitted | E::Back) => V::ReservationList,

        (V::Counseling, E::Submitted | E::Back) => V::Menu,

        (view, event) => return Err(TransitionError::InvalidTransition { view, event }),
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_flow() {
        let space = SpaceId::new(7);
        let view = transition(PortalView::Menu, PortalEvent::SelectSpacesService).unwrap();
        assert_eq!(view, PortalView::SpacesGrid);

        let view = transition(view, PortalEvent::ViewSchedule { space }).unwrap();
        assert_eq!(view, PortalView::WeeklySchedule { space });

        let view = transition(view, PortalEvent::Back).unwrap();
        let view = transition(view, PortalEvent::OpenReservationModal { space }).unwrap();
        assert_eq!(view, PortalView::ReservationModal { space });

        let view = transition(view, PortalEvent::Submitted).unwrap();
        assert_eq!(view, PortalView::ReservationModal { space });

        let view = transition(view, PortalEvent::CloseModal).unwrap();
        assert_eq!(transition(view, PortalEvent::Back).unwrap(), PortalView::Menu);
    }

    #[test]
    fn test_counseling_returns_to_menu() {
        let view = transition(PortalView::Menu, PortalEvent::SelectCounselingService).unwrap();
        assert_eq!(view, PortalView::Counseling);
        assert_eq!(
            transition(view, PortalEvent::Submitted).unwrap(),
            PortalView::Menu
        );
    }

    #[test]
    fn test_reservation_list_is_reachable() {
        let view = transition(PortalView::Menu, PortalEvent::ShowReservationList).unwrap();
        assert_eq!(view, PortalView::ReservationList);

        let grid = transition(view, PortalEvent::ShowSpacesGrid).unwrap();
        assert_eq!(
            transition(grid, PortalEvent::ShowReservationList).unwrap(),
            PortalView::ReservationList
        );
    }

    #[test]
    fn test_reservation_list_flow() {
        let reservation = ReservationId::new(4);
        let view = transition(
            PortalView::ReservationList,
            PortalEvent::EditReservation { reservation },
        )
        .unwrap();
        assert_eq!(view, PortalView::EditReservation { reservation });
        assert_eq!(
            transition(view, PortalEvent::Submitted).unwrap(),
            PortalView::ReservationList
        );
        assert_eq!(
            transition(PortalView::NewReservation, PortalEvent::Back).unwrap(),
            PortalView::ReservationList
        );
    }

    #[test]
    fn test_invalid_pairs_are_rejected() {
        let err = transition(PortalView::Menu, PortalEvent::CloseModal).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                view: PortalView::Menu,
                event: PortalEvent::CloseModal,
            }
        );
        assert_eq!(err.to_string(), "Event 'close modal' is not valid in view 'menu'");

        assert!(transition(
            PortalView::WeeklySchedule { space: SpaceId::new(1) },
            PortalEvent::Submitted
        )
        .is_err());
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let view = PortalView::WeeklySchedule {
            space: SpaceId::new(3),
        };
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["vista"], "weeklySchedule");
        assert_eq!(json["space"], 3);
    }
}
