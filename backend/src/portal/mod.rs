//! Services portal navigation: the view-state machine, the reservation status
//! overlay and the session the portal runs under.

pub mod session;
pub mod state;

use std::sync::Arc;

use serde::Serialize;

use crate::models::{AcademicCatalog, Reservation, ReservationId, SchoolId, StatusFilter};
use crate::services::reservations::{filter_reservations, ReservationQuery};

pub use session::{
    resolve_school_id, BackendSession, JsonSessionProvider, LoginType, PortalUser, SessionError,
    SessionProfile, SessionProvider, StaticSessionProvider,
};
pub use state::{transition, PortalEvent, PortalView, TransitionError};

/// "Mis reservas" overlay. Orthogonal to the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusOverlay {
    pub open: bool,
    pub query: ReservationQuery,
    /// Rejected reservation whose rejection reason is expanded.
    pub expanded_reason: Option<ReservationId>,
}

/// Drives the portal for one signed-in user.
pub struct PortalController {
    view: PortalView,
    overlay: StatusOverlay,
    session: Arc<dyn SessionProvider>,
    school: Option<SchoolId>,
}

impl PortalController {
    /// Start at the menu. The user's school is resolved once, up front.
    pub fn new(session: Arc<dyn SessionProvider>, catalog: &AcademicCatalog) -> Self {
        let school = resolve_school_id(session.as_ref(), catalog);
        Self {
            view: PortalView::Menu,
            overlay: StatusOverlay::default(),
            session,
            school,
        }
    }

    pub fn view(&self) -> PortalView {
        self.view
    }

    pub fn overlay(&self) -> &StatusOverlay {
        &self.overlay
    }

    pub fn user(&self) -> &PortalUser {
        self.session.current_user()
    }

    /// School the spaces list is restricted to, if any.
    pub fn school_filter(&self) -> Option<SchoolId> {
        self.school
    }

    pub fn dispatch(&mut self, event: PortalEvent) -> Result<PortalView, TransitionError> {
        let next = transition(self.view, event)?;
        log::debug!("Portal view: {} -> {} on '{}'", self.view, next, event);
        self.view = next;
        Ok(next)
    }

    /// Open the overlay on the pending tab with an empty search.
    pub fn open_status_overlay(&mut self) -> Result<(), TransitionError> {
        if !self.view.allows_status_overlay() {
            return Err(TransitionError::OverlayUnavailable(self.view));
        }
        self.overlay = StatusOverlay {
            open: true,
            ..StatusOverlay::default()
        };
        Ok(())
    }

    pub fn close_status_overlay(&mut self) {
        self.overlay.open = false;
        self.overlay.expanded_reason = None;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.overlay.query.status = status;
        self.overlay.expanded_reason = None;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.overlay.query.search = text.into();
    }

    /// Expand or collapse the rejection reason of a reservation.
    pub fn toggle_reason(&mut self, reservation: ReservationId) {
        self.overlay.expanded_reason = match self.overlay.expanded_reason {
            Some(current) if current == reservation => None,
            _ => Some(reservation),
        };
    }

    /// Reservations listed by the overlay, newest first. Empty while closed.
    pub fn overlay_reservations(&self, reservations: &[Reservation]) -> Vec<Reservation> {
        if !self.overlay.open {
            return Vec::new();
        }
        filter_reservations(reservations, &self.overlay.query)
    }
}
