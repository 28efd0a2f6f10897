//! Navigation through the portal controller with injected sessions.

mod support;

use std::sync::Arc;

use integraupt_portal::db::repository::CatalogRepository;
use integraupt_portal::db::services;
use integraupt_portal::models::{
    AcademicCatalog, ReservationId, SchoolId, SpaceId, StatusFilter, UserId,
};
use integraupt_portal::portal::{
    BackendSession, JsonSessionProvider, LoginType, PortalController, PortalEvent, PortalUser,
    PortalView, SessionProfile, StaticSessionProvider, TransitionError,
};
use integraupt_portal::models::SpaceKind;
use integraupt_portal::services::booking::{QuickReservationForm, SpaceReservationForm};

fn academic_user() -> PortalUser {
    PortalUser {
        id: UserId::new(1),
        email: "ana.flores@virtual.upt.pe".to_string(),
        name: "Ana Flores".to_string(),
        role: Some("estudiante".to_string()),
        login_type: Some(LoginType::Academic),
        code: Some("2020067145".to_string()),
    }
}

async fn catalog() -> AcademicCatalog {
    support::portal_repository().academic_catalog().await.unwrap()
}

#[tokio::test]
async fn test_academic_session_filters_spaces_by_school() {
    let session = BackendSession {
        profile: Some(SessionProfile {
            school: Some("INGENIERIA DE SISTEMAS".to_string()),
        }),
    };
    let provider = Arc::new(StaticSessionProvider::new(academic_user(), Some(session)));
    let controller = PortalController::new(provider, &catalog().await);

    assert_eq!(controller.school_filter(), Some(SchoolId::new(1)));
    assert_eq!(controller.user().name, "Ana Flores");

    let repo = support::portal_repository();
    let spaces = services::list_spaces(&repo, controller.school_filter())
        .await
        .unwrap();
    assert!(spaces.iter().all(|s| s.id != SpaceId::new(3)));
}

#[tokio::test]
async fn test_unreadable_session_disables_filter() {
    let provider = Arc::new(JsonSessionProvider::new(
        academic_user(),
        Some("{not json".to_string()),
    ));
    let controller = PortalController::new(provider, &catalog().await);
    assert_eq!(controller.school_filter(), None);
}

#[tokio::test]
async fn test_non_academic_login_is_not_filtered() {
    let mut user = academic_user();
    user.login_type = Some(LoginType::Other);
    let provider = Arc::new(JsonSessionProvider::new(
        user,
        Some(r#"{"perfil": {"escuela": "Ingeniería Civil"}}"#.to_string()),
    ));
    let controller = PortalController::new(provider, &catalog().await);
    assert_eq!(controller.school_filter(), None);
}

#[tokio::test]
async fn test_booking_round_trip_through_views() {
    let provider = Arc::new(StaticSessionProvider::new(academic_user(), None));
    let mut controller = PortalController::new(provider, &catalog().await);
    assert_eq!(controller.view(), PortalView::Menu);

    controller.dispatch(PortalEvent::SelectSpacesService).unwrap();
    controller
        .dispatch(PortalEvent::ViewSchedule {
            space: SpaceId::new(1),
        })
        .unwrap();
    assert_eq!(
        controller.view(),
        PortalView::WeeklySchedule {
            space: SpaceId::new(1)
        }
    );

    controller.dispatch(PortalEvent::Back).unwrap();
    let modal = controller
        .dispatch(PortalEvent::OpenReservationModal {
            space: SpaceId::new(1),
        })
        .unwrap();

    // the modal stays open after submitting so the success message can show
    let repo = support::portal_repository();
    let form = QuickReservationForm {
        cycle: "III".to_string(),
        course: "Física I".to_string(),
        date: "2025-10-12".to_string(),
        bloque_id: "1".to_string(),
        ..QuickReservationForm::default()
    };
    services::submit_quick_reservation(
        &repo,
        SpaceId::new(1),
        controller.user().id,
        &form,
        support::today(),
    )
    .await
    .unwrap();
    assert_eq!(controller.dispatch(PortalEvent::Submitted).unwrap(), modal);

    controller.dispatch(PortalEvent::CloseModal).unwrap();
    assert_eq!(controller.view(), PortalView::SpacesGrid);

    controller.open_status_overlay().unwrap();
    let all = services::list_reservations(&repo, None).await.unwrap();
    let listed = controller.overlay_reservations(&all);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].resource, "Laboratorio A");
}

#[tokio::test]
async fn test_general_form_booking_from_menu() {
    let provider = Arc::new(StaticSessionProvider::new(academic_user(), None));
    let mut controller = PortalController::new(provider, &catalog().await);

    controller.dispatch(PortalEvent::ShowReservationList).unwrap();
    assert_eq!(controller.view(), PortalView::ReservationList);
    controller.dispatch(PortalEvent::NewReservation).unwrap();
    assert_eq!(controller.view(), PortalView::NewReservation);

    let repo = support::portal_repository();
    let form = SpaceReservationForm {
        resource: "Aula 305".to_string(),
        date: "2025-10-20".to_string(),
        bloque_id: "3".to_string(),
        cycle: "VI".to_string(),
        course: "Estadística".to_string(),
        ..SpaceReservationForm::new(SpaceKind::Classroom)
    };
    let created = services::submit_form_reservation(
        &repo,
        controller.user().id,
        &form,
        support::today(),
    )
    .await
    .unwrap();
    assert_eq!(created.space_id, Some(SpaceId::new(4)));

    assert_eq!(
        controller.dispatch(PortalEvent::Submitted).unwrap(),
        PortalView::NewReservation
    );
    controller.dispatch(PortalEvent::Back).unwrap();
    assert_eq!(controller.view(), PortalView::ReservationList);
    controller.open_status_overlay().unwrap();
}

#[tokio::test]
async fn test_invalid_event_leaves_view_unchanged() {
    let provider = Arc::new(StaticSessionProvider::new(academic_user(), None));
    let mut controller = PortalController::new(provider, &catalog().await);

    let err = controller.dispatch(PortalEvent::Submitted).unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    assert_eq!(controller.view(), PortalView::Menu);

    // the overlay is only offered from the grid and the list
    assert!(matches!(
        controller.open_status_overlay(),
        Err(TransitionError::OverlayUnavailable(PortalView::Menu))
    ));
    assert!(!controller.overlay().open);
}

#[tokio::test]
async fn test_status_overlay_state() {
    let provider = Arc::new(StaticSessionProvider::new(academic_user(), None));
    let mut controller = PortalController::new(provider, &catalog().await);
    controller.dispatch(PortalEvent::SelectSpacesService).unwrap();

    controller.open_status_overlay().unwrap();
    assert_eq!(controller.overlay().query.status, StatusFilter::Pending);

    controller.set_status_filter(StatusFilter::Rejected);
    controller.toggle_reason(ReservationId::new(3));
    assert_eq!(controller.overlay().expanded_reason, Some(ReservationId::new(3)));
    controller.toggle_reason(ReservationId::new(3));
    assert_eq!(controller.overlay().expanded_reason, None);

    controller.set_search("aula");
    controller.close_status_overlay();
    assert!(!controller.overlay().open);
    assert!(controller.overlay_reservations(&[]).is_empty());

    // reopening resets the filter
    controller.open_status_overlay().unwrap();
    assert_eq!(controller.overlay().query.status, StatusFilter::Pending);
    assert!(controller.overlay().query.search.is_empty());
}
