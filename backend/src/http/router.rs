//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The portal frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Catalogs
        .route("/catalogos/facultades", get(handlers::list_faculties))
        .route("/catalogos/escuelas", get(handlers::list_schools))
        // Spaces and schedules
        .route("/espacios", get(handlers::list_spaces))
        .route("/espacios/{id}/horario", get(handlers::get_weekly_grid))
        .route("/bloques", get(handlers::list_block_options))
        // Reservations
        .route(
            "/reservas",
            get(handlers::list_reservations).post(handlers::create_quick_reservation),
        )
        .route("/reservas/formulario", post(handlers::create_form_reservation))
        .route("/reservas/{id}", delete(handlers::delete_reservation))
        .route("/reservas/{id}/estado", patch(handlers::update_reservation_status))
        .route("/reservas/{id}/cancelar", post(handlers::cancel_reservation))
        .route("/citas", post(handlers::create_counseling))
        // Audit trail
        .route("/auditoria-reservas", get(handlers::list_audit_records))
        .route(
            "/auditoria-reservas/reserva/{id}",
            get(handlers::get_reservation_audit),
        )
        .route(
            "/auditoria-reservas/reserva/{id}/ultimo",
            get(handlers::get_latest_reservation_change),
        )
        .route(
            "/auditoria-reservas/reserva/{id}/conteo",
            get(handlers::count_reservation_changes),
        )
        .route("/auditoria-reservas/reservas", get(handlers::list_audited_reservations))
        .route("/auditoria-reservas/usuarios", get(handlers::list_audit_users))
        .route("/auditoria-reservas/buscar", get(handlers::search_audit))
        .route("/auditoria-reservas/texto", get(handlers::search_audit_text))
        .route("/auditoria-reservas/recientes", get(handlers::recent_audit_changes))
        .route("/auditoria-reservas/estadisticas", get(handlers::audit_statistics))
        .route(
            "/auditoria-reservas/resumen/{year}",
            get(handlers::audit_monthly_summary),
        )
        .route("/auditoria-reservas/depurar", post(handlers::prune_audit_records));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
    }
}
