//! Request-level tests of the axum router.
#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use integraupt_portal::db::repository::FullRepository;
use integraupt_portal::http::{create_router, AppState};

fn app() -> Router {
    let repo = Arc::new(support::portal_repository()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn quick_body(block: &str, date: &str) -> Value {
    json!({
        "espacioId": 1,
        "usuarioId": 1,
        "ciclo": "IV",
        "curso": "Redes I",
        "date": date,
        "bloqueId": block,
        "motivo": ""
    })
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/catalogos/facultades", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "nombre": "Facultad de Ingeniería"}]));

    let (_, body) = send(&app, Method::GET, "/v1/catalogos/escuelas?facultadId=1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/v1/catalogos/escuelas?facultadId=5", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_spaces_and_schedule() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/espacios?escuelaId=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["nombre"], "Aula 201");

    let (status, body) = send(&app, Method::GET, "/v1/espacios/1/horario", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bloques"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, "/v1/espacios/99/horario", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_block_options() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/bloques", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_quick_reservation_lifecycle() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/reservas",
        Some(quick_body("1", "2099-03-02")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["mensaje"],
        "¡Reserva enviada! Tu solicitud está pendiente de aprobación por el administrador."
    );
    assert_eq!(body["reserva"]["status"], "pending");
    let id = body["reserva"]["id"].as_i64().unwrap();

    let uri = "/v1/reservas?estado=pending&busqueda=LABORATORIO";
    let (_, listed) = send(&app, Method::GET, uri, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/v1/reservas/{}/estado", id),
        Some(json!({"estado": "Aprobada", "usuarioCambio": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reserva"]["status"], "approved");
    assert_eq!(body["auditoria"]["estadoAnterior"], "Pendiente");

    let (_, history) = send(
        &app,
        Method::GET,
        &format!("/v1/auditoria-reservas/reserva/{}", id),
        None,
    )
    .await;
    assert_eq!(history[0]["nombreUsuario"], "Admin Portal");

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/reservas/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/reservas/{}/cancelar", id),
        Some(json!({"usuarioCambio": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auditoria"]["estadoNuevo"], "Cancelado");

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/reservas/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_quick_reservation_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/reservas",
        Some(quick_body("abc", "2099-03-02")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "El bloque horario seleccionado no es válido.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/reservas",
        Some(quick_body("1", "2000-01-01")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "La fecha de la reserva no puede ser anterior a hoy."
    );
}

#[tokio::test]
async fn test_form_reservation() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/reservas/formulario",
        Some(json!({
            "usuarioId": 2,
            "type": "Aula",
            "resource": "Aula 305",
            "date": "2099-05-10",
            "bloqueId": "2",
            "ciclo": "VI",
            "curso": "Estadística"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reserva"]["type"], "aula");
    assert_eq!(body["reserva"]["espacioId"], 4);
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/v1/reservas/1/estado",
        Some(json!({"estado": "archivada", "usuarioCambio": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_counseling_appointment() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/citas",
        Some(json!({"date": "2099-01-15", "startTime": "16:00", "motivo": "Estrés académico"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "psicologia");
    assert_eq!(body["endTime"], "16:40");
}

#[tokio::test]
async fn test_audit_endpoints() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/v1/reservas",
        Some(quick_body("2", "2099-03-02")),
    )
    .await;
    let id = created["reserva"]["id"].as_i64().unwrap();
    send(
        &app,
        Method::PATCH,
        &format!("/v1/reservas/{}/estado", id),
        Some(json!({"estado": "rejected", "usuarioCambio": 9})),
    )
    .await;

    let (status, all) = send(&app, Method::GET, "/v1/auditoria-reservas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["espacioReserva"], "Laboratorio A");
    assert_eq!(all[0]["solicitanteReserva"], "Ana Flores");

    let (_, found) = send(
        &app,
        Method::GET,
        &format!("/v1/auditoria-reservas/buscar?idReserva={}&estadoNuevo=Rechazada", id),
        None,
    )
    .await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let inverted = concat!(
        "/v1/auditoria-reservas/buscar",
        "?fechaInicio=2025-10-02T00:00:00&fechaFin=2025-10-01T00:00:00"
    );
    let (status, _) = send(&app, Method::GET, inverted, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, latest) = send(
        &app,
        Method::GET,
        &format!("/v1/auditoria-reservas/reserva/{}/ultimo", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["estadoNuevo"], "Rechazada");

    let (_, count) = send(
        &app,
        Method::GET,
        &format!("/v1/auditoria-reservas/reserva/{}/conteo", id),
        None,
    )
    .await;
    assert_eq!(count["cambios"], 1);

    let uri = "/v1/auditoria-reservas/reserva/404/ultimo";
    let (status, _) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, ids) = send(&app, Method::GET, "/v1/auditoria-reservas/reservas", None).await;
    assert_eq!(ids, json!([id]));
    let (_, users) = send(&app, Method::GET, "/v1/auditoria-reservas/usuarios", None).await;
    assert_eq!(users, json!([9]));

    let (_, text) = send(&app, Method::GET, "/v1/auditoria-reservas/texto?q=rechaz", None).await;
    assert_eq!(text.as_array().unwrap().len(), 1);

    let uri = "/v1/auditoria-reservas/estadisticas";
    let (status, stats) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["rechazadas"], 1);

    let (_, recent) = send(&app, Method::GET, "/v1/auditoria-reservas/recientes", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);

    let uri = "/v1/auditoria-reservas/resumen/1999";
    let (status, summary) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["anio"], 1999);
    assert_eq!(summary["meses"]["1"], 0);

    let (status, pruned) = send(&app, Method::POST, "/v1/auditoria-reservas/depurar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pruned["eliminados"], 0);
}
