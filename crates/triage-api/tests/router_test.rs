//! Router tests against the in-memory store and a scripted model backend.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use triage_api::{app, AppState, StoreKind};
use triage_core::{
    Category, ClassificationResult, CreateTicketRequest, HeuristicClassifier, Sentiment,
    TicketRepository,
};
use triage_db::MemoryTicketRepository;
use triage_inference::mock::ScriptedBackend;
use triage_inference::TicketClassifier;

struct TestApp {
    router: Router,
    repo: MemoryTicketRepository,
    backend: ScriptedBackend,
}

fn test_app(backend: ScriptedBackend) -> TestApp {
    let repo = MemoryTicketRepository::new();
    let classifier = TicketClassifier::with_backend(Arc::new(backend.clone()));
    let state = AppState::new(Arc::new(repo.clone()), classifier, StoreKind::Memory);
    TestApp {
        router: app(state, &["*".to_string()]),
        repo,
        backend,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_root_banner() {
    let app = test_app(ScriptedBackend::new());
    let (status, body) = send(&app.router, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["process_ticket"], "POST /process-ticket");
}

#[tokio::test]
async fn test_create_ticket() {
    let app = test_app(ScriptedBackend::new());
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/create_ticket",
        Some(json!({ "description": "No puedo acceder a mi cuenta desde ayer" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["processed"], false);
    assert!(body["category"].is_null());
    assert!(body["sentiment"].is_null());
    assert!(!body["request_id"].as_str().unwrap().is_empty());
    assert_eq!(app.repo.len().await, 1);
}

#[tokio::test]
async fn test_create_ticket_echoes_request_id_header() {
    let app = test_app(ScriptedBackend::new());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/create_ticket")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-123")
        .body(Body::from(
            json!({ "description": "Consulta sobre precios" }).to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], "req-123");
}

#[tokio::test]
async fn test_create_ticket_rejects_bad_lengths() {
    let app = test_app(ScriptedBackend::new());

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/create_ticket",
        Some(json!({ "description": "corto" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/create_ticket",
        Some(json!({ "description": "x".repeat(1001) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_process_ticket_with_model() {
    let app = test_app(ScriptedBackend::new().then_respond(
        r#"Here you go: {"category":"Facturación","sentiment":"positivo"} thanks"#,
    ));
    let ticket = app
        .repo
        .insert(CreateTicketRequest::new("Gracias por corregir mi factura").unwrap())
        .await
        .unwrap();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/process-ticket",
        Some(json!({ "ticket_id": ticket.id.to_string() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Billing");
    assert_eq!(body["sentiment"], "Positive");
    assert_eq!(body["processed"], true);
    assert_eq!(body["method"], "model");

    let stored = app.repo.fetch(ticket.id).await.unwrap();
    assert!(stored.processed);
    assert_eq!(stored.category, Some(Category::Billing));
}

#[tokio::test(start_paused = true)]
async fn test_process_ticket_falls_back_to_heuristic() {
    let app = test_app(ScriptedBackend::new().always_failing());
    let ticket = app
        .repo
        .insert(
            CreateTicketRequest::new("El sistema está caído y no puedo iniciar sesión").unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/process-ticket",
        Some(json!({ "ticket_id": ticket.id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Technical");
    assert_eq!(body["sentiment"], "Negative");
    assert_eq!(body["method"], "heuristic");
    assert_eq!(app.backend.call_count(), 3);
}

#[tokio::test]
async fn test_process_ticket_invalid_id() {
    let app = test_app(ScriptedBackend::new());
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/process-ticket",
        Some(json!({ "ticket_id": "not-a-uuid" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not-a-uuid"));
}

#[tokio::test]
async fn test_process_ticket_unknown_id() {
    let app = test_app(ScriptedBackend::new());
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/process-ticket",
        Some(json!({ "ticket_id": "00000000-0000-0000-0000-000000000000" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Ticket not found");
    assert_eq!(app.backend.call_count(), 0);
}

#[tokio::test]
async fn test_process_ticket_already_processed() {
    let app = test_app(ScriptedBackend::new());
    let ticket = app
        .repo
        .insert(CreateTicketRequest::new("Quisiera cambiar mi plan actual").unwrap())
        .await
        .unwrap();
    let labels = ClassificationResult::new(Category::Commercial, Sentiment::Neutral);
    app.repo.commit_classification(ticket.id, labels).await.unwrap();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/process-ticket",
        Some(json!({ "ticket_id": ticket.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Ticket was already processed" }));
    assert_eq!(app.backend.call_count(), 0);
    assert_eq!(
        app.repo.fetch(ticket.id).await.unwrap().classification(),
        Some(labels)
    );
}

#[tokio::test]
async fn test_health_healthy() {
    let app = test_app(ScriptedBackend::new());
    let (status, body) = send(&app.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["store_connected"], true);
    assert_eq!(body["model_configured"], true);
    assert_eq!(body["model_reachable"], true);
}

#[tokio::test]
async fn test_health_degraded_when_model_unreachable() {
    let app = test_app(ScriptedBackend::new().with_health(false));
    let (_, body) = send(&app.router, Method::GET, "/health", None).await;

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_configured"], true);
    assert_eq!(body["model_reachable"], false);
}

#[tokio::test]
async fn test_health_degraded_without_model() {
    let repo = MemoryTicketRepository::new();
    let classifier = TicketClassifier::heuristic_only(Arc::new(HeuristicClassifier::default()));
    let state = AppState::new(Arc::new(repo), classifier, StoreKind::Memory);
    let router = app(state, &["*".to_string()]);

    let (_, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_configured"], false);
    assert_eq!(body["model_reachable"], false);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = test_app(ScriptedBackend::new());
    let (status, _) = send(&app.router, Method::GET, "/create_ticket", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
