use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::observability;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod audit_logs;
pub mod dashboard;
pub mod documents;
pub mod equipment;
pub mod maintenance;
pub mod notifications;
pub mod users;
pub mod work_orders;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition of the default registry.
pub async fn metrics() -> Result<impl IntoResponse, JsonApiError> {
    let body = observability::encode_metrics()
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Metrics Error", Some(e.to_string())))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/api/users/:id/password", post(users::change_password))
        .route("/api/equipment", get(equipment::list).post(equipment::create))
        .route("/api/equipment/:id", get(equipment::get).put(equipment::update).delete(equipment::delete))
        .route("/api/equipment/:id/work-orders", get(equipment::work_orders))
        .route("/api/equipment/:id/report", get(equipment::report))
        .route("/api/work-orders", get(work_orders::list).post(work_orders::create))
        .route("/api/work-orders/:id", get(work_orders::get).put(work_orders::update).delete(work_orders::delete))
        .route("/api/work-orders/:id/assign", post(work_orders::assign))
        .route("/api/work-orders/:id/status", post(work_orders::change_status))
        .route("/api/maintenance-plans", get(maintenance::list).post(maintenance::create))
        .route("/api/maintenance-plans/:id", get(maintenance::get).put(maintenance::update).delete(maintenance::delete))
        .route("/api/maintenance-plans/:id/suggestion", get(maintenance::suggestion))
        .route("/api/maintenance/run", post(maintenance::run))
        .route("/api/documents", get(documents::list).post(documents::create))
        .route("/api/documents/:id", get(documents::get).delete(documents::delete))
        .route("/api/notifications", get(notifications::list).post(notifications::create))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::read_all))
        .route("/api/notifications/:id", axum::routing::delete(notifications::delete))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route("/api/audit-logs", get(audit_logs::list))
        .route("/api/dashboard", get(dashboard::summary))
}

/// Build the full application router: REST API, health, metrics and Swagger UI.
pub fn build_router(state: ServerState) -> Router {
    observability::init_metrics();

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    // one INFO span per request carrying method and path
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_request(
                        DefaultOnRequest::new()
                            .level(Level::INFO),
                    )
                    // status code and latency
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    // 5xx at ERROR
                    .on_failure(
                        DefaultOnFailure::new()
                            .level(Level::ERROR),
                    ),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use models::db::DatabaseConfig;
    use tower::ServiceExt;

    async fn router() -> Router {
        let db = crate::startup::prepare_database(&DatabaseConfig::in_memory()).await.unwrap();
        build_router(ServerState { db })
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let res = router()
            .await
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn unknown_work_order_is_404_json() {
        let uri = format!("/api/work-orders/{}", uuid::Uuid::new_v4());
        let res = router()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(v["error"].is_string());
    }

    #[tokio::test]
    async fn list_endpoints_return_pages() {
        let res = router()
            .await
            .oneshot(Request::builder().uri("/api/equipment?per_page=500").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["total"], 0);
        assert_eq!(v["per_page"], 100);
    }
}
