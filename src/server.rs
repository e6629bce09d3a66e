use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::admin::{grid, record, related};
use crate::middleware::auth::bearer_auth_middleware;

/// Build the full application router. Route-to-grant-level mapping lives
/// in the handlers: grid/list/get/options require VIEW, create ADD,
/// update EDIT, delete and bulk-delete DELETE.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Admin CRUD surface, bearer-authenticated
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn admin_routes() -> Router {
    Router::new()
        .route(
            "/api/v1.0/admin/:resource/grid",
            get(grid::grid_get).options(grid::grid_options),
        )
        .route(
            "/api/v1.0/admin/:resource/related/info",
            post(related::related_info),
        )
        .route(
            "/api/v1.0/admin/:resource/:id",
            get(record::record_get)
                .put(record::record_put)
                .delete(record::record_delete),
        )
        .route(
            "/api/v1.0/admin/:resource",
            get(record::list_get)
                .post(record::record_post)
                .delete(record::bulk_delete),
        )
        .layer(axum::middleware::from_fn(bearer_auth_middleware))
}

/// Bind and serve until shutdown.
pub async fn run() {
    let app = app();

    let port = std::env::var("CAREHOME_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("carehome-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "data": {
            "name": "Carehome Admin API",
            "version": version,
            "description": "Multi-tenant senior-care facility administration backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "grid": "/api/v1.0/admin/:resource/grid (bearer)",
                "list": "/api/v1.0/admin/:resource (bearer)",
                "record": "/api/v1.0/admin/:resource/:id (bearer)",
                "related": "/api/v1.0/admin/:resource/related/info (bearer)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "code": crate::error::codes::PERSISTENCE,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
