use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Why a health check did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// The dependency cannot serve; the service is not ready
    Down(String),
    /// The dependency is slow or busy but still serves requests
    Degraded(String),
}

impl From<String> for CheckFailure {
    fn from(reason: String) -> Self {
        CheckFailure::Down(reason)
    }
}

/// A boxed future for a single named health check
pub type HealthCheckFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), CheckFailure>> + Send + 'a>>;

/// Runs multiple health checks concurrently and returns aggregated results.
///
/// Each named check reports `"up"`, `"degraded"` or `"down"`. A single down
/// check makes the whole body `"not ready"` with 503. Degraded checks keep
/// 200 but report `"status": "degraded"`.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![(
///     "user_store",
///     Box::pin(async { read_sentinel(&store).await.map_err(|e| e.to_string().into()) }),
/// )];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let (names, futures): (Vec<_>, Vec<_>) = checks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut any_down = false;
    let mut any_degraded = false;

    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => "up",
            Err(CheckFailure::Degraded(reason)) => {
                tracing::warn!(check = name, "Readiness check degraded: {}", reason);
                any_degraded = true;
                "degraded"
            }
            Err(CheckFailure::Down(reason)) => {
                tracing::error!(check = name, "Readiness check failed: {}", reason);
                any_down = true;
                "down"
            }
        };
        body.insert(name.to_string(), json!(status));
    }

    let overall = match (any_down, any_degraded) {
        (true, _) => "not ready",
        (false, true) => "degraded",
        (false, false) => "ready",
    };
    body.insert("status".to_string(), json!(overall));

    if any_down {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    } else {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    }
}

/// Liveness handler: 200 with the app name and version while the process runs.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Creates a router with the /health endpoint.
///
/// # Example
/// ```ignore
/// use axum_helpers::health_router;
/// use core_config::app_info;
///
/// let app = Router::new()
///     .merge(health_router(app_info!()))
///     .merge(api_routes);
/// ```
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}
