//! Readiness handler with a real lookup against the user store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{CheckFailure, HealthCheckFuture, run_health_checks};
use std::time::Duration;
use uuid::Uuid;

/// How long the store lookup may wait for the lock.
///
/// A search holds the lock while its consumer is slow, for up to the
/// configured send timeout.
pub const STORE_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

/// Ready while the process is not shutting down and the store answers a lookup.
///
/// The lookup reads the nil id: `NotFound` proves the lock can be taken and
/// the map consulted without touching any real user. A lookup that cannot
/// get the lock within [`STORE_CHECK_TIMEOUT`] reports the store as degraded.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let cancel = state.shutdown.child_token();

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "user_store",
            Box::pin(async {
                let lookup = state.repository.read(&cancel, Uuid::nil());
                match tokio::time::timeout(STORE_CHECK_TIMEOUT, lookup).await {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err(e)) if e.is_not_found() => Ok(()),
                    Ok(Err(e)) => Err(CheckFailure::Down(format!("User store lookup failed: {}", e))),
                    Err(_) => Err(CheckFailure::Degraded(format!(
                        "User store lock busy for more than {:?}",
                        STORE_CHECK_TIMEOUT
                    ))),
                }
            }),
        ),
        (
            "shutdown",
            Box::pin(async {
                if state.shutdown.is_shutting_down() {
                    Err(CheckFailure::Down("shutdown in progress".to_string()))
                } else {
                    Ok(())
                }
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
