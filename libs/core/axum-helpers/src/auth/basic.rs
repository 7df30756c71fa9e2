use super::config::BasicAuthConfig;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use std::sync::Arc;

/// Decides whether a username/password pair may use the API.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Verifier shared as middleware state
pub type SharedVerifier = Arc<dyn CredentialVerifier>;

/// A single fixed credential pair, `admin`/`admin` unless configured.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    config: BasicAuthConfig,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            config: BasicAuthConfig::new(username, password),
        }
    }
}

impl From<BasicAuthConfig> for StaticCredentials {
    fn from(config: BasicAuthConfig) -> Self {
        Self { config }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.config.username && password == self.config.password
    }
}

/// HTTP Basic authentication middleware
///
/// Rejects the request with 401 and a `WWW-Authenticate` challenge unless
/// the `Authorization: Basic` header carries credentials the verifier accepts.
///
/// # Example
///
/// ```ignore
/// let verifier: SharedVerifier = Arc::new(StaticCredentials::default());
///
/// let protected_routes = Router::new()
///     .route("/read", get(read_handler))
///     .layer(axum::middleware::from_fn_with_state(verifier, basic_auth_middleware));
/// ```
pub async fn basic_auth_middleware(
    State(verifier): State<SharedVerifier>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().typed_get::<Authorization<Basic>>() {
        Some(credentials) if verifier.verify(credentials.username(), credentials.password()) => {
            next.run(request).await
        }
        Some(credentials) => {
            tracing::debug!(username = credentials.username(), "Rejected basic credentials");
            unauthorized()
        }
        None => {
            tracing::debug!("No basic credentials provided");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    let mut response = AppError::Unauthorized("unauthorized".to_string()).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"reguser\""),
    );
    response
}
