//! Authentication module.
//!
//! This module provides:
//! - A pluggable [`CredentialVerifier`] with a static-credentials default
//! - HTTP Basic authentication middleware for protected routes
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum_helpers::auth::{BasicAuthConfig, StaticCredentials, basic_auth_middleware};
//! use core_config::FromEnv;
//!
//! let verifier = Arc::new(StaticCredentials::from(BasicAuthConfig::from_env()?));
//!
//! let protected = Router::new()
//!     .route("/create", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(verifier, basic_auth_middleware));
//! ```

pub mod basic;
pub mod config;

// Re-export commonly used types
pub use basic::{CredentialVerifier, SharedVerifier, StaticCredentials, basic_auth_middleware};
pub use config::BasicAuthConfig;
