//! Server infrastructure: router assembly, health endpoint and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let router = create_router::<ApiDoc>(api_routes, &config)
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &config, coordinator, async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{CheckFailure, HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
