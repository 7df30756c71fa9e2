//! Shared application state.

use axum_helpers::ShutdownCoordinator;
use domain_users::{InMemoryUserStore, UserRepository};

use crate::config::Config;

/// State handed to routers; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repository: UserRepository<InMemoryUserStore>,
    /// Owns the root cancellation token for in-flight requests
    pub shutdown: ShutdownCoordinator,
}

impl AppState {
    /// Wire store and repository from configuration.
    pub fn new(config: Config, shutdown: ShutdownCoordinator) -> Self {
        let store = InMemoryUserStore::with_config(config.search.clone());
        let repository = UserRepository::new(store);

        Self {
            config,
            repository,
            shutdown,
        }
    }
}
