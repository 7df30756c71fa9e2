use axum_helpers::BasicAuthConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_users::SearchConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub search: SearchConfig,
    pub auth: BasicAuthConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8000 unless set
        let search = SearchConfig::from_env()?;
        let auth = BasicAuthConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            search,
            auth,
        })
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
            search: SearchConfig::default(),
            auth: BasicAuthConfig::default(),
        }
    }
}
