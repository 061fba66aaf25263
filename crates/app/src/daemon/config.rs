use std::net::SocketAddr;
use std::path::PathBuf;

use crate::daemon::storage::PhotoStoreConfig;
use crate::state::{AppState, Environment};

#[derive(Debug, Clone)]
pub struct Config {
    /// address for the API server to listen on
    pub listen_addr: SocketAddr,
    pub environment: Environment,

    // session configuration
    pub jwt_secret: String,
    pub token_ttl_days: u32,

    /// origin allowed by CORS in production, any if unset
    pub frontend_url: Option<String>,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    pub photo_store: PhotoStoreConfig,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Service configuration for an initialized data directory.
    pub fn from_app_state(state: &AppState) -> Self {
        let config = &state.config;
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], config.port)),
            environment: config.environment,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_days: config.token_ttl_days,
            frontend_url: config.frontend_url.clone(),
            sqlite_path: Some(state.db_path.clone()),
            photo_store: PhotoStoreConfig::select(&config.storage, &state.uploads_path),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }

    /// Fully in-memory configuration, used by tests.
    pub fn ephemeral(jwt_secret: &str) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            environment: Environment::Development,
            jwt_secret: jwt_secret.to_string(),
            token_ttl_days: 7,
            frontend_url: None,
            sqlite_path: None,
            photo_store: PhotoStoreConfig::Memory,
            log_level: tracing::Level::DEBUG,
            log_dir: None,
        }
    }
}
