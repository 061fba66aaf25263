use url::Url;

use super::auth::TokenIssuer;
use super::config::Config;
use super::storage::{PhotoStore, PhotoStoreError};
use crate::daemon::database::{Database, DatabaseSetupError};
use crate::state::Environment;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    photos: PhotoStore,
    tokens: TokenIssuer,
    environment: Environment,
    frontend_url: Option<String>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup photo storage
        let photos = PhotoStore::new(config.photo_store.clone()).await?;

        // 3. Setup token issuer
        if config.jwt_secret.trim().is_empty() {
            return Err(StateSetupError::MissingJwtSecret);
        }
        let tokens = TokenIssuer::new(
            &config.jwt_secret,
            time::Duration::days(i64::from(config.token_ttl_days)),
        );

        Ok(Self {
            database,
            photos,
            tokens,
            environment: config.environment,
            frontend_url: config.frontend_url.clone(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn frontend_url(&self) -> Option<&str> {
        self.frontend_url.as_deref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Photo store error: {0}")]
    PhotoStore(#[from] PhotoStoreError),
    #[error("jwt_secret must not be empty")]
    MissingJwtSecret,
}
