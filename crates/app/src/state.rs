use std::{fs, path::PathBuf};

use rand::distributions::{Alphanumeric, DistString};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "tandem";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const UPLOADS_DIR_NAME: &str = "uploads";

const JWT_SECRET_LEN: usize = 48;

/// Deployment flavour. Production hides internal error messages from clients
/// and narrows CORS to the configured frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    /// HMAC secret used to sign session tokens
    pub jwt_secret: String,
    /// How long an issued token stays valid
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u32,
    /// Origin allowed by CORS in production (any origin if unset)
    #[serde(default)]
    pub frontend_url: Option<String>,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_port() -> u16 {
    3000
}

fn default_token_ttl_days() -> u32 {
    7
}

impl AppConfig {
    /// A fresh configuration with a random signing secret.
    pub fn generate() -> Self {
        Self {
            port: default_port(),
            environment: Environment::default(),
            jwt_secret: Alphanumeric.sample_string(&mut rand::thread_rng(), JWT_SECRET_LEN),
            token_ttl_days: default_token_ttl_days(),
            frontend_url: None,
            storage: StorageConfig::default(),
        }
    }
}

/// Where uploaded photos go.
///
/// Photos are pushed to S3-compatible storage when `s3` carries complete
/// credentials, and written under `uploads_dir` otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local upload directory (defaults to <data dir>/uploads)
    #[serde(default)]
    pub uploads_dir: Option<PathBuf>,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Optional region (defaults to "us-east-1")
    #[serde(default)]
    pub region: Option<String>,
    /// Public base URL photos are served from (defaults to <endpoint>/<bucket>)
    #[serde(default)]
    pub public_url: Option<String>,
}

impl S3Config {
    pub fn has_credentials(&self) -> bool {
        [&self.endpoint, &self.access_key, &self.secret_key, &self.bucket]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the tandem directory (~/.tandem)
    pub data_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the local uploads directory
    pub uploads_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the data directory path (custom or default ~/.tandem)
    pub fn data_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new data directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let data_dir = Self::data_dir(custom_path)?;

        if data_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&data_dir)?;

        let config = config.unwrap_or_else(AppConfig::generate);
        let uploads_path = Self::uploads_path_for(&data_dir, &config);
        fs::create_dir_all(&uploads_path)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Empty database file; the schema is applied when the server connects
        let db_path = data_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            data_dir,
            db_path,
            uploads_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the data directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let data_dir = Self::data_dir(custom_path)?;

        if !data_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = data_dir.join(DB_FILE_NAME);
        let config_path = data_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        if config.jwt_secret.trim().is_empty() {
            return Err(StateError::MissingJwtSecret);
        }

        let uploads_path = Self::uploads_path_for(&data_dir, &config);

        Ok(Self {
            data_dir,
            db_path,
            uploads_path,
            config_path,
            config,
        })
    }

    fn uploads_path_for(data_dir: &std::path::Path, config: &AppConfig) -> PathBuf {
        match &config.storage.uploads_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => data_dir.join(dir),
            None => data_dir.join(UPLOADS_DIR_NAME),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("tandem directory not initialized. Run 'tandem init' first")]
    NotInitialized,

    #[error("tandem directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("config.toml has an empty jwt_secret")]
    MissingJwtSecret,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
