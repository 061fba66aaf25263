use clap::Args;

use tandem::state::{AppConfig, AppState, Environment, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Run in production mode (masked 500s, CORS limited to --frontend-url)
    #[arg(long)]
    pub production: bool,

    /// Origin of the web client, allowed by CORS in production
    #[arg(long)]
    pub frontend_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::generate();
        config.port = self.port;
        config.frontend_url = self.frontend_url.clone();
        if self.production {
            config.environment = Environment::Production;
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized tandem directory at: {}\n\
             - Database: {}\n\
             - Uploads: {}\n\
             - Config: {}\n\
             - Port: {}\n\
             - Environment: {}",
            state.data_dir.display(),
            state.db_path.display(),
            state.uploads_path.display(),
            state.config_path.display(),
            state.config.port,
            state.config.environment.as_str(),
        );

        Ok(output)
    }
}
