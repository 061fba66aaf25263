use std::net::SocketAddr;

use clap::Args;

use tandem::state::{AppState, StateError};
use tandem::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override API server port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("server failed: {0}")]
    Failed(#[from] tandem::daemon::ServiceError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let mut config = ServiceConfig::from_app_state(&state);
        if let Some(port) = self.port {
            config.listen_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }
        config.log_dir = self.log_dir.clone();

        spawn_service(&config).await?;
        Ok("server stopped".to_string())
    }
}
