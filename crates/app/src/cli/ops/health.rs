use clap::Args;

use tandem::http_server::api::client::ApiError;
use tandem::http_server::HealthRequest;

#[derive(Args, Debug, Clone)]
pub struct Health {}

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("health check failed: {0}")]
    Failed(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let health = ctx.client.call(HealthRequest).await?;

        Ok(format!(
            "Server ({}):\n  status:      {}\n  environment: {}\n  version:     {}\n  time:        {}",
            ctx.client.base_url(),
            health.status,
            health.environment,
            health.version,
            health.timestamp,
        ))
    }
}
