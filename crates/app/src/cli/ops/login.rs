use clap::Args;

use tandem::http_server::api::client::ApiError;
use tandem::http_server::api::session::LoginRequest;

/// Print a session token for use with other commands.
#[derive(Args, Debug, Clone)]
pub struct Login {
    #[command(flatten)]
    pub request: LoginRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("login failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (_, response) = ctx
            .client
            .login(&self.request.email, &self.request.password)
            .await?;
        Ok(response.token)
    }
}
