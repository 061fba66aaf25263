use clap::Args;

use tandem::http_server::api::client::ApiError;
use tandem::http_server::api::entries::ListEntriesRequest;

/// List the entries visible to the holder of a token.
#[derive(Args, Debug, Clone)]
pub struct Entries {
    /// Session token, as printed by `tandem login`
    #[arg(long)]
    pub token: String,

    #[command(flatten)]
    pub request: ListEntriesRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum EntriesError {
    #[error("listing entries failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Entries {
    type Error = EntriesError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.client.clone().with_token(self.token.clone());
        let response = client.call(self.request.clone()).await?;

        if response.entries.is_empty() {
            return Ok("no entries".to_string());
        }

        let lines = response
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "{}  {:<8} {:<12} {}",
                    entry.created_at.date(),
                    entry.kind.as_str(),
                    entry.visibility.as_str(),
                    entry.title.as_deref().unwrap_or("(untitled)")
                )
            })
            .collect::<Vec<_>>();
        Ok(lines.join("\n"))
    }
}
