use clap::Args;
use url::Url;

use tandem::daemon::database::{Database, DatabaseSetupError};
use tandem::daemon::seed::{seed_couple, NewUser, SeedError};
use tandem::state::{AppState, StateError};

/// Create the two accounts and pair them. Safe to run repeatedly.
#[derive(Args, Debug, Clone)]
pub struct Seed {
    #[arg(long, default_value = "Ayush")]
    pub first_name: String,
    #[arg(long, default_value = "ayush@couple.app")]
    pub first_email: String,
    #[arg(long, default_value = "Neha")]
    pub second_name: String,
    #[arg(long, default_value = "neha@couple.app")]
    pub second_email: String,
    /// Password given to newly created accounts
    #[arg(long, default_value = "password123")]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedOpError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("invalid database path: {0}")]
    DatabaseUrl(#[from] url::ParseError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseSetupError),
    #[error("seed failed: {0}")]
    Seed(#[from] SeedError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Seed {
    type Error = SeedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let url = Url::parse(&format!("sqlite://{}", state.db_path.display()))?;
        let database = Database::connect(&url).await?;

        let first = NewUser {
            name: self.first_name.clone(),
            email: self.first_email.clone(),
            password: self.password.clone(),
        };
        let second = NewUser {
            name: self.second_name.clone(),
            email: self.second_email.clone(),
            password: self.password.clone(),
        };

        let report = seed_couple(&database, &first, &second).await?;
        Ok(report.to_string())
    }
}
