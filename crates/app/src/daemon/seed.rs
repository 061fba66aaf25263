//! Provisioning of the two accounts a deployment serves.

use common::prelude::{Couple, CoupleError, UserSummary, MAX_EMAIL_LEN, MAX_NAME_LEN};

use super::auth::{hash_password, PasswordError};
use super::database::{CoupleSetupError, Database};

/// One account to provision.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SeedReport {
    pub first: UserSummary,
    pub second: UserSummary,
    /// Accounts that were created, as opposed to found already present
    pub created_users: usize,
    pub created_couple: bool,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} <{}> ({})", self.first.name, self.first.email, self.first.id)?;
        writeln!(f, "{} <{}> ({})", self.second.name, self.second.email, self.second.id)?;
        write!(
            f,
            "{} user(s) created, couple {}",
            self.created_users,
            if self.created_couple {
                "created"
            } else {
                "already present"
            }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid user: {0}")]
    InvalidUser(String),
    #[error(transparent)]
    Couple(#[from] CoupleError),
    #[error(transparent)]
    CoupleSetup(#[from] CoupleSetupError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Make sure both users exist and form a couple.
///
/// Users already present (by email) are reused with their existing
/// password, so running this twice changes nothing.
pub async fn seed_couple(
    database: &Database,
    first: &NewUser,
    second: &NewUser,
) -> Result<SeedReport, SeedError> {
    let mut created_users = 0;
    let first = ensure_user(database, first, &mut created_users).await?;
    let second = ensure_user(database, second, &mut created_users).await?;

    let couple = Couple::new(first.id, second.id)?;
    let created_couple = match database.couple_of(&first.id).await? {
        Some(existing) if existing.contains(&second.id) => false,
        Some(_) => return Err(CoupleSetupError::AlreadyPaired(first.id).into()),
        None => {
            database.create_couple(&couple).await?;
            true
        }
    };

    Ok(SeedReport {
        first,
        second,
        created_users,
        created_couple,
    })
}

async fn ensure_user(
    database: &Database,
    user: &NewUser,
    created_users: &mut usize,
) -> Result<UserSummary, SeedError> {
    validate(user)?;
    if let Some(existing) = database.user_by_email(&user.email).await? {
        tracing::info!(email = %user.email, "user already exists");
        return Ok(existing.summary());
    }

    let hash = hash_password(&user.password)?;
    let record = database.create_user(&user.name, &user.email, &hash).await?;
    tracing::info!(email = %user.email, id = %record.id, "created user");
    *created_users += 1;
    Ok(record.summary())
}

fn validate(user: &NewUser) -> Result<(), SeedError> {
    if user.name.trim().is_empty() || user.name.chars().count() > MAX_NAME_LEN {
        return Err(SeedError::InvalidUser(format!(
            "name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    if !user.email.contains('@') || user.email.chars().count() > MAX_EMAIL_LEN {
        return Err(SeedError::InvalidUser(format!(
            "email must look like an address and be at most {} characters",
            MAX_EMAIL_LEN
        )));
    }
    if user.password.is_empty() {
        return Err(SeedError::InvalidUser("password must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::auth::verify_password;
    use crate::daemon::database::test_support::memory_db;

    fn user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = memory_db().await;
        let a = user("Ayush", "ayush@couple.app");
        let b = user("Neha", "neha@couple.app");

        let first_run = seed_couple(&db, &a, &b).await.unwrap();
        assert_eq!(first_run.created_users, 2);
        assert!(first_run.created_couple);

        let second_run = seed_couple(&db, &a, &b).await.unwrap();
        assert_eq!(second_run.created_users, 0);
        assert!(!second_run.created_couple);
        assert_eq!(second_run.first.id, first_run.first.id);

        assert_eq!(
            db.partner_of(&first_run.first.id).await.unwrap(),
            Some(first_run.second.id)
        );

        let stored = db.user_by_email("neha@couple.app").await.unwrap().unwrap();
        assert!(verify_password("password123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_seed_rejects_a_user_paired_elsewhere() {
        let db = memory_db().await;
        let a = user("A", "a@couple.app");
        let b = user("B", "b@couple.app");
        let c = user("C", "c@couple.app");

        seed_couple(&db, &a, &b).await.unwrap();
        assert!(matches!(
            seed_couple(&db, &a, &c).await,
            Err(SeedError::CoupleSetup(CoupleSetupError::AlreadyPaired(_)))
        ));
    }

    #[tokio::test]
    async fn test_seed_validates_users() {
        let db = memory_db().await;
        assert!(matches!(
            seed_couple(&db, &user("", "a@couple.app"), &user("B", "b@couple.app")).await,
            Err(SeedError::InvalidUser(_))
        ));
        assert!(matches!(
            seed_couple(&db, &user("A", "not-an-email"), &user("B", "b@couple.app")).await,
            Err(SeedError::InvalidUser(_))
        ));
        assert!(matches!(
            seed_couple(&db, &user("A", "a@couple.app"), &user("A", "a@couple.app")).await,
            Err(SeedError::Couple(CoupleError::SameMember(_)))
        ));
    }
}
