use common::prelude::{Couple, UserId};
use sqlx::FromRow;

use crate::daemon::database::types::{DTime, DUuid};
use crate::daemon::database::Database;

#[derive(Debug, FromRow)]
struct CoupleRow {
    member_a: DUuid,
    member_b: DUuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CoupleSetupError {
    #[error("user {0} already belongs to a couple")]
    AlreadyPaired(UserId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Database {
    /// Persist a couple. Each user can be in at most one.
    pub async fn create_couple(&self, couple: &Couple) -> Result<(), CoupleSetupError> {
        let mut tx = self.begin().await?;

        for member in couple.members() {
            let existing: Option<(DUuid,)> = sqlx::query_as(
                "SELECT id FROM couples WHERE member_a = ?1 OR member_b = ?1",
            )
            .bind(DUuid::from(*member))
            .fetch_optional(&mut *tx)
            .await?;

            if existing.is_some() {
                return Err(CoupleSetupError::AlreadyPaired(*member));
            }
        }

        let [a, b] = *couple.members();
        sqlx::query(
            r#"
            INSERT INTO couples (id, member_a, member_b, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(DUuid::new())
        .bind(DUuid::from(a))
        .bind(DUuid::from(b))
        .bind(DTime::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// The couple `user` belongs to, if any.
    pub async fn couple_of(&self, user: &UserId) -> Result<Option<Couple>, sqlx::Error> {
        let row = sqlx::query_as::<_, CoupleRow>(
            r#"
            SELECT member_a, member_b
            FROM couples
            WHERE member_a = ?1 OR member_b = ?1
            "#,
        )
        .bind(DUuid::from(*user))
        .fetch_optional(&**self)
        .await?;

        row.map(|row| Couple::new(row.member_a.into(), row.member_b.into()))
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    /// The other member of `user`'s couple.
    pub async fn partner_of(&self, user: &UserId) -> Result<Option<UserId>, sqlx::Error> {
        Ok(self
            .couple_of(user)
            .await?
            .and_then(|couple| couple.partner_of(user)))
    }
}
