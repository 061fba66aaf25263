use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use time::OffsetDateTime;

const NANOS_PER_MICRO: i128 = 1_000;

/// UTC timestamp stored as INTEGER microseconds since the Unix epoch.
///
/// Integers sort the same way the instants do, so `ORDER BY` on these
/// columns is chronological down to the microsecond. An i64 of microseconds
/// spans every year `time` can represent, so any parsed date can be stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DTime(OffsetDateTime);

impl DTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }
}

impl From<OffsetDateTime> for DTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl From<DTime> for OffsetDateTime {
    fn from(val: DTime) -> Self {
        val.0
    }
}

impl std::ops::Deref for DTime {
    type Target = OffsetDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Decode<'_, Sqlite> for DTime {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let micros = <i64 as Decode<Sqlite>>::decode(value)?;
        let timestamp =
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * NANOS_PER_MICRO)?;
        Ok(Self(timestamp))
    }
}

impl Encode<'_, Sqlite> for DTime {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        let micros = i64::try_from(self.0.unix_timestamp_nanos().div_euclid(NANOS_PER_MICRO))?;
        args.push(SqliteArgumentValue::Int64(micros));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DTime {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::daemon::database::test_support::memory_db;

    #[tokio::test]
    async fn test_dates_far_from_now_survive_storage() {
        let db = memory_db().await;

        for instant in [
            datetime!(0001-01-01 00:00:00 UTC),
            datetime!(1600-01-01 00:00:00 UTC),
            datetime!(2024-02-14 18:30:00.123456 UTC),
            datetime!(3000-01-01 00:00:00 UTC),
            datetime!(9999-12-31 23:59:59.999999 UTC),
        ] {
            let (stored,): (DTime,) = sqlx::query_as("SELECT ?1")
                .bind(DTime::from(instant))
                .fetch_one(&*db)
                .await
                .unwrap();
            assert_eq!(*stored, instant);
        }
    }

    #[tokio::test]
    async fn test_sub_microsecond_precision_is_truncated() {
        let db = memory_db().await;
        let instant = datetime!(1969-12-31 23:59:59.999999999 UTC);

        let (stored,): (DTime,) = sqlx::query_as("SELECT ?1")
            .bind(DTime::from(instant))
            .fetch_one(&*db)
            .await
            .unwrap();
        assert_eq!(*stored, datetime!(1969-12-31 23:59:59.999999 UTC));
    }
}
