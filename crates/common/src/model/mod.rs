mod couple;
mod entry;
mod message;
mod user;

pub use couple::{Couple, CoupleError};
pub use entry::{Entry, EntryDraft, EntryEdit, EntryKind, Visibility, MAX_TITLE_LEN};
pub use message::{Message, MessageDraft};
pub use user::{UserId, UserSummary, MAX_EMAIL_LEN, MAX_NAME_LEN};

use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Input that is well-formed JSON but not acceptable content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown entry type: {0}")]
    UnknownKind(String),
    #[error("unknown visibility: {0}")]
    UnknownVisibility(String),
    #[error("title must be at most {0} characters")]
    TitleTooLong(usize),
    #[error("invalid entry date: {0}")]
    EntryDate(String),
    #[error("message must not be empty")]
    EmptyMessage,
}

/// Parse an entry date as either an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date (taken as midnight UTC).
pub fn parse_entry_date(raw: &str) -> Result<OffsetDateTime, ValidationError> {
    let raw = raw.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339) {
        return Ok(timestamp);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| ValidationError::EntryDate(raw.to_string()))
}

/// Serde adapter for optional, client-supplied entry dates.
pub(crate) mod entry_date {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time::serde::rfc3339::option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_entry_date(&raw)
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}
