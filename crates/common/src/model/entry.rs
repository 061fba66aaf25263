//! # Entries
//!
//! An entry is one piece of content written by one user: a journal page, a
//! note, a shared moment, a gallery photo or an "on my mind" thought.
//!
//! Both [`EntryKind`] and [`Visibility`] are closed vocabularies. Unknown
//! values fail deserialization, so nothing outside them is ever persisted.
//!
//! The client pairs `moment` with `couple` and `mind` with `for_partner`, but
//! that pairing is a UI convention only: any kind may carry any visibility.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{UserId, ValidationError};

/// Maximum length of an entry title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// What sort of content an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Journal,
    Note,
    Moment,
    Gallery,
    Mind,
}

impl EntryKind {
    pub const ALL: [EntryKind; 5] = [
        EntryKind::Journal,
        EntryKind::Note,
        EntryKind::Moment,
        EntryKind::Gallery,
        EntryKind::Mind,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Journal => "journal",
            EntryKind::Note => "note",
            EntryKind::Moment => "moment",
            EntryKind::Gallery => "gallery",
            EntryKind::Mind => "mind",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an entry is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Private to the author.
    OnlyMe,
    /// Addressed to the author's partner.
    ForPartner,
    /// Shared by the couple; shows up in the joint feed.
    Couple,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::OnlyMe, Visibility::ForPartner, Visibility::Couple];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::OnlyMe => "only_me",
            Visibility::ForPartner => "for_partner",
            Visibility::Couple => "couple",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Visibility::ALL
            .into_iter()
            .find(|visibility| visibility.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVisibility(s.to_string()))
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored entry, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub author_id: UserId,
    pub visibility: Visibility,
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub photos: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub entry_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields a client supplies when creating an entry.
///
/// There is deliberately no author field: the author is always the
/// authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub visibility: Visibility,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    /// Defaults to the creation time when absent.
    #[serde(default, with = "super::entry_date")]
    pub entry_date: Option<OffsetDateTime>,
}

impl EntryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(self.title.as_deref())
    }
}

/// Replacement for every editable field of an entry.
///
/// Edits are wholesale: a field left out of the request is cleared, not
/// kept. Kind, author and entry date are never editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryEdit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub visibility: Visibility,
}

impl EntryEdit {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(self.title.as_deref())
    }
}

fn validate_title(title: Option<&str>) -> Result<(), ValidationError> {
    match title {
        Some(title) if title.chars().count() > MAX_TITLE_LEN => {
            Err(ValidationError::TitleTooLong(MAX_TITLE_LEN))
        }
        _ => Ok(()),
    }
}
