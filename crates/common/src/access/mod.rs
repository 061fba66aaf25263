//! # Access control
//!
//! Two independent rules decide what a requester may do with entries:
//!
//! - **Reads** go through an [`EntryFilter`], built from the requester, their
//!   partner, a [`Mode`] and an optional kind.
//! - **Writes** (edit, delete) go through [`ensure_author`]: only the author
//!   of an entry may change it. Creation needs no check; the author is
//!   always the requester.

mod filter;
mod mode;

pub use filter::{EntryFilter, Scope};
pub use mode::Mode;

use crate::model::{Entry, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Entry not found")]
    NotFound,
    #[error("You can only modify your own content")]
    Forbidden,
    #[error("Partner not found")]
    NoPartner,
}

/// Authorize a mutation of `entry` by `requester`.
///
/// A missing entry is reported before ownership is checked.
pub fn ensure_author(requester: &UserId, entry: Option<Entry>) -> Result<Entry, AccessError> {
    let entry = entry.ok_or(AccessError::NotFound)?;
    if entry.author_id != *requester {
        return Err(AccessError::Forbidden);
    }
    Ok(entry)
}
