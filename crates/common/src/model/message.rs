//! # Messages
//!
//! Chat messages between the two members of a couple. A message is visible
//! to both ends of the conversation; the only state change it ever goes
//! through is being marked read by its receiver.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: String,
    pub read: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Text of a message about to be sent. The receiver is not part of it: it is
/// always the sender's partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub message: String,
}

impl MessageDraft {
    /// Rejects messages that are empty once surrounding whitespace is gone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_is_rejected() {
        let draft = MessageDraft {
            message: "  \n\t".to_string(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::EmptyMessage));

        let draft = MessageDraft {
            message: "good morning".to_string(),
        };
        assert!(draft.validate().is_ok());
    }
}
