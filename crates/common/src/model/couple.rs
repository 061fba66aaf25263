//! # Couples
//!
//! A [`Couple`] pairs exactly two distinct users. "The partner" of a user is
//! always resolved through the couple they belong to, never by scanning the
//! user table for "somebody else".

use serde::{Deserialize, Serialize};

use super::UserId;

/// An explicit pairing of two distinct users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Couple {
    members: [UserId; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoupleError {
    #[error("a couple needs two distinct members, got {0} twice")]
    SameMember(UserId),
}

impl Couple {
    pub fn new(first: UserId, second: UserId) -> Result<Self, CoupleError> {
        if first == second {
            return Err(CoupleError::SameMember(first));
        }
        Ok(Self {
            members: [first, second],
        })
    }

    pub fn members(&self) -> &[UserId; 2] {
        &self.members
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// The other member of the couple, or `None` if `user` is not a member.
    pub fn partner_of(&self, user: &UserId) -> Option<UserId> {
        match self.members {
            [a, b] if a == *user => Some(b),
            [a, b] if b == *user => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_is_the_other_member() {
        let a = UserId::generate();
        let b = UserId::generate();
        let couple = Couple::new(a, b).unwrap();

        assert_eq!(couple.partner_of(&a), Some(b));
        assert_eq!(couple.partner_of(&b), Some(a));
        assert_eq!(couple.partner_of(&UserId::generate()), None);
    }

    #[test]
    fn test_rejects_single_member_couple() {
        let a = UserId::generate();
        assert_eq!(Couple::new(a, a), Err(CoupleError::SameMember(a)));
    }
}
