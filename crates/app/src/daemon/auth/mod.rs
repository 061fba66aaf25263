//! Session identity: password hashes at rest and signed bearer tokens on
//! the wire.

mod password;
mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenIssuer};
