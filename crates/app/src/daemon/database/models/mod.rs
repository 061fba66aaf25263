mod couple;
mod entry;
mod message;
mod user;

pub use couple::CoupleSetupError;
pub use entry::EntryWriteError;
pub use user::UserRecord;
