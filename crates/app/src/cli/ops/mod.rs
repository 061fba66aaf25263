pub mod entries;
pub mod health;
pub mod init;
pub mod login;
pub mod seed;
pub mod serve;

pub use entries::Entries;
pub use health::Health;
pub use init::Init;
pub use login::Login;
pub use seed::Seed;
pub use serve::Serve;
