pub mod auth;
mod config;
pub mod database;
pub mod http_server;
pub mod process;
pub mod seed;
mod state;
pub mod storage;

pub use config::Config as ServiceConfig;
pub use process::{spawn_service, start_service, ServiceError, ShutdownHandle};
pub use state::{State as ServiceState, StateSetupError};
