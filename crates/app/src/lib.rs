// Service modules (HTTP server, database, photo storage)
pub mod daemon;

// App state (configuration, paths)
pub mod state;

// Re-exports for consumers (the CLI, integration tests)
pub use daemon::http_server;
pub use daemon::{spawn_service, start_service, ServiceConfig, ServiceState, ShutdownHandle};
pub use state::{AppConfig, AppState, Environment, StateError};
