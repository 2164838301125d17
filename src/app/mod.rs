// Application layer: maps CLI commands onto the lifecycle service.

#[cfg(feature = "cli")]
pub mod commands;
pub mod view;

#[cfg(feature = "cli")]
use crate::adapters::{InMemoryStore, JsonFileStore, JwtAuthenticator};
#[cfg(feature = "cli")]
use crate::config::{AppConfig, Command};
#[cfg(feature = "cli")]
use crate::core::service::ReservationService;
#[cfg(feature = "cli")]
use crate::domain::ports::ReservationStore;
#[cfg(feature = "cli")]
use crate::utils::error::{ReservationError, Result};

/// Builds the configured backend and runs one command against it.
///
/// The `memory` backend lives for this process only.
#[cfg(feature = "cli")]
pub fn run(config: &AppConfig, token: Option<&str>, command: Command) -> Result<serde_json::Value> {
    let auth = JwtAuthenticator::from_config(&config.auth);

    match config.storage.backend.as_str() {
        "memory" => {
            tracing::debug!("Using in-memory storage");
            run_with_store(InMemoryStore::new(), config, &auth, token, command)
        }
        "file" => {
            let path = config.storage_path().ok_or_else(|| ReservationError::ConfigError {
                message: "storage.path is required for the file backend".to_string(),
            })?;
            tracing::debug!("Using file storage at {}", path);
            run_with_store(JsonFileStore::open(path)?, config, &auth, token, command)
        }
        other => Err(ReservationError::ConfigError {
            message: format!("unknown storage backend '{}'", other),
        }),
    }
}

#[cfg(feature = "cli")]
fn run_with_store<S: ReservationStore>(
    store: S,
    config: &AppConfig,
    auth: &JwtAuthenticator,
    token: Option<&str>,
    command: Command,
) -> Result<serde_json::Value> {
    let mut service = ReservationService::new(store).with_policy(config.policy());
    commands::execute(&mut service, auth, token, command)
}
