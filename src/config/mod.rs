#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, CreateArgs};
pub use toml_config::{AppConfig, AuthConfig, ReservationConfig, StorageConfig, UserConfig};
