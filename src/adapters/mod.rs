// Adapters layer: concrete implementations of the domain ports (storage backends, authentication).

pub mod auth;
pub mod json_file;
pub mod memory;
pub mod password;

pub use auth::JwtAuthenticator;
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
