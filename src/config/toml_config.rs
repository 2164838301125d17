use crate::adapters::auth::DEFAULT_TOKEN_EXPIRY_MINUTES;
use crate::core::service::ReservationPolicy;
use crate::domain::model::DEFAULT_DURATION_MINUTES;
use crate::utils::error::{ReservationError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const STORAGE_BACKENDS: [&str; 2] = ["memory", "file"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub reservation: ReservationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `file`.
    pub backend: String,
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: Some("./data/reservations.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    pub token_expiry_minutes: i64,
    pub users: Vec<UserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_expiry_minutes: DEFAULT_TOKEN_EXPIRY_MINUTES,
            users: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    /// Argon2id PHC string, see `reservations hash-password`.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationConfig {
    pub default_duration_minutes: u32,
    pub max_duration_minutes: Option<u32>,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            max_duration_minutes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReservationError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with environment values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ReservationError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn policy(&self) -> ReservationPolicy {
        ReservationPolicy {
            default_duration_minutes: self.reservation.default_duration_minutes,
            max_duration_minutes: self.reservation.max_duration_minutes,
        }
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage.path.as_deref()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_one_of("storage.backend", &self.storage.backend, &STORAGE_BACKENDS)?;
        if self.storage.backend == "file" {
            let path = self.storage_path().ok_or_else(|| ReservationError::ConfigError {
                message: "storage.path is required for the file backend".to_string(),
            })?;
            validation::validate_path("storage.path", path)?;
        }

        validation::validate_non_empty_string("auth.secret", &self.auth.secret)?;
        validation::validate_resolved("auth.secret", &self.auth.secret)?;
        if self.auth.token_expiry_minutes <= 0 {
            return Err(ReservationError::validation(
                "auth.token_expiry_minutes",
                "must be greater than zero",
            ));
        }
        for user in &self.auth.users {
            validation::validate_non_empty_string("auth.users.username", &user.username)?;
            validation::validate_non_empty_string("auth.users.password_hash", &user.password_hash)?;
            validation::validate_resolved("auth.users.password_hash", &user.password_hash)?;
        }

        validation::validate_positive_minutes(
            "reservation.default_duration_minutes",
            self.reservation.default_duration_minutes,
        )?;
        if let Some(max) = self.reservation.max_duration_minutes {
            validation::validate_positive_minutes("reservation.max_duration_minutes", max)?;
            if self.reservation.default_duration_minutes > max {
                return Err(ReservationError::validation(
                    "reservation.default_duration_minutes",
                    format!("exceeds max_duration_minutes ({})", max),
                ));
            }
        }

        Ok(())
    }
}
