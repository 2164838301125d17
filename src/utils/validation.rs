use crate::utils::error::{ReservationError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReservationError::ConfigError {
            message: format!("{}: path cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(ReservationError::ConfigError {
            message: format!("{}: path contains null bytes", field_name),
        });
    }

    Ok(())
}

pub fn validate_positive_minutes(field_name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(ReservationError::validation(
            field_name,
            "must be greater than zero",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReservationError::validation(
            field_name,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Rejects values that still carry a `${VAR}` the environment did not supply.
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if let Some(start) = value.find("${") {
        if value[start..].contains('}') {
            return Err(ReservationError::ConfigError {
                message: format!("{}: unresolved environment placeholder", field_name),
            });
        }
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(ReservationError::ConfigError {
            message: format!(
                "{}: unsupported value '{}'. Valid values: {}",
                field_name,
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}
