use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Email recortado y en minúsculas
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if EMAIL.is_match(&email) {
        Ok(email)
    } else {
        Err(AppError::Validation("Email inválido".to_string()))
    }
}

pub fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::Validation(format!("El campo '{}' es obligatorio", field)))
    } else {
        Ok(value.to_string())
    }
}

/// Longitud en caracteres (no bytes) dentro de `[min, max]`
pub fn length_between(value: &str, field: &str, min: usize, max: usize) -> AppResult<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min || len > max {
        Err(AppError::Validation(format!(
            "El campo '{}' debe tener entre {} y {} caracteres",
            field, min, max
        )))
    } else {
        Ok(value.to_string())
    }
}
