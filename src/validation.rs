//! Input checks applied before any remote call or write.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"));
static TX_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("tx hash pattern is valid"));

pub fn is_address(value: &str) -> bool {
    ADDRESS_RE.is_match(value)
}

pub fn is_tx_hash(value: &str) -> bool {
    TX_HASH_RE.is_match(value)
}

pub fn require_address(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if is_address(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::InvalidRequest(format!("{} must be a 0x-prefixed 20-byte hex address", field)))
    }
}

pub fn optional_address(field: &str, value: Option<&str>) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => require_address(field, v).map(Some),
        None => Ok(None),
    }
}

pub fn require_tx_hash(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if is_tx_hash(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::InvalidRequest(format!("{} must be a 0x-prefixed 32-byte hex hash", field)))
    }
}

pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::InvalidRequest(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn require_positive(field: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::InvalidRequest(format!("{} must be a positive number", field)))
    }
}

pub fn require_non_negative(field: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::InvalidRequest(format!("{} must not be negative", field)))
    }
}
