pub mod access;
pub mod approvers;
pub mod campaigns;
pub mod health;
pub mod preferences;

use cadre_core::AppError;
use uuid::Uuid;

/// Parses a path or query identifier into a UUID with a validation error
/// naming the field.
fn parse_uuid(value: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("'{value}' is not a valid {field}")))
}
