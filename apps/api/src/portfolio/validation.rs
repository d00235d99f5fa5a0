use serde::{Deserialize, Serialize};

use crate::models::portfolio::Portfolio;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    #[cfg(test)]
    pub fn is_field_invalid(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Fields that must be non-blank before a portfolio can be saved or exported.
const REQUIRED_FIELDS: &[(&str, &str)] = &[
    ("fullName", "Full name is required"),
    ("professionalTitle", "Professional title is required"),
    ("bio", "Bio is required"),
];

fn required_value<'a>(portfolio: &'a Portfolio, field: &str) -> &'a str {
    match field {
        "fullName" => &portfolio.full_name,
        "professionalTitle" => &portfolio.professional_title,
        "bio" => &portfolio.bio,
        _ => "",
    }
}

/// Checks every required field. Whitespace-only values count as empty.
pub fn validate(portfolio: &Portfolio) -> ValidationReport {
    let errors: Vec<FieldError> = REQUIRED_FIELDS
        .iter()
        .filter(|(field, _)| required_value(portfolio, field).trim().is_empty())
        .map(|(field, message)| FieldError {
            field: field.to_string(),
            message: message.to_string(),
        })
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Single-field check run when a field loses focus.
/// Returns `None` when the field is filled or not a required field.
pub fn validate_field(field: &str, value: &str) -> Option<FieldError> {
    let required = REQUIRED_FIELDS.iter().any(|(f, _)| *f == field);
    if required && value.trim().is_empty() {
        Some(FieldError {
            field: field.to_string(),
            message: "This field is required".to_string(),
        })
    } else {
        None
    }
}
