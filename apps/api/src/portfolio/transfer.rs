use serde_json::Value;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;
use crate::portfolio::editing::sanitize;

/// Serializes the portfolio as a pretty-printed JSON file body.
pub fn export_json(portfolio: &Portfolio) -> Result<String, AppError> {
    serde_json::to_string_pretty(portfolio)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize portfolio: {e}")))
}

/// Parses an uploaded JSON file into a portfolio that replaces the current one.
pub fn import_json(text: &str) -> Result<Portfolio, AppError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AppError::InvalidImport(e.to_string()))?;
    if !value.is_object() {
        return Err(AppError::InvalidImport("Invalid JSON format".to_string()));
    }
    let mut portfolio: Portfolio =
        serde_json::from_value(value).map_err(|e| AppError::InvalidImport(e.to_string()))?;
    sanitize(&mut portfolio);
    Ok(portfolio)
}

/// `{fullName}.{ext}`, falling back to `portfolio.{ext}`.
pub fn download_filename(portfolio: &Portfolio, ext: &str) -> String {
    let stem: String = portfolio
        .full_name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '"' | '\r' | '\n') && !c.is_control())
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        format!("portfolio.{ext}")
    } else {
        format!("{stem}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::{
        Contact, CustomColors, EducationEntry, ProjectEntry, TemplateKind, Theme,
    };

    fn sample() -> Portfolio {
        let mut p = Portfolio {
            full_name: "Grace Hopper".into(),
            professional_title: "Rear Admiral".into(),
            bio: "Compilers <3".into(),
            profile_image: "https://example.com/g.jpg".into(),
            skills: vec!["COBOL".into(), "FLOW-MATIC".into()],
            education: vec![EducationEntry {
                school: "Yale".into(),
                degree: "PhD".into(),
                year: "1934".into(),
            }],
            projects: vec![ProjectEntry {
                title: "A-0".into(),
                description: "First compiler".into(),
                link: String::new(),
            }],
            contact: Contact {
                email: "grace@navy.mil".into(),
                ..Contact::default()
            },
            ..Portfolio::default()
        };
        p.settings.template = TemplateKind::Modern;
        p.settings.theme = Theme::Custom;
        p.settings.custom_colors = Some(CustomColors {
            primary: "#102030".into(),
            background: "#ffffff".into(),
        });
        p
    }

    #[test]
    fn test_export_then_import_reproduces_state() {
        let original = sample();
        let json = export_json(&original).unwrap();
        let restored = import_json(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_export_uses_camel_case_and_two_space_indent() {
        let json = export_json(&sample()).unwrap();
        assert!(json.contains("\n  \"fullName\": \"Grace Hopper\""));
        assert!(json.contains("\"professionalTitle\""));
        assert!(json.contains("\"customColors\""));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = import_json("{not json").unwrap_err();
        assert!(matches!(err, AppError::InvalidImport(_)));
        assert!(err.to_string().starts_with("Error importing JSON:"));
    }

    #[test]
    fn test_non_object_rejected() {
        for text in ["[1,2]", "42", "\"hello\"", "null"] {
            let err = import_json(text).unwrap_err();
            assert_eq!(err.to_string(), "Error importing JSON: Invalid JSON format");
        }
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        assert!(import_json(r#"{"skills":"Rust"}"#).is_err());
    }

    #[test]
    fn test_import_dedups_skills() {
        let p = import_json(r#"{"skills":["Rust","Rust","Go"]}"#).unwrap();
        assert_eq!(p.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename(&sample(), "json"), "Grace Hopper.json");
        assert_eq!(download_filename(&Portfolio::default(), "html"), "portfolio.html");
        let tricky = Portfolio {
            full_name: "../\"evil\"\n".into(),
            ..Portfolio::default()
        };
        assert_eq!(download_filename(&tricky, "json"), "..evil.json");
    }
}
