use base64::{engine::general_purpose::STANDARD, Engine as _};
use url::Url;

use crate::errors::AppError;

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Resolves the profile image from a pasted URL. An empty input clears the image.
/// Accepted URLs are stored as pasted, minus surrounding whitespace.
pub fn from_url(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::Validation(format!("Invalid image URL '{raw}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(AppError::Validation(format!(
            "Image URL must use http or https, got '{other}'"
        ))),
    }
}

/// Turns an uploaded file into a `data:` URL after checking its type and size.
pub fn from_upload(content_type: &str, bytes: &[u8], max_bytes: usize) -> Result<String, AppError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_TYPES.contains(&mime.as_str()) {
        return Err(AppError::UnsupportedImage(
            "Please upload a JPEG, PNG, or GIF image".to_string(),
        ));
    }
    if bytes.len() > max_bytes {
        return Err(too_large(max_bytes));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("Error reading image file".to_string()));
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

pub fn too_large(max_bytes: usize) -> AppError {
    AppError::ImageTooLarge(format!("Image must be less than {}", human_size(max_bytes)))
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_clears() {
        assert_eq!(from_url("  ").unwrap(), "");
    }

    #[test]
    fn test_valid_url_accepted() {
        assert_eq!(
            from_url("https://example.com/me.png").unwrap(),
            "https://example.com/me.png"
        );
    }

    #[test]
    fn test_url_kept_as_pasted() {
        assert_eq!(from_url(" https://example.com ").unwrap(), "https://example.com");
        assert_eq!(
            from_url("https://Example.com/a%20b.png?size=2").unwrap(),
            "https://Example.com/a%20b.png?size=2"
        );
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(from_url("me.png"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        assert!(from_url("javascript:alert(1)").is_err());
        assert!(from_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_png_upload_becomes_data_url() {
        let url = from_upload("image/png", &[0x89, b'P', b'N', b'G'], DEFAULT_MAX_IMAGE_BYTES).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert!(from_upload("IMAGE/GIF; charset=binary", b"GIF89a", DEFAULT_MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let err = from_upload("image/webp", b"RIFF", DEFAULT_MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
        assert!(err.to_string().contains("JPEG, PNG, or GIF"));
    }

    #[test]
    fn test_oversized_rejected() {
        let bytes = vec![0u8; DEFAULT_MAX_IMAGE_BYTES + 1];
        let err = from_upload("image/jpeg", &bytes, DEFAULT_MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, AppError::ImageTooLarge(_)));
        assert!(err.to_string().contains("2MB"));
    }

    #[test]
    fn test_exact_limit_accepted() {
        let bytes = vec![0u8; 1024];
        assert!(from_upload("image/jpeg", &bytes, 1024).is_ok());
    }
}
