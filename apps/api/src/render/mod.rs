// Portfolio rendering: pure state → markup functions, one per template.
// Nothing in here touches storage or the request; same input, same bytes out.

mod classic;
pub mod document;
mod minimal;
mod modern;
pub mod styles;

use crate::models::portfolio::{Portfolio, TemplateKind};

pub use document::render_document;

/// Renders the portfolio body through the given template.
pub fn render(portfolio: &Portfolio, template: TemplateKind) -> String {
    match template {
        TemplateKind::Classic => classic::render(portfolio),
        TemplateKind::Modern => modern::render(portfolio),
        TemplateKind::Minimal => minimal::render(portfolio),
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escaped href for user-supplied links. Anything that is not an http(s) or
/// mailto link collapses to `#`.
pub(crate) fn safe_href(link: &str) -> String {
    let trimmed = link.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:") {
        html_escape(trimmed)
    } else {
        "#".to_string()
    }
}

/// Image sources additionally allow the `data:image/` URLs produced by uploads.
pub(crate) fn safe_img_src(src: &str) -> String {
    if src.starts_with("data:image/") {
        html_escape(src)
    } else {
        safe_href(src)
    }
}

pub(crate) fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
