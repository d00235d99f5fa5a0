use super::styles::{theme_overrides, PAGE_STYLESHEET};
use super::{html_escape, render};
use crate::models::portfolio::{Portfolio, TemplateKind};

const FONT_LINKS: &str = r#"<link href="https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;500;600;700&display=swap" rel="stylesheet">
  <link href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" rel="stylesheet">"#;

/// Wraps the rendered template into a self-contained HTML page that opens
/// correctly without the builder: styles are inlined, theme is on `<body>`.
pub fn render_document(portfolio: &Portfolio, template: TemplateKind) -> String {
    let title = if portfolio.full_name.is_empty() {
        "Portfolio".to_string()
    } else {
        html_escape(&portfolio.full_name)
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  {FONT_LINKS}
  <style>
{PAGE_STYLESHEET}
{overrides}  </style>
</head>
<body data-theme="{theme}" data-template="{template_name}">
{body}
</body>
</html>
"#,
        overrides = theme_overrides(&portfolio.settings),
        theme = portfolio.settings.theme.as_str(),
        template_name = template.as_str(),
        body = render(portfolio, template),
    )
}
