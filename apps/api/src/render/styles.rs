use crate::models::portfolio::{Settings, Theme};
use crate::portfolio::editing::is_hex_color;

/// The builder page stylesheet, embedded verbatim into downloaded documents.
pub const PAGE_STYLESHEET: &str = r#"
:root {
  --primary-color: #4f46e5;
  --secondary-color: #6b7280;
  --white: #ffffff;
  --text-color: #1f2937;
  --gray-medium: #d1d5db;
}
[data-theme="dark"] {
  --primary-color: #818cf8;
  --secondary-color: #9ca3af;
  --white: #111827;
  --text-color: #f3f4f6;
  --gray-medium: #374151;
}
body {
  font-family: 'Poppins', sans-serif;
  background: var(--white);
  color: var(--text-color);
  max-width: 960px;
  margin: 0 auto;
  padding: 2rem;
  line-height: 1.6;
}
a { color: var(--primary-color); }
.portfolio-header { text-align: center; margin-bottom: 2rem; }
.profile-image { width: 120px; height: 120px; border-radius: 50%; object-fit: cover; }
.profile-image.empty { display: inline-flex; align-items: center; justify-content: center; background: var(--gray-medium); font-size: 3rem; }
.section-title { font-size: 1.25rem; font-weight: 600; color: var(--primary-color); border-bottom: 2px solid var(--primary-color); margin: 1.5rem 0 .75rem; }
.skills-list { display: flex; flex-wrap: wrap; gap: .5rem; }
.skill-tag { background: var(--primary-color); color: var(--white); border-radius: 999px; padding: .2rem .8rem; font-size: .85rem; }
.timeline-item { border-left: 3px solid var(--primary-color); padding-left: 1rem; margin-bottom: 1rem; }
.timeline-item .date { color: var(--secondary-color); font-size: .9rem; }
.projects-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
.project-card { border: 1px solid var(--gray-medium); border-radius: 8px; padding: 1rem; }
.contact-list { display: flex; flex-wrap: wrap; gap: 1rem; }
.contact-item { display: flex; align-items: center; gap: .4rem; }
"#;

/// Variable overrides for the custom theme; empty for the built-in themes.
pub fn theme_overrides(settings: &Settings) -> String {
    match (&settings.theme, &settings.custom_colors) {
        (Theme::Custom, Some(colors))
            if is_hex_color(&colors.primary) && is_hex_color(&colors.background) =>
        {
            format!(
                ":root {{ --primary-color: {}; --white: {}; }}\n",
                colors.primary, colors.background
            )
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::CustomColors;

    #[test]
    fn test_builtin_themes_have_no_overrides() {
        assert!(theme_overrides(&Settings::default()).is_empty());
    }

    #[test]
    fn test_imported_garbage_colors_are_ignored() {
        let settings = Settings {
            theme: Theme::Custom,
            custom_colors: Some(CustomColors {
                primary: "red}</style><script>".into(),
                background: "#000".into(),
            }),
            ..Settings::default()
        };
        assert!(theme_overrides(&settings).is_empty());
    }

    #[test]
    fn test_custom_theme_overrides_variables() {
        let settings = Settings {
            theme: Theme::Custom,
            custom_colors: Some(CustomColors {
                primary: "#ff0000".into(),
                background: "#000".into(),
            }),
            ..Settings::default()
        };
        let css = theme_overrides(&settings);
        assert!(css.contains("--primary-color: #ff0000;"));
        assert!(css.contains("--white: #000;"));
    }
}
