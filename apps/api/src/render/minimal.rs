use super::{html_escape, safe_href};
use crate::models::portfolio::Portfolio;

/// Plain heading plus bullet lists. No images, no placeholders.
pub(super) fn render(p: &Portfolio) -> String {
    let skills = if p.skills.is_empty() {
        String::new()
    } else {
        let joined: Vec<String> = p.skills.iter().map(|s| html_escape(s)).collect();
        format!("<p><strong>Skills:</strong> {}</p>\n", joined.join(", "))
    };

    let experience: String = p
        .experience
        .iter()
        .map(|e| {
            format!(
                "<li><strong>{}</strong> @ {} ({})<br>{}</li>",
                html_escape(&e.role),
                html_escape(&e.company),
                html_escape(&e.year),
                html_escape(&e.description)
            )
        })
        .collect();

    let education: String = p
        .education
        .iter()
        .map(|e| {
            format!(
                "<li>{} &mdash; {} ({})</li>",
                html_escape(&e.degree),
                html_escape(&e.school),
                html_escape(&e.year)
            )
        })
        .collect();

    let projects: String = p
        .projects
        .iter()
        .map(|project| {
            let link = if project.link.is_empty() {
                String::new()
            } else {
                format!(
                    " <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Link</a>",
                    safe_href(&project.link)
                )
            };
            format!(
                "<li><strong>{}</strong> &mdash; {}{link}</li>",
                html_escape(&project.title),
                html_escape(&project.description)
            )
        })
        .collect();

    format!(
        "<h1 style=\"border-bottom:1px solid var(--gray-medium);padding-bottom:.5rem\">{}</h1>\n\
         <p style=\"margin:.5rem 0\">{} &mdash; {}</p>\n\
         {skills}\
         <h3>Experience</h3><ul>{experience}</ul>\n\
         <h3>Education</h3><ul>{education}</ul>\n\
         <h3>Projects</h3><ul>{projects}</ul>\n",
        html_escape(&p.full_name),
        html_escape(&p.professional_title),
        html_escape(&p.bio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::ProjectEntry;

    #[test]
    fn test_always_lists_sections() {
        let html = render(&Portfolio::default());
        assert!(html.contains("<h3>Experience</h3><ul></ul>"));
        assert!(html.contains("<h3>Education</h3><ul></ul>"));
        assert!(html.contains("<h3>Projects</h3><ul></ul>"));
    }

    #[test]
    fn test_project_link_optional() {
        let p = Portfolio {
            projects: vec![
                ProjectEntry {
                    title: "With".into(),
                    description: "d".into(),
                    link: "https://example.com".into(),
                },
                ProjectEntry {
                    title: "Without".into(),
                    description: "d".into(),
                    link: String::new(),
                },
            ],
            ..Portfolio::default()
        };
        let html = render(&p);
        assert!(html.contains("<li><strong>With</strong> &mdash; d <a href=\"https://example.com\""));
        assert!(html.contains("<li><strong>Without</strong> &mdash; d</li>"));
    }
}
