use std::fmt::Write;

use super::{html_escape, or_placeholder, safe_href, safe_img_src};
use crate::models::portfolio::Portfolio;

/// Header card, then one titled block per non-empty section.
pub(super) fn render(p: &Portfolio) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"portfolio-header\">\n");
    if p.profile_image.is_empty() {
        html.push_str("<div class=\"profile-image empty\"><i class=\"fas fa-user\"></i></div>\n");
    } else {
        let _ = writeln!(
            html,
            "<img src=\"{}\" class=\"profile-image\" alt=\"Profile picture\" loading=\"lazy\" decoding=\"async\">",
            safe_img_src(&p.profile_image)
        );
    }
    let _ = writeln!(
        html,
        "<h1>{}</h1>\n<h2>{}</h2>\n</div>",
        html_escape(or_placeholder(&p.full_name, "Your Name")),
        html_escape(or_placeholder(&p.professional_title, "Professional Title"))
    );

    if !p.bio.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"section-title\">About Me</div><p>{}</p>",
            html_escape(&p.bio)
        );
    }

    if !p.skills.is_empty() {
        html.push_str("<div class=\"section-title\">Skills</div><div class=\"skills-list\">");
        for skill in &p.skills {
            let _ = write!(html, "<span class=\"skill-tag\">{}</span>", html_escape(skill));
        }
        html.push_str("</div>\n");
    }

    if !p.education.is_empty() {
        html.push_str("<div class=\"section-title\">Education</div>");
        for e in &p.education {
            let _ = write!(
                html,
                "<div class=\"timeline-item\"><h3>{}</h3><div class=\"date\">{} | {}</div></div>",
                html_escape(&e.school),
                html_escape(&e.degree),
                html_escape(&e.year)
            );
        }
        html.push('\n');
    }

    if !p.experience.is_empty() {
        html.push_str("<div class=\"section-title\">Work Experience</div>");
        for e in &p.experience {
            let _ = write!(
                html,
                "<div class=\"timeline-item\"><h3>{} at {}</h3><div class=\"date\">{}</div><p>{}</p></div>",
                html_escape(&e.role),
                html_escape(&e.company),
                html_escape(&e.year),
                html_escape(&e.description)
            );
        }
        html.push('\n');
    }

    if !p.projects.is_empty() {
        html.push_str("<div class=\"section-title\">Projects</div><div class=\"projects-grid\">");
        for project in &p.projects {
            let _ = write!(
                html,
                "<div class=\"project-card\"><h3>{}</h3><p>{}</p>",
                html_escape(&project.title),
                html_escape(&project.description)
            );
            if !project.link.is_empty() {
                let _ = write!(
                    html,
                    "<a href=\"{}\" class=\"project-link\" target=\"_blank\" rel=\"noopener noreferrer\"><i class=\"fas fa-external-link-alt\"></i> View Project</a>",
                    safe_href(&project.link)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div>\n");
    }

    let contacts = p.contact.filled();
    if !contacts.is_empty() {
        html.push_str("<div class=\"section-title\">Contact</div><div class=\"contact-list\">");
        for (kind, value) in contacts {
            let (icon, href) = match kind {
                "email" => ("fas fa-envelope", html_escape(&format!("mailto:{value}"))),
                "website" => ("fas fa-globe", safe_href(value)),
                "github" => ("fab fa-github", safe_href(value)),
                _ => ("fab fa-linkedin", safe_href(value)),
            };
            let _ = write!(
                html,
                "<div class=\"contact-item\"><i class=\"{icon}\"></i><a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>",
                capitalize(kind)
            );
        }
        html.push_str("</div>\n");
    }

    html
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::{Contact, EducationEntry};

    #[test]
    fn test_empty_portfolio_shows_placeholders_only() {
        let html = render(&Portfolio::default());
        assert!(html.contains("<h1>Your Name</h1>"));
        assert!(html.contains("<h2>Professional Title</h2>"));
        assert!(html.contains("profile-image empty"));
        assert!(!html.contains("section-title"));
    }

    #[test]
    fn test_sections_render_in_order() {
        let p = Portfolio {
            bio: "Bio".into(),
            skills: vec!["Rust".into()],
            education: vec![EducationEntry {
                school: "MIT".into(),
                degree: "BSc".into(),
                year: "2010".into(),
            }],
            ..Portfolio::default()
        };
        let html = render(&p);
        let about = html.find("About Me").unwrap();
        let skills = html.find(">Skills<").unwrap();
        let education = html.find(">Education<").unwrap();
        assert!(about < skills && skills < education);
        assert!(html.contains("<div class=\"date\">BSc | 2010</div>"));
    }

    #[test]
    fn test_contact_links() {
        let p = Portfolio {
            contact: Contact {
                github: "https://github.com/ada".into(),
                email: "ada@example.com".into(),
                ..Contact::default()
            },
            ..Portfolio::default()
        };
        let html = render(&p);
        assert!(html.contains("href=\"mailto:ada@example.com\""));
        assert!(html.contains("<i class=\"fab fa-github\"></i>"));
        assert!(html.contains(">Github</a>"));
        assert!(html.contains(">Email</a>"));
        assert!(!html.contains("Linkedin"));
    }

    #[test]
    fn test_profile_image_lazy() {
        let p = Portfolio {
            profile_image: "https://example.com/me.png".into(),
            ..Portfolio::default()
        };
        let html = render(&p);
        assert!(html.contains("<img src=\"https://example.com/me.png\""));
        assert!(html.contains("loading=\"lazy\""));
    }
}
