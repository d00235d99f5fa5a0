use super::{html_escape, or_placeholder, safe_href, safe_img_src};
use crate::models::portfolio::Portfolio;

/// Compact header followed by a two-column grid: experience left,
/// education and projects right.
pub(super) fn render(p: &Portfolio) -> String {
    let image = if p.profile_image.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" class=\"profile-image\" style=\"width:80px;height:80px\" alt=\"Profile picture\" loading=\"lazy\" decoding=\"async\">",
            safe_img_src(&p.profile_image)
        )
    };

    let skills = if p.skills.is_empty() {
        String::new()
    } else {
        let joined: Vec<String> = p.skills.iter().map(|s| html_escape(s)).collect();
        format!(
            "<p style=\"margin-top:1rem\"><strong>Skills:</strong> {}</p>",
            joined.join(", ")
        )
    };

    let experience: Vec<String> = p
        .experience
        .iter()
        .map(|e| {
            format!(
                "<div><strong>{}</strong> @ {}<br><small>{}</small><br>{}</div>",
                html_escape(&e.role),
                html_escape(&e.company),
                html_escape(&e.year),
                html_escape(&e.description)
            )
        })
        .collect();

    let education: Vec<String> = p
        .education
        .iter()
        .map(|e| {
            format!(
                "<div><strong>{}</strong> &mdash; {}<br><small>{}</small></div>",
                html_escape(&e.degree),
                html_escape(&e.school),
                html_escape(&e.year)
            )
        })
        .collect();

    let projects: Vec<String> = p
        .projects
        .iter()
        .map(|project| {
            let link = if project.link.is_empty() {
                String::new()
            } else {
                format!(
                    "<br><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Link</a>",
                    safe_href(&project.link)
                )
            };
            format!(
                "<div><strong>{}</strong><br><small>{}</small>{link}</div>",
                html_escape(&project.title),
                html_escape(&project.description)
            )
        })
        .collect();

    format!(
        r#"<div style="display:flex;gap:1rem;align-items:center;border-bottom:1px solid var(--gray-medium);padding-bottom:1rem">
{image}
<div>
<h1 style="margin:0">{name}</h1>
<p style="margin:0;color:var(--secondary-color)">{title}</p>
<p style="margin:.5rem 0 0;font-size:.9rem">{bio}</p>
</div>
</div>
{skills}
<div style="display:grid;grid-template-columns:1fr 1fr;gap:2rem;margin-top:1rem">
<div>
<h3>Experience</h3>{experience}
</div>
<div>
<h3>Education</h3>{education}
<h3 style="margin-top:1rem">Projects</h3>{projects}
</div>
</div>
"#,
        name = html_escape(or_placeholder(&p.full_name, "Name")),
        title = html_escape(or_placeholder(&p.professional_title, "Title")),
        bio = html_escape(&p.bio),
        experience = experience.join("<hr>"),
        education = education.join("<hr>"),
        projects = projects.join("<hr>"),
    )
}
