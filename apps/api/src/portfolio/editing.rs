//! In-place mutations of a `Portfolio`. Every operation here is pure with
//! respect to I/O; handlers load, call one of these, then persist.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::portfolio::{
    CustomColors, EducationEntry, ExperienceEntry, Portfolio, ProjectEntry, Section,
    TemplateKind, Theme,
};

/// A batch of form edits. Absent fields are left untouched; present lists
/// replace the stored list wholesale since the form owns list contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInput {
    pub full_name: Option<String>,
    pub professional_title: Option<String>,
    pub bio: Option<String>,
    pub contact: Option<ContactInput>,
    pub education: Option<Vec<EducationEntry>>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Adds a trimmed skill tag. Returns `false` if it was blank or already present.
pub fn add_skill(portfolio: &mut Portfolio, raw: &str) -> bool {
    let skill = raw.trim();
    if skill.is_empty() || portfolio.skills.iter().any(|s| s == skill) {
        return false;
    }
    portfolio.skills.push(skill.to_string());
    true
}

pub fn remove_skill(portfolio: &mut Portfolio, index: usize) -> Option<String> {
    if index < portfolio.skills.len() {
        Some(portfolio.skills.remove(index))
    } else {
        None
    }
}

/// Appends a blank entry to the given section and returns its index.
pub fn add_entry(portfolio: &mut Portfolio, section: Section) -> usize {
    match section {
        Section::Education => portfolio.education.push(EducationEntry::default()),
        Section::Experience => portfolio.experience.push(ExperienceEntry::default()),
        Section::Projects => portfolio.projects.push(ProjectEntry::default()),
    }
    section.len_of(portfolio) - 1
}

/// Removes the entry at `index`; later entries shift down by one.
pub fn remove_entry(portfolio: &mut Portfolio, section: Section, index: usize) -> Result<(), AppError> {
    let len = section.len_of(portfolio);
    if index >= len {
        return Err(AppError::NotFound(format!(
            "No {} entry at index {index} (have {len})",
            section.as_str()
        )));
    }
    match section {
        Section::Education => {
            portfolio.education.remove(index);
        }
        Section::Experience => {
            portfolio.experience.remove(index);
        }
        Section::Projects => {
            portfolio.projects.remove(index);
        }
    }
    Ok(())
}

pub fn apply_form(portfolio: &mut Portfolio, input: FormInput) {
    let FormInput {
        full_name,
        professional_title,
        bio,
        contact,
        education,
        experience,
        projects,
    } = input;

    if let Some(v) = full_name {
        portfolio.full_name = v;
    }
    if let Some(v) = professional_title {
        portfolio.professional_title = v;
    }
    if let Some(v) = bio {
        portfolio.bio = v;
    }
    if let Some(c) = contact {
        let target = &mut portfolio.contact;
        for (slot, value) in [
            (&mut target.github, c.github),
            (&mut target.linkedin, c.linkedin),
            (&mut target.email, c.email),
            (&mut target.website, c.website),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
    if let Some(v) = education {
        portfolio.education = v;
    }
    if let Some(v) = experience {
        portfolio.experience = v;
    }
    if let Some(v) = projects {
        portfolio.projects = v;
    }
}

/// Switches the layout. Content fields are never touched.
pub fn set_template(portfolio: &mut Portfolio, template: TemplateKind) {
    portfolio.settings.template = template;
}

pub fn set_theme(
    portfolio: &mut Portfolio,
    theme: Theme,
    colors: Option<CustomColors>,
) -> Result<(), AppError> {
    match theme {
        Theme::Custom => {
            let colors = colors.ok_or_else(|| {
                AppError::Validation("Custom theme requires primary and background colors".into())
            })?;
            for (name, value) in [("primary", &colors.primary), ("background", &colors.background)] {
                if !is_hex_color(value) {
                    return Err(AppError::Validation(format!(
                        "Custom {name} color '{value}' must be #rgb or #rrggbb"
                    )));
                }
            }
            portfolio.settings.custom_colors = Some(colors);
        }
        Theme::Light | Theme::Dark => portfolio.settings.custom_colors = None,
    }
    portfolio.settings.theme = theme;
    Ok(())
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Gives every empty list section one blank entry so the form always has a row to fill.
pub fn ensure_defaults(portfolio: &mut Portfolio) {
    for section in [Section::Education, Section::Experience, Section::Projects] {
        if section.len_of(portfolio) == 0 {
            add_entry(portfolio, section);
        }
    }
}

/// Drops repeated skills, keeping the first occurrence.
pub fn sanitize(portfolio: &mut Portfolio) {
    let mut seen = std::collections::HashSet::new();
    portfolio.skills.retain(|s| seen.insert(s.clone()));
}
