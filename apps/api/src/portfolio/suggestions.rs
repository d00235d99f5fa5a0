/// Appends `skill` to the remembered suggestion list unless it is already there.
/// Returns `true` when the list changed.
pub fn remember(suggestions: &mut Vec<String>, skill: &str) -> bool {
    let skill = skill.trim();
    if skill.is_empty() || suggestions.iter().any(|s| s == skill) {
        return false;
    }
    suggestions.push(skill.to_string());
    true
}
