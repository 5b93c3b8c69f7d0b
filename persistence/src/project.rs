//! FILENAME: persistence/src/project.rs

use once_cell::sync::Lazy;
use regex::Regex;

static SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    // Matches a trailing " (n)" counter, as in "Report (2)".
    Regex::new(r" \((\d+)\)$").unwrap()
});

/// Picks a name for a new project that does not collide with any
/// existing one. If `requested` is free it is returned unchanged;
/// otherwise a " (n)" counter is appended, one past the highest
/// counter already in use for that base name.
pub fn unique_project_name(requested: &str, existing: &[String]) -> String {
    if !existing.iter().any(|name| name == requested) {
        return requested.to_string();
    }

    let max_counter = existing
        .iter()
        .filter_map(|name| counter_for(requested, name))
        .max()
        .unwrap_or(0);

    format!("{} ({})", requested, max_counter + 1)
}

/// Returns the counter if `name` is `base` or `base (n)`.
fn counter_for(base: &str, name: &str) -> Option<u32> {
    if name == base {
        return Some(0);
    }
    let captures = SUFFIX_RE.captures(name)?;
    let stem = &name[..name.len() - captures.get(0)?.as_str().len()];
    if stem != base {
        return None;
    }
    captures.get(1)?.as_str().parse().ok()
}
