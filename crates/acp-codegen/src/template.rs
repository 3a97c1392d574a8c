//! `$placeholder` substitution and the stored C++ templates.

use acp_types::{AcpError, Result};
use std::collections::BTreeMap;

/// Placeholder name → replacement text.
pub type Replacements = BTreeMap<String, String>;

/// Indent used for every nested line of generated code.
pub const INDENT: &str = "  ";

/// Substitute `$identifier` placeholders.
///
/// An identifier is the maximal run of ASCII letters, digits and `_` after
/// `$`. Known identifiers are replaced; unknown ones vanish together with the
/// `$`, which is never emitted.
pub fn render(template: &str, replacements: &Replacements) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let key_start = start + 1;
        let mut key_end = key_start;
        while let Some(&(i, k)) = chars.peek() {
            if k.is_ascii_alphanumeric() || k == '_' {
                key_end = i + k.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        if let Some(value) = replacements.get(&template[key_start..key_end]) {
            out.push_str(value);
        }
    }
    out
}

/// Join lines with `\n`, prefixing each with `prefix`.
pub fn merge_lines<S: AsRef<str>>(lines: &[S], prefix: &str) -> String {
    lines
        .iter()
        .map(|line| format!("{prefix}{}", line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of `/` into a single slash.
pub fn merge_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        out.push(c);
    }
    out
}

/// Drop repeated lines, keeping the first occurrence of each.
pub fn dedup_lines(lines: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Stored templates
// ══════════════════════════════════════════════════════════════════════════════

const TEMPLATES: &[(&str, &str)] = &[
    ("acp_core.h", include_str!("../templates/acp_core.h")),
    ("acp_core.cpp", include_str!("../templates/acp_core.cpp")),
    (
        "acp_core_loopers_array.cpp",
        include_str!("../templates/acp_core_loopers_array.cpp"),
    ),
    ("acp_eeprom_vars.h", include_str!("../templates/acp_eeprom_vars.h")),
    ("acp_eeprom_vars.cpp", include_str!("../templates/acp_eeprom_vars.cpp")),
    ("acp_project.h", include_str!("../templates/acp_project.h")),
    ("example.ino", include_str!("../templates/example.ino")),
    ("library.properties", include_str!("../templates/library.properties")),
];

/// Look up a stored template by name.
pub fn template(name: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}

/// Render the stored template `name`.
pub fn render_template(name: &str, replacements: &Replacements) -> Result<String> {
    let text = template(name)
        .ok_or_else(|| AcpError::compile(format!("Unavailable template resource: {name}")))?;
    Ok(render(text, replacements))
}
