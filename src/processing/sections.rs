//! Section extraction from Markdown sources.
//!
//! Two conventions are supported:
//! - CVs use `## Heading` blocks, written in English or German.
//! - Cover letters tag each paragraph with a marker comment followed by a
//!   `\lettercontent{...}` macro, e.g. `<!-- PARAGRAPH_1_INTRODUCTION -->`.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Label → raw text, built fresh for every document.
pub type SectionMap = BTreeMap<String, String>;

/// English CV headings and the German heading accepted in their place.
pub const SECTION_TRANSLATIONS: &[(&str, &str)] = &[
    ("About Me", "Über mich"),
    ("Interests", "Interessen"),
    ("Specialization", "Spezialisierung"),
    ("Technical Skills", "Technische Fähigkeiten"),
    ("Experience", "Berufserfahrung"),
    ("Education", "Ausbildung"),
    ("Certifications", "Zertifikate"),
    ("Languages", "Sprachen"),
    ("Core strengths", "Kernkompetenzen"),
    ("One-line summary", "Kurzprofil"),
];

static LETTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*(\w+)\s*-->\s*\\lettercontent\{([^}]*(?:\{[^}]*\}[^}]*)*)\}")
        .expect("letter block pattern is valid")
});

fn heading_candidates(section_name: &str) -> Vec<&str> {
    let mut candidates = vec![section_name];
    if let Some((_, german)) = SECTION_TRANSLATIONS
        .iter()
        .find(|(english, _)| *english == section_name)
    {
        candidates.push(german);
    }
    candidates.retain(|c| !c.is_empty());
    candidates
}

/// Returns the body of the `## <section_name>` block, trimmed.
///
/// The heading is matched case-insensitively against `section_name` and its
/// German translation and must be followed by a blank line. The body runs
/// up to the next line starting with `##` or the end of the document. A
/// missing section yields an empty string.
pub fn parse_section(content: &str, section_name: &str) -> String {
    let candidates = heading_candidates(section_name);
    if candidates.is_empty() {
        return String::new();
    }

    let alternation = candidates
        .iter()
        .map(|c| regex::escape(c))
        .collect::<Vec<_>>()
        .join("|");
    let heading = match Regex::new(&format!(r"(?i)##\s+(?:{})\s*\n\n", alternation)) {
        Ok(re) => re,
        Err(_) => return String::new(),
    };

    let Some(found) = heading.find(content) else {
        return String::new();
    };

    let rest = &content[found.end()..];
    let body = match rest.find("\n##") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim().to_string()
}

/// Collects every `<!-- LABEL --> \lettercontent{...}` pair in one pass.
///
/// The macro body may span several lines and contain one level of nested
/// braces. A label that appears twice keeps its last body.
pub fn parse_letter_sections(content: &str) -> SectionMap {
    LETTER_BLOCK
        .captures_iter(content)
        .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
        .collect()
}

/// Reads a leading `---` delimited block of `key: value` lines.
///
/// Quotes around values are removed. Documents without front matter, or
/// with an unterminated block, yield an empty map.
pub fn parse_front_matter(content: &str) -> BTreeMap<String, String> {
    let mut front = BTreeMap::new();
    let Some(after_open) = content.strip_prefix("---") else {
        return front;
    };
    let Some(close) = after_open.find("---") else {
        return front;
    };

    for line in after_open[..close].lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            front.insert(key.trim().to_string(), value.to_string());
        }
    }
    front
}
