//! Parsers turning CV section text into structured records.
//!
//! Every parser is an ordered list of matchers; the first matcher that
//! returns a record for a line (or block) wins. Lines that no matcher
//! accepts are either dropped or, for certifications, kept verbatim.

use super::sections::parse_section;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: Option<f32>,
}

/// An experience or education entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub title: String,
    pub organization: String,
    pub dates: String,
    pub location: String,
    pub description: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Certification {
    pub year: String,
    pub name: String,
    pub organization: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSkill {
    pub name: String,
    pub level: String,
    /// Filled proficiency circles out of four.
    pub circles: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub title: String,
    pub url: String,
}

type LineMatcher<T> = fn(&str) -> Option<T>;

fn first_match<T>(matchers: &[LineMatcher<T>], line: &str) -> Option<T> {
    matchers.iter().find_map(|matcher| matcher(line))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("field pattern is valid")
}

static SKILL_WITH_LEVEL: LazyLock<Regex> = LazyLock::new(|| compile(r"^\*\*(.+?):\*\*\s*([\d.]+)"));
static SKILL_BOLD_ONLY: LazyLock<Regex> = LazyLock::new(|| compile(r"^\*\*(.+?)\*\*\s*$"));
static ENTRY_TITLE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)\*\*(.+?)\*\*\s*\|\s*(.+?)$"));
static ENTRY_DATES: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^\*(.+?)\*$"));
static CERT_YEAR_NAME_ORG: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*(\d{4})\*\*\s*[-–—]\s*(.+?)\s*[-–—]\s*(.+)"));
static CERT_BOLD_NAME_ORG: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.+?)\*\*\s*[-–—]\s*(.+)"));
static CERT_NAME_ORG: LazyLock<Regex> = LazyLock::new(|| compile(r"(.+?)\s*[-–—]\s*(.+)"));
static LANGUAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*(.+?):\*\*\s*(.+?)(?:\s*\((\d)/4\))?$"));
static PUBLICATION_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| compile(r"\n---\n"));
static URL: LazyLock<Regex> = LazyLock::new(|| compile(r"(https?://\S+)"));

// Skills

fn skill_with_level(line: &str) -> Option<Skill> {
    let caps = SKILL_WITH_LEVEL.captures(line)?;
    Some(Skill {
        name: caps[1].trim().to_string(),
        level: caps[2].trim().parse::<f32>().ok(),
    })
}

fn skill_bold_only(line: &str) -> Option<Skill> {
    let caps = SKILL_BOLD_ONLY.captures(line)?;
    Some(Skill {
        name: caps[1].trim().to_string(),
        level: None,
    })
}

const SKILL_MATCHERS: &[LineMatcher<Skill>] = &[skill_with_level, skill_bold_only];

/// Parses `**Name:** 4.5` and `**Name**` lines; anything else is dropped.
pub fn parse_skills(section_text: &str) -> Vec<Skill> {
    section_text
        .lines()
        .filter_map(|line| first_match(SKILL_MATCHERS, line))
        .collect()
}

// Experience / education

fn parse_entry_block(block: &str) -> Entry {
    let mut entry = Entry::default();

    if let Some(caps) = ENTRY_TITLE.captures(block) {
        entry.title = caps[1].trim().to_string();
        entry.organization = caps[2].trim().to_string();
    }

    if let Some(caps) = ENTRY_DATES.captures(block) {
        let date_info = caps[1].trim();
        match date_info.split_once('|') {
            Some((dates, rest)) => {
                entry.dates = dates.trim().to_string();
                // Only the second column is the location
                entry.location = rest.split('|').next().unwrap_or_default().trim().to_string();
            }
            None => entry.dates = date_info.to_string(),
        }
    }

    for line in block.lines().map(str::trim) {
        if let Some(bullet) = line.strip_prefix("- ") {
            entry.bullets.push(bullet.to_string());
        } else if !line.is_empty() && !line.starts_with('*') {
            entry.bullets.push(line.to_string());
        }
    }
    entry.description = entry.bullets.join(" ");

    entry
}

/// Splits a multi-entry section on `---` and parses every non-empty block.
pub fn parse_entries(section_text: &str) -> Vec<Entry> {
    section_text
        .split("---")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(parse_entry_block)
        .collect()
}

// Certifications

fn cert_year_name_org(line: &str) -> Option<Certification> {
    let caps = CERT_YEAR_NAME_ORG.captures(line)?;
    Some(Certification {
        year: caps[1].to_string(),
        name: caps[2].trim().to_string(),
        organization: caps[3].trim().to_string(),
    })
}

fn cert_bold_name_org(line: &str) -> Option<Certification> {
    let caps = CERT_BOLD_NAME_ORG.captures(line)?;
    Some(Certification {
        year: String::new(),
        name: caps[1].trim().to_string(),
        organization: caps[2].trim().to_string(),
    })
}

fn cert_name_org(line: &str) -> Option<Certification> {
    let caps = CERT_NAME_ORG.captures(line)?;
    Some(Certification {
        year: String::new(),
        name: caps[1].trim().to_string(),
        organization: caps[2].trim().to_string(),
    })
}

fn cert_whole_line(line: &str) -> Option<Certification> {
    Some(Certification {
        name: line.trim().trim_matches('*').trim().to_string(),
        ..Certification::default()
    })
}

const CERT_MATCHERS: &[LineMatcher<Certification>] = &[
    cert_year_name_org,
    cert_bold_name_org,
    cert_name_org,
    cert_whole_line,
];

/// Parses one certification line. Never fails: a line without any
/// recognizable structure becomes the certification name.
pub fn parse_certification_line(line: &str) -> Certification {
    first_match(CERT_MATCHERS, line).unwrap_or_default()
}

/// Parses a certifications section, skipping blank lines and `---` rules.
pub fn parse_certifications(section_text: &str) -> Vec<Certification> {
    section_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "---")
        .map(|line| {
            let line = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .map(str::trim)
                .unwrap_or(line);
            parse_certification_line(line)
        })
        .collect()
}

// Languages

fn language_line(line: &str) -> Option<LanguageSkill> {
    let caps = LANGUAGE_LINE.captures(line)?;
    Some(LanguageSkill {
        name: caps[1].trim().to_string(),
        level: caps[2].trim().to_string(),
        circles: caps
            .get(3)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .unwrap_or(0),
    })
}

/// Parses `**Language:** Level (N/4)` lines; the `(N/4)` suffix is optional.
pub fn parse_languages(section_text: &str) -> Vec<LanguageSkill> {
    section_text.lines().filter_map(language_line).collect()
}

// Publications

/// Parses publication blocks separated by `---` lines into title and URL.
pub fn parse_publications(section_text: &str) -> Vec<Publication> {
    PUBLICATION_SEPARATOR
        .split(section_text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .filter_map(|block| {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            let title = lines.first()?.to_string();
            let url = match lines.get(1) {
                Some(second) if second.starts_with("http://") || second.starts_with("https://") => {
                    second.to_string()
                }
                _ => URL
                    .captures(block)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default(),
            };
            Some(Publication { title, url })
        })
        .collect()
}

/// Parses `- ` bullet lines of the specialization section.
pub fn parse_specializations(section_text: &str) -> Vec<String> {
    section_text
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("- "))
        .map(|spec| spec.trim().to_string())
        .collect()
}

fn first_lines(text: &str, count: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves the interests text of a CV.
///
/// Falls back to the one-line summary, then the first three lines of the
/// core strengths, then the first two lines of `about_me`.
pub fn resolve_interests(content: &str, about_me: &str) -> String {
    let interests = parse_section(content, "Interests");
    if !interests.is_empty() {
        return interests;
    }

    let one_line = parse_section(content, "One-line summary");
    if !one_line.is_empty() {
        return one_line;
    }

    let core = parse_section(content, "Core strengths");
    if !core.is_empty() {
        let lines = first_lines(&core, 3);
        return if lines.is_empty() { core } else { lines };
    }

    first_lines(about_me, 2)
}
