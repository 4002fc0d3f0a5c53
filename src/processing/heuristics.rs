//! Values derived from file names, salutations and front matter.
//!
//! None of these derivations fail: missing input yields empty strings or the
//! English defaults.

use super::sections::SectionMap;
use crate::utils::collapse_whitespace;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}[-_][0-9]{2}[-_][0-9]{2}[_-]?").expect("date prefix pattern is valid")
});
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("alphanumeric pattern is valid"));
static SALUTATION_EN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Dear\s+([^,]+),").expect("salutation pattern is valid"));
static SALUTATION_DE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Sehr geehrte[rn]?\s+([^,]+),").expect("salutation pattern is valid")
});
static CV_LANGUAGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[_-](de|en)$").expect("language suffix pattern is valid"));
static CV_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^cv[-_]").expect("cv prefix pattern is valid"));
static CV_OPTIONAL_LANGUAGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[-_]?(en|de)$").expect("language suffix pattern is valid"));

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

const LETTER_FALLBACK_FONTS: &str = concat!(
    "\\IfFontExistsTF{Lato}{%\n",
    "  \\setmainfont{Lato}[Scale=1.00]\n",
    "}{%\n",
    "  \\IfFontExistsTF{Source Sans 3}{%\n",
    "    \\setmainfont{Source Sans 3}[Scale=1.00]\n",
    "  }{%\n",
    "    \\IfFontExistsTF{TeX Gyre Heros}{\\setmainfont{TeX Gyre Heros}[Scale=1.00]}{\\renewcommand{\\familydefault}{\\sfdefault}}\n",
    "  }\n",
    "}\n",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// Interprets a free-form language name such as `German` or `en`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        if name.starts_with('g') || name.contains("ger") || name == "de" || name == "deutsch" {
            return Some(Language::De);
        }
        if name.starts_with('e') || name.contains("eng") || name == "en" {
            return Some(Language::En);
        }
        None
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    pub fn closing_salutation(self) -> &'static str {
        match self {
            Language::En => "Kind regards",
            Language::De => "Mit freundlichen Grüßen",
        }
    }

    /// Letter date in the conventional style of the language.
    pub fn format_date(self, date: NaiveDate) -> String {
        match self {
            Language::De => format!(
                "{}. {} {}",
                date.day(),
                GERMAN_MONTHS[date.month0() as usize],
                date.year()
            ),
            Language::En => date.format("%d. %B %Y").to_string(),
        }
    }

    pub fn document_title(self, full_name: &str) -> String {
        match self {
            Language::En => format!("CV - {}", full_name),
            Language::De => format!("Lebenslauf - {}", full_name),
        }
    }
}

/// Organization and role guessed from a file name such as
/// `2025-10-22_Senior_Engineer_Acme.md`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilenameHints {
    pub organization: String,
    pub role: String,
}

impl FilenameHints {
    pub fn from_stem(stem: &str) -> Self {
        let name = DATE_PREFIX.replace(stem, "");
        let tokens: Vec<&str> = name.split('_').filter(|t| !t.is_empty()).collect();

        let (organization, role) = match tokens.split_last() {
            Some((last, rest)) if !rest.is_empty() => (last.to_string(), rest.join(" ")),
            _ => (String::new(), NON_ALPHANUMERIC.replace_all(&name, " ").into_owned()),
        };

        FilenameHints {
            organization: collapse_whitespace(&organization),
            role: collapse_whitespace(&role),
        }
    }

    fn is_complete(&self) -> bool {
        !self.organization.is_empty() && !self.role.is_empty()
    }
}

/// Recipient, job title and company of a letter, unescaped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterParties {
    pub recipient: String,
    pub job_title: String,
    pub company: String,
    /// Company line of the letter head; blank when the recipient already
    /// names the company.
    pub company_line: String,
    pub explicit_company: bool,
}

fn section<'a>(sections: &'a SectionMap, label: &str) -> &'a str {
    sections.get(label).map(String::as_str).unwrap_or_default()
}

/// Extracts the addressee from `Dear X,` or `Sehr geehrte(r/n) X,`.
pub fn recipient_from_salutation(salutation: &str) -> Option<String> {
    SALUTATION_EN
        .captures(salutation)
        .or_else(|| SALUTATION_DE.captures(salutation))
        .map(|caps| caps[1].trim().to_string())
}

pub fn resolve_parties(sections: &SectionMap, hints: &FilenameHints) -> LetterParties {
    let explicit_company = section(sections, "COMPANY_NAME");

    let mut recipient = section(sections, "RECIPIENT_NAME").to_string();
    if recipient.is_empty() {
        recipient = recipient_from_salutation(section(sections, "SALUTATION")).unwrap_or_default();
    }

    let mut company_line = explicit_company.to_string();
    if hints.is_complete() {
        recipient = format!("{} - {}", hints.organization, hints.role);
    } else if company_line.is_empty() {
        company_line = hints.organization.clone();
    }

    let job_title = [
        section(sections, "JOB_TITLE"),
        section(sections, "POSITION_TITLE"),
        hints.role.as_str(),
    ]
    .into_iter()
    .find(|v| !v.is_empty())
    .unwrap_or_default()
    .to_string();

    let company = if explicit_company.is_empty() {
        hints.organization.clone()
    } else {
        explicit_company.to_string()
    };

    if recipient.is_empty() && !company.is_empty() && !job_title.is_empty() {
        recipient = format!("{} - {}", company, job_title);
    }

    LetterParties {
        recipient,
        job_title,
        company,
        company_line,
        explicit_company: !explicit_company.is_empty(),
    }
}

fn language_from_suffix(name: &str) -> Option<Language> {
    let upper = name.trim().to_uppercase();
    let upper = upper.strip_suffix(".MD").unwrap_or(&upper);
    if upper.ends_with("_DE") || upper.ends_with("-DE") {
        Some(Language::De)
    } else if upper.ends_with("_ENG") || upper.ends_with("-ENG") {
        Some(Language::En)
    } else {
        None
    }
}

/// Letter language from front matter `language`, then front matter
/// `fileName`, then the file stem. Defaults to English.
pub fn detect_letter_language(front_matter: &BTreeMap<String, String>, stem: &str) -> Language {
    front_matter
        .get("language")
        .and_then(|l| Language::from_name(l))
        .or_else(|| front_matter.get("fileName").and_then(|f| language_from_suffix(f)))
        .or_else(|| language_from_suffix(stem))
        .unwrap_or_default()
}

/// CV language from a `_de`/`-en` style stem suffix. Defaults to English.
pub fn detect_cv_language(stem: &str) -> Language {
    CV_LANGUAGE_SUFFIX
        .captures(stem)
        .and_then(|caps| Language::from_name(&caps[1]))
        .unwrap_or_default()
}

/// Guesses a profile id from a CV file stem such as `cv-ada-lovelace_de`.
pub fn cv_user_candidate(stem: &str) -> String {
    let name = CV_PREFIX.replace(stem, "");
    let name = CV_OPTIONAL_LANGUAGE_SUFFIX.replace(&name, "");
    name.split(['-', '_']).next().unwrap_or_default().to_string()
}

/// `MAIN_FONT_SETUP` for letters.
pub fn letter_font_setup(font: Option<&str>) -> String {
    match font.filter(|f| !f.trim().is_empty()) {
        Some(font) => format!("\\setmainfont{{{}}}[Scale=1.00]", font),
        None => LETTER_FALLBACK_FONTS.to_string(),
    }
}

fn cv_fontspec_block(font: &str) -> String {
    let mut block = String::new();
    block.push_str("% Custom font selection via fontspec\n");
    block.push_str("\\usepackage{fontspec}\n");
    block.push_str(&format!("\\IfFontExistsTF{{{}}}{{%\n", font));
    block.push_str(&format!("  \\setmainfont{{{}}}%\n", font));
    block.push_str(&format!("  \\setsansfont{{{}}}%\n", font));
    block.push_str("}{%\n");
    block.push_str("  \\renewcommand{\\familydefault}{\\sfdefault}%\n");
    block.push_str("}%\n");
    block.push_str("\\IfFontExistsTF{JetBrains Mono}{%\n");
    block.push_str("  \\setmonofont{JetBrains Mono}[Scale=0.9]%\n");
    block.push_str("}{%\n");
    block.push_str("  \\IfFontExistsTF{Menlo}{%\n");
    block.push_str("    \\setmonofont{Menlo}[Scale=0.9]%\n");
    block.push_str("  }{%\n");
    block.push_str("    % keep the default monospace font\n");
    block.push_str("  }%\n");
    block.push_str("}%\n");
    block
}

/// `MAIN_FONT_SETUP` for the LuxSleek CV.
pub fn luxsleek_font_setup(font: Option<&str>) -> String {
    match font.filter(|f| !f.trim().is_empty()) {
        Some(font) => cv_fontspec_block(font),
        None => "% Use sans-serif font (available by default)\n\\renewcommand{\\familydefault}{\\sfdefault}"
            .to_string(),
    }
}

/// `MAIN_FONT_SETUP` for the Hipster CV, whose class brings its own fonts.
pub fn hipster_font_setup(font: Option<&str>) -> String {
    match font.filter(|f| !f.trim().is_empty()) {
        Some(font) => cv_fontspec_block(font),
        None => "% Using document class default fonts".to_string(),
    }
}
