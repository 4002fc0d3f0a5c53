//! LaTeX fragments for the CV templates.
//!
//! All free text from the parsed records is escaped here; the returned
//! fragments are inserted verbatim by the template filler.

use super::escape::latex_escape;
use super::fields::{Certification, Entry, LanguageSkill, Publication, Skill};
use regex::Regex;
use std::sync::LazyLock;

const ITEMIZE_BEGIN: &str = "\\begin{itemize}[leftmargin=*,nosep]";
const ITEMIZE_END: &str = "\\end{itemize}";

static EMPHASIS_WRAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*{1,2}\s*(.+?)\s*\*{1,2}$").expect("emphasis pattern is valid")
});

fn location_suffix(location: &str) -> String {
    if location.is_empty() {
        String::new()
    } else {
        format!(", {}", latex_escape(location))
    }
}

// LuxSleek

pub fn luxsleek_experience(entries: &[Entry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(format!("\\textbf{{{}}}", latex_escape(&entry.title)));
        lines.push(format!(
            "\\reducedtext{{at \\textit{{{}}}{}}}",
            latex_escape(&entry.organization),
            location_suffix(&entry.location)
        ));
        lines.push(format!("\\reducedtext{{{}}}", latex_escape(&entry.dates)));

        if !entry.description.is_empty() {
            lines.push(ITEMIZE_BEGIN.to_string());
            if entry.bullets.is_empty() {
                lines.push(format!("  \\item {}", latex_escape(&entry.description)));
            } else {
                for bullet in &entry.bullets {
                    lines.push(format!("  \\item {}", latex_escape(bullet)));
                }
            }
            lines.push(ITEMIZE_END.to_string());
        }

        lines.push("\\vspace{1ex}".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn luxsleek_education(entries: &[Entry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(format!("\\textbf{{{}}}", latex_escape(&entry.title)));
        lines.push(format!(
            "\\reducedtext{{\\textit{{{}}}{}}}",
            latex_escape(&entry.organization),
            location_suffix(&entry.location)
        ));
        lines.push(format!("\\reducedtext{{{}}}", latex_escape(&entry.dates)));
        if !entry.description.is_empty() {
            lines.push(format!("\\smaller{{{}}}", latex_escape(&entry.description)));
        }
        lines.push("\\vspace{1ex}".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

fn certification_item(cert: &Certification) -> String {
    let name = latex_escape(&cert.name);
    let org = if cert.organization.is_empty() {
        String::new()
    } else {
        format!(", \\textit{{{}}}", latex_escape(&cert.organization))
    };
    if cert.year.is_empty() {
        format!("  \\item {}{}", name, org)
    } else {
        format!("  \\item \\textbf{{{}}} - {}{}", latex_escape(&cert.year), name, org)
    }
}

/// Certifications as an itemize block; empty input renders nothing.
pub fn certifications(certs: &[Certification]) -> String {
    if certs.is_empty() {
        return String::new();
    }
    let mut lines = vec![ITEMIZE_BEGIN.to_string()];
    lines.extend(certs.iter().map(certification_item));
    lines.push(ITEMIZE_END.to_string());
    lines.join("\n")
}

/// Publications as an itemize block, linked with `\href` when a URL is known.
pub fn publications(pubs: &[Publication]) -> String {
    if pubs.is_empty() {
        return String::new();
    }
    let mut lines = vec![ITEMIZE_BEGIN.to_string()];
    for publication in pubs {
        let title = EMPHASIS_WRAP.replace(&publication.title, "$1");
        let title = latex_escape(&title);
        if publication.url.is_empty() {
            lines.push(format!("  \\item {}", title));
        } else {
            lines.push(format!(
                "  \\item \\href{{{}}}{{{}}}",
                latex_escape(&publication.url),
                title
            ));
        }
    }
    lines.push(ITEMIZE_END.to_string());
    lines.join("\n")
}

pub fn luxsleek_languages(languages: &[LanguageSkill]) -> String {
    languages
        .iter()
        .map(|lang| {
            format!(
                "\\textbf{{{}}} ({})",
                latex_escape(&lang.name),
                latex_escape(&lang.level)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `\item` lines only; the template owns the surrounding list.
pub fn skill_items(skills: &[Skill]) -> String {
    skills
        .iter()
        .map(|skill| format!("\\item {}", latex_escape(&skill.name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits free interest text into items.
///
/// Multi-line text yields one item per line (bullet markers removed);
/// single-line text is split on commas, then on ` - `.
pub fn interest_items(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.contains('\n') {
        return text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.strip_prefix("- ")
                    .or_else(|| line.strip_prefix("* "))
                    .map(str::trim)
                    .unwrap_or(line)
                    .to_string()
            })
            .collect();
    }

    let separator = if text.contains(',') {
        ","
    } else if text.contains(" - ") {
        " - "
    } else {
        return vec![text.to_string()];
    };
    text.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn luxsleek_interests(text: &str) -> String {
    interest_items(text)
        .iter()
        .map(|item| format!("\\item {}", latex_escape(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

// Hipster

/// Language table rows with filled and empty proficiency circles.
pub fn hipster_languages(languages: &[LanguageSkill]) -> String {
    languages
        .iter()
        .map(|lang| {
            let filled = lang.circles.min(4);
            format!(
                "\\textbf{{{}}} & {} & \\pictofraction{{\\faCircle}}{{cvgreen}}{{{}}}{{black!30}}{{{}}}{{\\tiny}} \\\\",
                latex_escape(&lang.name),
                latex_escape(&lang.level),
                filled,
                4 - filled
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Experience or education entries: bold title with dates on the right,
/// organization line, then the bullets.
pub fn hipster_entries(entries: &[Entry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(format!(
            "\\textbf{{{}}} \\hfill {}\\\\",
            latex_escape(&entry.title),
            latex_escape(&entry.dates)
        ));
        lines.push(format!(
            "\\textit{{{}}}{}",
            latex_escape(&entry.organization),
            location_suffix(&entry.location)
        ));
        if !entry.bullets.is_empty() {
            lines.push(ITEMIZE_BEGIN.to_string());
            for bullet in &entry.bullets {
                lines.push(format!("  \\item {}", latex_escape(bullet)));
            }
            lines.push(ITEMIZE_END.to_string());
        }
        lines.push("\\medskip".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn hipster_specializations(specs: &[String]) -> String {
    if specs.is_empty() {
        return String::new();
    }
    let mut lines = vec![ITEMIZE_BEGIN.to_string()];
    lines.extend(specs.iter().map(|s| format!("  \\item {}", latex_escape(s))));
    lines.push(ITEMIZE_END.to_string());
    lines.join("\n")
}

/// Skills as `name & level \\` rows; skills without a level show a dash.
pub fn hipster_skills(skills: &[Skill]) -> String {
    skills
        .iter()
        .map(|skill| {
            let level = skill
                .level
                .map(|l| format!("{}/5", l))
                .unwrap_or_else(|| "--".to_string());
            format!("{} & {} \\\\", latex_escape(&skill.name), level)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `\textbf{Label:} value` lines for the non-empty values.
pub fn hipster_personal_info(items: &[(&str, &str)]) -> String {
    items
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("\\textbf{{{}:}} {}\\\\", latex_escape(label), latex_escape(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contact lines from `(text, link)` pairs; an empty link renders plain text.
pub fn hipster_contacts(items: &[(&str, &str)]) -> String {
    items
        .iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, link)| {
            if link.is_empty() {
                format!("{}\\\\", latex_escape(text))
            } else {
                format!("\\href{{{}}}{{{}}}\\\\", latex_escape(link), latex_escape(text))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, org: &str, dates: &str, location: &str, bullets: &[&str]) -> Entry {
        let bullets: Vec<String> = bullets.iter().map(|b| b.to_string()).collect();
        Entry {
            title: title.into(),
            organization: org.into(),
            dates: dates.into(),
            location: location.into(),
            description: bullets.join(" "),
            bullets,
        }
    }

    #[test]
    fn test_luxsleek_experience() {
        let out = luxsleek_experience(&[entry(
            "Lead Engineer",
            "R&D Labs",
            "2020--2023",
            "Berlin",
            &["Cut costs by 30%"],
        )]);
        let expected = [
            r"\textbf{Lead Engineer}",
            r"\reducedtext{at \textit{R\&D Labs}, Berlin}",
            r"\reducedtext{2020--2023}",
            r"\begin{itemize}[leftmargin=*,nosep]",
            r"  \item Cut costs by 30\%",
            r"\end{itemize}",
            r"\vspace{1ex}",
            "",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_luxsleek_experience_without_description() {
        let out = luxsleek_experience(&[entry("Intern", "Initech", "2019", "", &[])]);
        assert!(!out.contains("itemize"));
        assert!(out.contains("\\reducedtext{at \\textit{Initech}}"));
        assert_eq!(luxsleek_experience(&[]), "");
    }

    #[test]
    fn test_luxsleek_education() {
        let out = luxsleek_education(&[entry("M.Sc. CS", "TU Berlin", "2015", "Berlin", &["Thesis"])]);
        assert!(out.contains("\\reducedtext{\\textit{TU Berlin}, Berlin}"));
        assert!(out.contains("\\smaller{Thesis}"));
    }

    #[test]
    fn test_certifications_rendering() {
        let certs = vec![
            Certification { year: "2023".into(), name: "AWS Cert".into(), organization: "Amazon".into() },
            Certification { year: String::new(), name: "CKA".into(), organization: "CNCF".into() },
            Certification { year: String::new(), name: "Scrum_Master".into(), organization: String::new() },
        ];
        let out = certifications(&certs);
        let expected = [
            r"\begin{itemize}[leftmargin=*,nosep]",
            r"  \item \textbf{2023} - AWS Cert, \textit{Amazon}",
            r"  \item CKA, \textit{CNCF}",
            r"  \item Scrum\_Master",
            r"\end{itemize}",
        ]
        .join("\n");
        assert_eq!(out, expected);
        assert_eq!(certifications(&[]), "");
    }

    #[test]
    fn test_publications_rendering() {
        let pubs = vec![
            Publication { title: "**Fast Parsers**".into(), url: "https://example.org/a_b".into() },
            Publication { title: "Unlinked".into(), url: String::new() },
        ];
        let out = publications(&pubs);
        assert!(out.contains("\\item \\href{https://example.org/a\\_b}{Fast Parsers}"));
        assert!(out.contains("\\item Unlinked"));
    }

    #[test]
    fn test_luxsleek_languages() {
        let langs = vec![
            LanguageSkill { name: "German".into(), level: "Native".into(), circles: 4 },
            LanguageSkill { name: "English".into(), level: "C1".into(), circles: 3 },
        ];
        assert_eq!(
            luxsleek_languages(&langs),
            "\\textbf{German} (Native), \\textbf{English} (C1)"
        );
    }

    #[test]
    fn test_skill_items() {
        let skills = vec![
            Skill { name: "C#".into(), level: Some(4.0) },
            Skill { name: "Rust".into(), level: None },
        ];
        assert_eq!(skill_items(&skills), "\\item C\\#\n\\item Rust");
    }

    #[test]
    fn test_interest_items() {
        assert_eq!(interest_items("- Chess\n* Climbing\n\nJazz"), vec!["Chess", "Climbing", "Jazz"]);
        assert_eq!(interest_items("Chess, Climbing ,"), vec!["Chess", "Climbing"]);
        assert_eq!(interest_items("Chess - Climbing"), vec!["Chess", "Climbing"]);
        assert_eq!(interest_items("Open source"), vec!["Open source"]);
        assert!(interest_items("  ").is_empty());
        assert_eq!(luxsleek_interests("Chess, R&D"), "\\item Chess\n\\item R\\&D");
    }

    #[test]
    fn test_hipster_languages() {
        let langs = vec![
            LanguageSkill { name: "German".into(), level: "Native".into(), circles: 4 },
            LanguageSkill { name: "French".into(), level: "Basic".into(), circles: 0 },
        ];
        let out = hipster_languages(&langs);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(
            rows[0],
            "\\textbf{German} & Native & \\pictofraction{\\faCircle}{cvgreen}{4}{black!30}{0}{\\tiny} \\\\"
        );
        assert!(rows[1].contains("{cvgreen}{0}{black!30}{4}"));
    }

    #[test]
    fn test_hipster_entries_and_skills() {
        let out = hipster_entries(&[entry("Engineer", "Acme", "2020", "Paris", &["Shipped v2"])]);
        assert!(out.starts_with("\\textbf{Engineer} \\hfill 2020\\\\\n\\textit{Acme}, Paris"));
        assert!(out.contains("  \\item Shipped v2"));

        let skills = vec![
            Skill { name: "Rust".into(), level: Some(4.5) },
            Skill { name: "Tooling".into(), level: None },
        ];
        assert_eq!(hipster_skills(&skills), "Rust & 4.5/5 \\\\\nTooling & -- \\\\");
    }

    #[test]
    fn test_hipster_specializations() {
        let out = hipster_specializations(&["Compilers".to_string()]);
        assert!(out.contains("  \\item Compilers"));
        assert_eq!(hipster_specializations(&[]), "");
    }

    #[test]
    fn test_hipster_personal_info_and_contacts() {
        let info = hipster_personal_info(&[("Location", "Berlin"), ("Born", ""), ("Nationality", "German")]);
        assert_eq!(info, "\\textbf{Location:} Berlin\\\\\n\\textbf{Nationality:} German\\\\");

        let contacts = hipster_contacts(&[
            ("ada@example.org", "mailto:ada@example.org"),
            ("+44 20", ""),
            ("", "https://example.org"),
        ]);
        assert_eq!(
            contacts,
            "\\href{mailto:ada@example.org}{ada@example.org}\\\\\n+44 20\\\\"
        );
    }
}
