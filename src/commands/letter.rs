//! `letter` command: cover letters from labelled Markdown blocks.

use crate::batch::{self, BatchReport, Outcome};
use crate::config::Paths;
use crate::error::{CvTexError, Result};
use crate::logger::Logger;
use crate::processing::escape::latex_escape;
use crate::processing::heuristics::{
    detect_letter_language, letter_font_setup, resolve_parties, FilenameHints, Language,
};
use crate::processing::profile::{load_profiles, require_profile, UserProfile};
use crate::processing::sections::{parse_front_matter, parse_letter_sections, SectionMap};
use crate::processing::template::{
    blank_optional_tokens, clean_backslashes, escape_bare_underscores, fill_tokens, fix_ampersands,
    replace_token, replace_token_variants, Template, TokenMap, TokenValue,
};
use crate::utils::{is_interactive, prompt, read_markdown, write_output};
use chrono::Local;
use std::path::{Path, PathBuf};

const DEFAULT_SALUTATION: &str = "Dear Hiring Manager,";

const PARAGRAPH_LABELS: &[&str] = &[
    "PARAGRAPH_1_INTRODUCTION",
    "PARAGRAPH_2_TECHNICAL_EXCELLENCE",
    "PARAGRAPH_3_EXPERIENCE_AND_VALUE",
    "PARAGRAPH_4_STRATEGIC_FIT",
    "PARAGRAPH_5_CLOSING_STATEMENT",
];

const PROFILE_PICTURE_NAMES: &[&str] = &[
    "figures/profile-pic.png",
    "figures/profile-pic.jpg",
    "figures/profile-pic.jpeg",
    "figures/profile_placeholder.png",
    "figures/profile_placeholder.jpg",
];

const SIGNATURE_NAMES: &[&str] = &[
    "figures/signature.png",
    "figures/signature.jpg",
    "figures/signature.jpeg",
    "figures/sign.png",
    "figures/sign.jpg",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterTemplate {
    Modern,
    Engineering,
}

impl LetterTemplate {
    pub const NAMES: &'static [&'static str] = &["modern", "engineering"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "modern" => Ok(LetterTemplate::Modern),
            "engineering" => Ok(LetterTemplate::Engineering),
            _ => Err(CvTexError::UnknownTemplate {
                name: name.to_string(),
                available: Self::NAMES.to_vec(),
            }),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            LetterTemplate::Modern => "cover_letter_modern.tex",
            LetterTemplate::Engineering => "cover_letter_engineering.tex",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LetterTemplate::Modern => "Modern",
            LetterTemplate::Engineering => "Engineering",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LetterOptions {
    /// Single source file; all `*.md` in `content_dir` when absent.
    pub file: Option<PathBuf>,
    pub content_dir: PathBuf,
    pub user: Option<String>,
    pub template: String,
    pub date: Option<String>,
    pub font: Option<String>,
    pub yes: bool,
    pub dry_run: bool,
}

/// Per-file values that do not come from the Markdown body.
#[derive(Debug, Clone)]
pub struct LetterSettings {
    pub stem: String,
    pub language: Language,
    pub date: String,
    pub font: Option<String>,
}

fn section<'a>(sections: &'a SectionMap, label: &str) -> Option<&'a str> {
    sections.get(label).map(String::as_str)
}

fn user_tokens(profile: Option<&UserProfile>, settings: &LetterSettings) -> TokenMap {
    let field = |key: &str| profile.map(|p| p.get(key).to_string()).unwrap_or_default();
    let mut tokens = TokenMap::new();

    for (token, key) in [
        ("YOUR_FULL_NAME", "full_name"),
        ("YOUR_EMAIL", "email"),
        ("YOUR_PHONE", "phone"),
        ("YOUR_JOB_TITLE", "job_title"),
        ("YOUR_ADDRESS", "address"),
        ("YOUR_CITY", "city"),
        ("YOUR_ZIP", "zip"),
    ] {
        tokens.insert(token.to_string(), TokenValue::text(field(key)));
    }

    tokens.insert("DATE".to_string(), TokenValue::text(settings.date.as_str()));
    tokens.insert(
        "YOUR_PHONE_TEL".to_string(),
        TokenValue::text(profile.map(UserProfile::phone_tel).unwrap_or_default()),
    );
    tokens.insert(
        "YOUR_LINKEDIN".to_string(),
        TokenValue::text(profile.map(|p| p.linkedin_label().to_string()).unwrap_or_default()),
    );
    tokens.insert(
        "YOUR_LINKEDIN_URL".to_string(),
        TokenValue::text(profile.map(UserProfile::linkedin_url).unwrap_or_default()),
    );
    tokens.insert(
        "CLOSING_SALUTATION".to_string(),
        TokenValue::text(settings.language.closing_salutation()),
    );
    tokens.insert(
        "MAIN_FONT_SETUP".to_string(),
        TokenValue::raw(letter_font_setup(settings.font.as_deref())),
    );
    tokens
}

fn replace_images(mut tex: String, profile: &UserProfile) -> String {
    for (key, names) in [
        ("profile_pic", PROFILE_PICTURE_NAMES),
        ("signature_image", SIGNATURE_NAMES),
    ] {
        let image = profile.get(key);
        if image.is_empty() {
            continue;
        }
        let image = image.replace("../figures/", "figures/");
        for name in names {
            tex = tex.replace(name, &image);
        }
    }
    tex
}

/// Fills a cover-letter template. Pure: the same input always yields the
/// same text.
pub fn build_letter(
    template: &Template,
    sections: &SectionMap,
    profile: Option<&UserProfile>,
    settings: &LetterSettings,
) -> String {
    let salutation = section(sections, "SALUTATION").unwrap_or(DEFAULT_SALUTATION);
    let mut tex = template
        .as_str()
        .replace("Dear {{RECIPIENT_NAME}},", &latex_escape(salutation));
    for label in PARAGRAPH_LABELS {
        let body = section(sections, label).unwrap_or_default();
        tex = tex.replace(&format!("{{{{{}}}}}", label), &latex_escape(body));
    }

    let user = user_tokens(profile, settings);
    tex = fill_tokens(&tex, &user);
    if let Some(profile) = profile {
        tex = replace_images(tex, profile);
    }

    let parties = resolve_parties(sections, &FilenameHints::from_stem(&settings.stem));
    tex = replace_token(&tex, "RECIPIENT_NAME", &latex_escape(&parties.recipient));
    tex = replace_token(&tex, "COMPANY_NAME", &latex_escape(&parties.company_line));

    // Markdown labels win over profile values
    let mut remaining = user;
    for (label, body) in sections {
        remaining.insert(label.clone(), TokenValue::text(body.as_str()));
    }
    tex = fill_tokens(&tex, &remaining);
    tex = blank_optional_tokens(&tex);

    tex = tex.replace("../figures/", "figures/");
    tex = fix_ampersands(&tex);
    tex = escape_bare_underscores(&tex);

    let company = if parties.explicit_company {
        latex_escape(&parties.company)
    } else {
        String::new()
    };
    tex = replace_token_variants(&tex, "JOB_TITLE", &latex_escape(&parties.job_title));
    tex = replace_token_variants(&tex, "COMPANY_NAME", &company);

    clean_backslashes(&tex)
}

/// Numbered menu lines; profiles without a name are listed as `userN`.
fn profile_menu(profiles: &[UserProfile]) -> Vec<String> {
    profiles
        .iter()
        .enumerate()
        .map(|(i, profile)| match profile.display_name() {
            "" => format!("{}) user{}", i + 1, i + 1),
            name => format!("{}) {}", i + 1, name),
        })
        .collect()
}

fn select_profile<'a>(
    profiles: &'a [UserProfile],
    user: Option<&str>,
    interactive: bool,
) -> Result<Option<&'a UserProfile>> {
    if profiles.is_empty() {
        if let Some(id) = user {
            Logger::warning(&format!("No user profiles available, ignoring '{}'", id));
        }
        return Ok(None);
    }

    if let Some(id) = user {
        let profile = require_profile(profiles, id)?;
        Logger::info(&format!("Selected user: {}", profile.get("full_name")));
        return Ok(Some(profile));
    }

    if !interactive {
        return Ok(None);
    }

    Logger::info("Available user profiles:");
    for line in profile_menu(profiles) {
        Logger::info(&line);
    }
    let answer = prompt("Select user profile by number (or press Enter to skip): ")
        .map_err(|e| CvTexError::io("<stdin>", e))?;
    if answer.is_empty() {
        return Ok(None);
    }
    match answer.parse::<usize>().ok().and_then(|n| profiles.get(n.wrapping_sub(1))) {
        Some(profile) => {
            Logger::info(&format!("Selected user: {}", profile.get("full_name")));
            Ok(Some(profile))
        }
        None => {
            Logger::warning("Invalid selection, continuing without auto-fill");
            Ok(None)
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

struct LetterJob<'a> {
    paths: &'a Paths,
    options: &'a LetterOptions,
    template: &'a Template,
    template_kind: LetterTemplate,
    profile: Option<&'a UserProfile>,
    assume_yes: bool,
}

impl LetterJob<'_> {
    fn choose_output_name(&self, suggested: &str) -> Result<Option<String>> {
        if self.assume_yes {
            return Ok(Some(suggested.to_string()));
        }
        let custom = prompt("Press Enter to use this name, or type a different name (or type SKIP to skip): ")
            .map_err(|e| CvTexError::io("<stdin>", e))?;
        if custom.eq_ignore_ascii_case("skip") {
            return Ok(None);
        }
        if custom.is_empty() {
            return Ok(Some(suggested.to_string()));
        }
        if custom.ends_with(".tex") {
            Ok(Some(custom))
        } else {
            Ok(Some(format!("{}.tex", custom)))
        }
    }

    fn confirm_overwrite(&self, output: &Path) -> Result<bool> {
        if !output.exists() || self.assume_yes {
            return Ok(true);
        }
        let answer = prompt(&format!(
            "File already exists: {}\nOverwrite? (y/n): ",
            output.display()
        ))
        .map_err(|e| CvTexError::io("<stdin>", e))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    fn process(&self, md_file: &Path) -> Result<Outcome> {
        let content = read_markdown(md_file)?;
        let sections = parse_letter_sections(&content);
        if sections.is_empty() {
            return Ok(Outcome::Skipped(format!(
                "No sections found in {} - skipping",
                md_file.display()
            )));
        }

        let stem = file_stem(md_file);
        let language = detect_letter_language(&parse_front_matter(&content), &stem);
        let date = match &self.options.date {
            Some(date) => date.clone(),
            None => language.format_date(Local::now().date_naive()),
        };
        Logger::detail(&format!("Language: {}, date: {}", language.code(), date));

        let suggested = format!("{}.tex", stem);
        Logger::info(&format!("Suggested filename: {}", suggested));
        if self.options.dry_run {
            let planned = self.paths.output(&suggested);
            Logger::info(&format!("[dry-run] Would create: {}", planned.display()));
            return Ok(Outcome::Planned(planned));
        }

        let Some(file_name) = self.choose_output_name(&suggested)? else {
            return Ok(Outcome::Skipped(format!("Skipping {}", md_file.display())));
        };
        let output = self.paths.output(&file_name);
        if !self.confirm_overwrite(&output)? {
            return Ok(Outcome::Skipped(format!("Skipping {}", output.display())));
        }

        let settings = LetterSettings {
            stem,
            language,
            date,
            font: self.options.font.clone(),
        };
        let tex = build_letter(self.template, &sections, self.profile, &settings);
        write_output(&output, &tex)?;

        Logger::file_operation("Created", &output);
        Logger::stats("Template:", self.template_kind.label());
        Logger::stats("Source:", &md_file.display().to_string());
        Ok(Outcome::Generated(output))
    }
}

/// Generates one letter per source file.
pub fn run(paths: &Paths, options: &LetterOptions) -> Result<BatchReport> {
    let files = match &options.file {
        Some(file) if !file.exists() => return Err(CvTexError::FileNotFound(file.clone())),
        Some(file) => vec![file.clone()],
        None => batch::markdown_files_in(&options.content_dir)?,
    };

    Logger::header("Application Letter from Markdown");

    let template_kind = LetterTemplate::from_name(&options.template)?;
    let template = Template::load(&paths.template(template_kind.file_name()))?;
    Logger::info(&format!("Using template: {}", template_kind.label()));

    let assume_yes = options.yes || !is_interactive();
    let profiles = load_profiles(&paths.profiles_file)?;
    let profile = select_profile(&profiles, options.user.as_deref(), !assume_yes)?;

    let job = LetterJob {
        paths,
        options,
        template: &template,
        template_kind,
        profile,
        assume_yes,
    };
    let report = batch::process_files(&files, |md_file| job.process(md_file))?;

    report.report("letter generation");
    Logger::info(&format!(
        "Review files in {} and compile them with your LaTeX toolchain",
        paths.output_dir.display()
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::profile::parse_profiles;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = r"\documentclass{letter}
% {{MAIN_FONT_SETUP}} is replaced below
{{MAIN_FONT_SETUP}}
\name{{{YOUR_FULL_NAME}}}
\phone{{YOUR_PHONE}} \tel{{YOUR_PHONE_TEL}}
\recipient{{{RECIPIENT_NAME}}}{{COMPANY_ADDRESS}}
\date{{DATE}}
\includegraphics{../figures/profile-pic.png}
Dear {{RECIPIENT_NAME}},
{{PARAGRAPH_1_INTRODUCTION}}
Position: {{JOB_TITLE}}
{{CLOSING_SALUTATION}}
";

    const LETTER_MD: &str = r"---
language: German
---
<!-- SALUTATION -->
\lettercontent{Sehr geehrte Frau Weber,}

<!-- PARAGRAPH_1_INTRODUCTION -->
\lettercontent{I bring 100% commitment to R&D_work.}
";

    fn settings(stem: &str, language: Language) -> LetterSettings {
        LetterSettings {
            stem: stem.to_string(),
            language,
            date: "7. März 2025".to_string(),
            font: None,
        }
    }

    fn ada() -> UserProfile {
        parse_profiles(
            "- id: ada\n  full_name: Ada Lovelace\n  phone: +44 20 7946\n  profile_pic: ../figures/ada.png\n",
        )
        .remove(0)
    }

    #[test]
    fn test_letter_template_names() {
        assert_eq!(LetterTemplate::from_name("Modern").unwrap(), LetterTemplate::Modern);
        assert_eq!(
            LetterTemplate::from_name("engineering").unwrap().file_name(),
            "cover_letter_engineering.tex"
        );
        assert!(matches!(
            LetterTemplate::from_name("classic"),
            Err(CvTexError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn test_profile_menu_and_selection() {
        let profiles = parse_profiles("- id: ada\n- full_name: Grace Hopper\n- email: x@example.org\n");
        assert_eq!(profile_menu(&profiles), vec!["1) ada", "2) Grace Hopper", "3) user3"]);

        assert_eq!(select_profile(&profiles, Some("ada"), false).unwrap().unwrap().id, "ada");
        assert!(select_profile(&profiles, None, false).unwrap().is_none());
        assert!(select_profile(&[], Some("ada"), false).unwrap().is_none());
    }

    #[test]
    fn test_build_letter() {
        let sections = parse_letter_sections(LETTER_MD);
        let profile = ada();
        let tex = build_letter(
            &Template::new(TEMPLATE),
            &sections,
            Some(&profile),
            &settings("2025-10-22_Senior_Engineer_Acme", Language::De),
        );

        assert!(tex.contains(r"\name{Ada Lovelace}"));
        assert!(tex.contains(r"\phone+44 20 7946 \tel+44207946"));
        assert!(tex.contains(r"\recipient{Acme - Senior Engineer}"));
        assert!(tex.contains(r"\date7. März 2025"));
        assert!(tex.contains(r"\includegraphics{figures/ada.png}"));
        assert!(tex.contains("Sehr geehrte Frau Weber,\n"));
        assert!(tex.contains(r"I bring 100\% commitment to R\&D\_work."));
        assert!(tex.contains("Position: Senior Engineer\n"));
        assert!(tex.contains("Mit freundlichen Grüßen"));
        assert!(tex.contains("% {{MAIN_FONT_SETUP}} is replaced below"));
        assert!(tex.contains(r"\IfFontExistsTF{Lato}"));
        assert!(!tex.contains("{{COMPANY_ADDRESS}}"));
    }

    #[test]
    fn test_build_letter_without_profile_or_sections() {
        let tex = build_letter(
            &Template::new(TEMPLATE),
            &SectionMap::new(),
            None,
            &settings("letter", Language::En),
        );
        assert!(tex.contains("Dear Hiring Manager,\n"));
        assert!(tex.contains(r"\name{}"));
        assert!(tex.contains("Kind regards"));
        assert!(tex.contains(r"\includegraphics{figures/profile-pic.png}"));
        assert!(tex.contains("Position: letter\n"));
    }

    #[test]
    fn test_build_letter_is_deterministic() {
        let sections = parse_letter_sections(LETTER_MD);
        let profile = ada();
        let settings = settings("Acme_DE", Language::De);
        let template = Template::new(TEMPLATE);
        assert_eq!(
            build_letter(&template, &sections, Some(&profile), &settings),
            build_letter(&template, &sections, Some(&profile), &settings)
        );
    }

    #[test]
    fn test_build_letter_custom_font() {
        let mut settings = settings("letter", Language::En);
        settings.font = Some("Inter".to_string());
        let tex = build_letter(&Template::new(TEMPLATE), &SectionMap::new(), None, &settings);
        assert!(tex.contains("\\setmainfont{Inter}[Scale=1.00]\n"));
    }

    fn project(temp_dir: &TempDir) -> Paths {
        let root = temp_dir.path();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("templates").join("cover_letter_modern.tex"), TEMPLATE).unwrap();
        fs::create_dir_all(root.join("content")).unwrap();
        fs::write(
            root.join("user_info.yml"),
            "- id: ada\n  full_name: Ada Lovelace\n",
        )
        .unwrap();
        Paths::resolve(
            Some(&root.join("templates")),
            Some(&root.join("applications")),
            Some(&root.join("user_info.yml")),
        )
    }

    fn options(temp_dir: &TempDir) -> LetterOptions {
        LetterOptions {
            file: None,
            content_dir: temp_dir.path().join("content"),
            user: Some("ada".to_string()),
            template: "modern".to_string(),
            date: Some("1. Januar 2025".to_string()),
            font: None,
            yes: true,
            dry_run: false,
        }
    }

    #[test]
    fn test_run_batch_writes_letters_and_skips_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = project(&temp_dir);
        let content = temp_dir.path().join("content");
        fs::write(content.join("Acme_DE.md"), LETTER_MD).unwrap();
        fs::write(content.join("empty.md"), "# nothing here").unwrap();

        let report = run(&paths, &options(&temp_dir)).unwrap();

        assert_eq!(report.generated().len(), 1);
        assert_eq!(report.skipped(), 1);
        let written = fs::read_to_string(paths.output("Acme_DE.tex")).unwrap();
        assert!(written.contains(r"\name{Ada Lovelace}"));
        assert!(written.contains(r"\date1. Januar 2025"));
    }

    #[test]
    fn test_run_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = project(&temp_dir);
        fs::write(temp_dir.path().join("content").join("Acme.md"), LETTER_MD).unwrap();

        let mut options = options(&temp_dir);
        options.dry_run = true;
        let report = run(&paths, &options).unwrap();

        assert_eq!(report.planned(), &[paths.output("Acme.tex")]);
        assert!(!paths.output_dir.exists());
    }

    #[test]
    fn test_run_errors() {
        let temp_dir = TempDir::new().unwrap();
        let paths = project(&temp_dir);

        let mut missing_file = options(&temp_dir);
        missing_file.file = Some(temp_dir.path().join("nope.md"));
        assert!(matches!(run(&paths, &missing_file), Err(CvTexError::FileNotFound(_))));

        let mut no_dir = options(&temp_dir);
        no_dir.content_dir = temp_dir.path().join("absent");
        assert!(matches!(run(&paths, &no_dir), Err(CvTexError::ContentDirMissing(_))));

        fs::write(temp_dir.path().join("content").join("a.md"), LETTER_MD).unwrap();
        let mut unknown_user = options(&temp_dir);
        unknown_user.user = Some("linus".to_string());
        assert!(matches!(run(&paths, &unknown_user), Err(CvTexError::UnknownUser { .. })));

        let mut unknown_template = options(&temp_dir);
        unknown_template.template = "classic".to_string();
        assert!(matches!(
            run(&paths, &unknown_template),
            Err(CvTexError::UnknownTemplate { .. })
        ));
    }
}
