//! `cv` command: a CV template filled from a sectioned Markdown file and a
//! user profile.

use crate::config::Paths;
use crate::error::{CvTexError, Result};
use crate::logger::Logger;
use crate::processing::fields::{
    parse_certifications, parse_entries, parse_languages, parse_publications, parse_skills,
    parse_specializations, resolve_interests, Certification, Entry, LanguageSkill, Publication,
    Skill,
};
use crate::processing::heuristics::{
    cv_user_candidate, detect_cv_language, hipster_font_setup, luxsleek_font_setup, Language,
};
use crate::processing::profile::{
    find_profile, load_profiles, profile_ids, require_profile, UserProfile,
};
use crate::processing::render;
use crate::processing::sections::parse_section;
use crate::processing::template::{Template, TokenMap, TokenValue};
use crate::utils::{read_markdown, write_output};
use std::path::{Path, PathBuf};

const DEFAULT_PROFILE_PICTURE: &str = "profile.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvTemplate {
    Hipster,
    LuxSleek,
}

impl CvTemplate {
    pub const NAMES: &'static [&'static str] = &["hipster", "luxsleek"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "hipster" => Ok(CvTemplate::Hipster),
            "luxsleek" => Ok(CvTemplate::LuxSleek),
            _ => Err(CvTexError::UnknownTemplate {
                name: name.to_string(),
                available: Self::NAMES.to_vec(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CvTemplate::Hipster => "hipster",
            CvTemplate::LuxSleek => "luxsleek",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            CvTemplate::Hipster => "cv_hipster_template.tex",
            CvTemplate::LuxSleek => "cv_luxsleek_template.tex",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CvOptions {
    pub file: PathBuf,
    pub user: Option<String>,
    pub template: String,
    pub font: Option<String>,
}

/// Everything parsed from a CV source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvData {
    pub language: Language,
    pub about_me: String,
    pub interests: String,
    pub specializations: Vec<String>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Entry>,
    pub education: Vec<Entry>,
    pub certifications: Vec<Certification>,
    pub publications: Vec<Publication>,
    pub languages: Vec<LanguageSkill>,
}

fn strip_rules(text: &str) -> String {
    text.replace("---", "").trim().to_string()
}

impl CvData {
    pub fn parse(content: &str, stem: &str) -> Self {
        let about_me = parse_section(content, "About Me");
        let interests = resolve_interests(content, &about_me);

        let mut publications = parse_section(content, "Publications");
        if publications.is_empty() {
            publications = parse_section(content, "Publications & Research Output");
        }

        CvData {
            language: detect_cv_language(stem),
            about_me: strip_rules(&about_me),
            interests: strip_rules(&interests),
            specializations: parse_specializations(&parse_section(content, "Specialization")),
            skills: parse_skills(&parse_section(content, "Technical Skills")),
            experience: parse_entries(&parse_section(content, "Experience")),
            education: parse_entries(&parse_section(content, "Education")),
            certifications: parse_certifications(&parse_section(content, "Certifications")),
            publications: parse_publications(&publications),
            languages: parse_languages(&parse_section(content, "Languages")),
        }
    }
}

fn insert_text(tokens: &mut TokenMap, name: &str, value: &str) {
    tokens.insert(name.to_string(), TokenValue::text(value));
}

fn insert_raw(tokens: &mut TokenMap, name: &str, value: String) {
    tokens.insert(name.to_string(), TokenValue::raw(value));
}

fn profile_picture(profile: &UserProfile) -> String {
    match profile.get("profile_pic") {
        "" => DEFAULT_PROFILE_PICTURE.to_string(),
        pic => pic.to_string(),
    }
}

fn document_title(data: &CvData, profile: &UserProfile) -> String {
    data.language.document_title(profile.get("full_name"))
}

fn luxsleek_tokens(data: &CvData, profile: &UserProfile, font: Option<&str>) -> TokenMap {
    let mut tokens = TokenMap::new();
    insert_raw(&mut tokens, "MAIN_FONT_SETUP", luxsleek_font_setup(font));
    insert_text(&mut tokens, "DOCUMENT_TITLE", &document_title(data, profile));
    for (token, key) in [
        ("FIRST_NAME", "first_name"),
        ("LAST_NAME", "last_name"),
        ("JOB_TITLE", "job_title"),
        ("EMAIL", "email"),
        ("PHONE", "phone"),
        ("LOCATION", "location"),
        ("NATIONALITY", "nationality"),
        ("BIRTH_YEAR", "birth_year"),
    ] {
        insert_text(&mut tokens, token, profile.get(key));
    }
    insert_text(&mut tokens, "ABOUT_ME", &data.about_me);
    insert_raw(&mut tokens, "INTERESTS", render::luxsleek_interests(&data.interests));
    insert_raw(&mut tokens, "PROFILE_PICTURE", profile_picture(profile));
    insert_raw(&mut tokens, "LANGUAGES_LIST", render::luxsleek_languages(&data.languages));
    insert_raw(&mut tokens, "SKILLS_LIST", render::skill_items(&data.skills));
    insert_raw(&mut tokens, "EXPERIENCE_ENTRIES", render::luxsleek_experience(&data.experience));
    insert_raw(&mut tokens, "EDUCATION_ENTRIES", render::luxsleek_education(&data.education));
    insert_raw(&mut tokens, "CERTIFICATIONS", render::certifications(&data.certifications));
    insert_raw(&mut tokens, "PUBLICATIONS_SECTION", render::publications(&data.publications));
    tokens
}

fn personal_info_labels(language: Language) -> [&'static str; 3] {
    match language {
        Language::En => ["Location", "Nationality", "Born"],
        Language::De => ["Wohnort", "Nationalität", "Geburtsjahr"],
    }
}

fn hipster_tokens(data: &CvData, profile: &UserProfile, font: Option<&str>) -> TokenMap {
    let mut tokens = TokenMap::new();
    insert_raw(&mut tokens, "MAIN_FONT_SETUP", hipster_font_setup(font));
    insert_text(&mut tokens, "DOCUMENT_TITLE", &document_title(data, profile));
    for (token, key) in [
        ("FULL_NAME", "full_name"),
        ("FIRST_NAME", "first_name"),
        ("LAST_NAME", "last_name"),
        ("JOB_TITLE", "job_title"),
    ] {
        insert_text(&mut tokens, token, profile.get(key));
    }
    insert_raw(&mut tokens, "PROFILE_PICTURE", profile_picture(profile));
    insert_text(&mut tokens, "ABOUT_ME", &data.about_me);
    insert_text(&mut tokens, "INTERESTS", &data.interests);

    let [location, nationality, born] = personal_info_labels(data.language);
    insert_raw(
        &mut tokens,
        "PERSONAL_INFO",
        render::hipster_personal_info(&[
            (location, profile.get("location")),
            (nationality, profile.get("nationality")),
            (born, profile.get("birth_year")),
        ]),
    );

    let email = profile.get("email");
    let mailto = if email.is_empty() {
        String::new()
    } else {
        format!("mailto:{}", email)
    };
    let linkedin_url = profile.linkedin_url();
    let linkedin_label = match profile.linkedin_label() {
        "" => linkedin_url.as_str(),
        label => label,
    };
    insert_raw(
        &mut tokens,
        "CONTACT_BUBBLES",
        render::hipster_contacts(&[
            (email, mailto.as_str()),
            (profile.get("phone"), ""),
            (linkedin_label, linkedin_url.as_str()),
            (profile.get("github"), profile.get("github")),
            (profile.get("website"), profile.get("website")),
        ]),
    );

    insert_raw(&mut tokens, "SPECIALIZATIONS", render::hipster_specializations(&data.specializations));
    insert_raw(&mut tokens, "TECHNICAL_SKILLS", render::hipster_skills(&data.skills));
    insert_raw(&mut tokens, "EXPERIENCE_ENTRIES", render::hipster_entries(&data.experience));
    insert_raw(&mut tokens, "EDUCATION_ENTRIES", render::hipster_entries(&data.education));
    insert_raw(&mut tokens, "CERTIFICATIONS", render::certifications(&data.certifications));
    insert_raw(&mut tokens, "LANGUAGES", render::hipster_languages(&data.languages));
    insert_raw(&mut tokens, "PUBLICATIONS_SECTION", render::publications(&data.publications));
    for unused in ["PROGRAMMING_SKILLS", "SHORT_RESUME", "TALKS_SECTION", "FOOTER_INFO"] {
        insert_raw(&mut tokens, unused, String::new());
    }
    tokens
}

/// Fills a CV template for one profile.
pub fn build_cv(
    template: &Template,
    kind: CvTemplate,
    data: &CvData,
    profile: &UserProfile,
    font: Option<&str>,
) -> String {
    let tokens = match kind {
        CvTemplate::Hipster => hipster_tokens(data, profile, font),
        CvTemplate::LuxSleek => luxsleek_tokens(data, profile, font),
    };
    template.fill(&tokens)
}

fn resolve_user_id(user: Option<&str>, stem: &str, profiles: &[UserProfile]) -> Result<String> {
    if let Some(id) = user.filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }
    let candidate = cv_user_candidate(stem);
    if find_profile(profiles, &candidate).is_some() {
        Logger::detail(&format!("User '{}' derived from file name", candidate));
        return Ok(candidate);
    }
    Err(CvTexError::MissingUserId {
        available: profile_ids(profiles),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Generates `CV_<user>_<template>.tex` and returns its path.
pub fn run(paths: &Paths, options: &CvOptions) -> Result<PathBuf> {
    if !options.file.exists() {
        return Err(CvTexError::FileNotFound(options.file.clone()));
    }

    Logger::header("CV from Markdown");
    Logger::info(&format!("Parsing CV: {}", options.file.display()));

    let kind = CvTemplate::from_name(&options.template)?;
    Logger::info(&format!("Using template: {}", kind.name()));
    if let Some(font) = &options.font {
        Logger::info(&format!("Using custom font: {}", font));
    }

    let stem = file_stem(&options.file);
    let profiles = load_profiles(&paths.profiles_file)?;
    let user_id = resolve_user_id(options.user.as_deref(), &stem, &profiles)?;
    let profile = require_profile(&profiles, &user_id)?;
    let shown = match profile.get("full_name") {
        "" => user_id.as_str(),
        name => name,
    };
    Logger::info(&format!("Using profile: {}", shown));

    let content = read_markdown(&options.file)?;
    let data = CvData::parse(&content, &stem);
    Logger::detail(&format!(
        "Parsed {} experience, {} education, {} skill entries ({})",
        data.experience.len(),
        data.education.len(),
        data.skills.len(),
        data.language.code()
    ));

    let template = Template::load(&paths.template(kind.file_name()))?;
    let tex = build_cv(&template, kind, &data, profile, options.font.as_deref());

    let output = paths.output(&format!("CV_{}_{}.tex", user_id, kind.name()));
    write_output(&output, &tex)?;
    Logger::success(&format!("Generated: {}", output.display()));
    Logger::info(&format!("Compile with: make compile FILE={}", output.display()));
    Ok(output)
}
