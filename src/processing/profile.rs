//! User profiles from `user_info.yml`.
//!
//! The store is a YAML list of maps, each with an `id`. Scalars of any type
//! are read as strings so that phone numbers or birth years written as bare
//! numbers still work. Documents that are not valid YAML are read with a
//! minimal `- key: value` line parser instead.

use crate::error::{CvTexError, Result};
use crate::logger::Logger;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const PARENT_SEARCH_DEPTH: usize = 3;
const LINKEDIN_PROFILE_BASE: &str = "https://www.linkedin.com/in/";

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?|mailto):").expect("scheme pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct UserProfile {
    pub id: String,
    fields: BTreeMap<String, String>,
}

impl From<BTreeMap<String, Value>> for UserProfile {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let fields = raw
            .into_iter()
            .filter_map(|(key, value)| Some((key, scalar_to_string(&value)?)))
            .collect();
        UserProfile::new(fields)
    }
}

impl UserProfile {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        let id = fields.get("id").cloned().unwrap_or_default();
        UserProfile { id, fields }
    }

    /// Field value, or an empty string when the field is absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Name used in listings: `id`, then `full_name`.
    pub fn display_name(&self) -> &str {
        self.non_empty("id")
            .or_else(|| self.non_empty("full_name"))
            .unwrap_or_default()
    }

    /// Dialable phone number: `phone_tel`, else `phone` reduced to digits and `+`.
    pub fn phone_tel(&self) -> String {
        match self.non_empty("phone_tel") {
            Some(tel) => tel.to_string(),
            None => self
                .get("phone")
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect(),
        }
    }

    pub fn linkedin_label(&self) -> &str {
        self.non_empty("linkedin_label")
            .unwrap_or_else(|| self.get("linkedin"))
    }

    /// Absolute LinkedIn URL built from `linkedin_url`, `linkedin_url_override`
    /// or `linkedin`, in that order.
    pub fn linkedin_url(&self) -> String {
        let raw = self
            .non_empty("linkedin_url")
            .or_else(|| self.non_empty("linkedin_url_override"))
            .unwrap_or_else(|| self.get("linkedin"));
        if raw.is_empty() || URL_SCHEME.is_match(raw) {
            return raw.to_string();
        }
        let handle = raw.trim_start_matches(['@', '/']).trim_end_matches('/');
        format!("{}{}", LINKEDIN_PROFILE_BASE, handle)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn profiles_from_yaml(document: Value) -> Vec<UserProfile> {
    let Value::Sequence(entries) = document else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter(Value::is_mapping)
        .filter_map(|entry| serde_yaml::from_value::<UserProfile>(entry).ok())
        .collect()
}

/// Reads a plain `- key: value` list of maps without a YAML parser.
pub fn parse_profiles_minimal(content: &str) -> Vec<UserProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<BTreeMap<String, String>> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let pair = if let Some(rest) = line.trim_start().strip_prefix("- ") {
            if let Some(done) = current.take() {
                profiles.push(UserProfile::new(done));
            }
            current = Some(BTreeMap::new());
            rest
        } else if current.is_some() {
            line
        } else {
            continue;
        };

        if let (Some(fields), Some((key, value))) = (current.as_mut(), pair.split_once(':')) {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    if let Some(done) = current {
        profiles.push(UserProfile::new(done));
    }
    profiles
}

/// Parses the profile store, falling back to the line parser on invalid YAML.
pub fn parse_profiles(content: &str) -> Vec<UserProfile> {
    match serde_yaml::from_str::<Value>(content) {
        Ok(document) => profiles_from_yaml(document),
        Err(e) => {
            Logger::detail(&format!("Profile store is not valid YAML ({}), using line parser", e));
            parse_profiles_minimal(content)
        }
    }
}

/// Finds the profile store: `path` itself, then `path` below `start_dir` and
/// up to three of its parents.
pub fn locate_profiles(path: &Path, start_dir: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    start_dir
        .ancestors()
        .take(PARENT_SEARCH_DEPTH + 1)
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.exists())
}

/// Loads all profiles. A missing store yields no profiles.
pub fn load_profiles(path: &Path) -> Result<Vec<UserProfile>> {
    let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let Some(found) = locate_profiles(path, &start_dir) else {
        Logger::detail(&format!("No profile store found at {}", path.display()));
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(&found).map_err(|e| CvTexError::io(&found, e))?;
    Ok(parse_profiles(&content))
}

pub fn find_profile<'a>(profiles: &'a [UserProfile], id: &str) -> Option<&'a UserProfile> {
    profiles.iter().find(|p| p.id == id)
}

pub fn profile_ids(profiles: &[UserProfile]) -> Vec<String> {
    profiles.iter().map(|p| p.id.clone()).collect()
}

/// Looks up `id`, failing with the list of known ids.
pub fn require_profile<'a>(profiles: &'a [UserProfile], id: &str) -> Result<&'a UserProfile> {
    find_profile(profiles, id).ok_or_else(|| CvTexError::UnknownUser {
        id: id.to_string(),
        available: profile_ids(profiles),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STORE: &str = "\
- id: ada
  full_name: Ada Lovelace
  phone: +44 (0) 20 7946 0958
  birth_year: 1815
  linkedin: \"@ada-lovelace/\"
- id: grace
  full_name: Grace Hopper
  phone_tel: \"+15550100\"
  linkedin_url: https://example.org/grace
";

    fn profile(pairs: &[(&str, &str)]) -> UserProfile {
        UserProfile::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_profiles_yaml() {
        let profiles = parse_profiles(STORE);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "ada");
        assert_eq!(profiles[0].get("birth_year"), "1815");
        assert_eq!(profiles[0].get("missing"), "");
        assert_eq!(profiles[1].get("full_name"), "Grace Hopper");
    }

    #[test]
    fn test_parse_profiles_not_a_list() {
        assert!(parse_profiles("id: ada\n").is_empty());
        assert!(parse_profiles("").is_empty());
    }

    #[test]
    fn test_parse_profiles_invalid_yaml_falls_back() {
        let content = "- id: ada\n  full_name: Ada: Countess\n\t bad: [\n- id: grace\n";
        let profiles = parse_profiles(content);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].get("full_name"), "Ada: Countess");
        assert_eq!(profiles[1].id, "grace");
    }

    #[test]
    fn test_parse_profiles_minimal() {
        let content = "# people\nstray: line\n- id: ada\n  email: ada@example.org\n\n- id: grace\n";
        let profiles = parse_profiles_minimal(content);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].get("email"), "ada@example.org");
        assert_eq!(profiles[0].get("stray"), "");
    }

    #[test]
    fn test_phone_tel() {
        let profiles = parse_profiles(STORE);
        assert_eq!(profiles[0].phone_tel(), "+4402079460958");
        assert_eq!(profiles[1].phone_tel(), "+15550100");
        assert_eq!(UserProfile::default().phone_tel(), "");
    }

    #[test]
    fn test_linkedin_url() {
        let profiles = parse_profiles(STORE);
        assert_eq!(profiles[0].linkedin_url(), "https://www.linkedin.com/in/ada-lovelace");
        assert_eq!(profiles[1].linkedin_url(), "https://example.org/grace");

        let override_only = profile(&[("linkedin_url_override", "mailto:me@example.org")]);
        assert_eq!(override_only.linkedin_url(), "mailto:me@example.org");
        assert_eq!(UserProfile::default().linkedin_url(), "");
    }

    #[test]
    fn test_linkedin_label_and_display_name() {
        let p = profile(&[("linkedin", "ada"), ("linkedin_label", "Ada on LinkedIn"), ("full_name", "Ada")]);
        assert_eq!(p.linkedin_label(), "Ada on LinkedIn");
        assert_eq!(p.display_name(), "Ada");
        assert_eq!(profile(&[("linkedin", "ada")]).linkedin_label(), "ada");
    }

    #[test]
    fn test_locate_profiles_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("user_info.yml"), STORE).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = locate_profiles(Path::new("user_info.yml"), &nested).unwrap();
        assert_eq!(found, temp_dir.path().join("user_info.yml"));
    }

    #[test]
    fn test_locate_profiles_depth_limit() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("user_info.yml"), STORE).unwrap();
        let deep = temp_dir.path().join("a").join("b").join("c").join("d");
        fs::create_dir_all(&deep).unwrap();

        assert!(locate_profiles(Path::new("user_info.yml"), &deep).is_none());
    }

    #[test]
    fn test_load_profiles_missing_store() {
        let temp_dir = TempDir::new().unwrap();
        let profiles = load_profiles(&temp_dir.path().join("nobody.yml")).unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_require_profile() {
        let profiles = parse_profiles(STORE);
        assert_eq!(require_profile(&profiles, "grace").unwrap().id, "grace");
        match require_profile(&profiles, "linus") {
            Err(CvTexError::UnknownUser { id, available }) => {
                assert_eq!(id, "linus");
                assert_eq!(available, vec!["ada".to_string(), "grace".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
