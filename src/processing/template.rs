//! Placeholder substitution for LaTeX templates.
//!
//! Templates reference values as `{{TOKEN}}` (inline) or `{{{TOKEN}}}`
//! (inside a macro argument, replaced by `{value}`). Lines whose first
//! non-blank character is `%` are LaTeX comments and are never touched by
//! token filling.

use super::escape::latex_escape;
use crate::error::{CvTexError, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// A value bound to a template token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Free text, LaTeX-escaped on insertion.
    Text(String),
    /// A pre-rendered LaTeX fragment, inserted verbatim.
    Raw(String),
}

impl TokenValue {
    pub fn text(value: impl Into<String>) -> Self {
        TokenValue::Text(value.into())
    }

    pub fn raw(value: impl Into<String>) -> Self {
        TokenValue::Raw(value.into())
    }

    pub fn render(&self) -> String {
        match self {
            TokenValue::Text(text) => latex_escape(text),
            TokenValue::Raw(raw) => raw.clone(),
        }
    }
}

pub type TokenMap = BTreeMap<String, TokenValue>;

/// Letter tokens that are blanked instead of being left in place.
pub const OPTIONAL_LETTER_TOKENS: &[&str] = &[
    "COMPANY_ADDRESS",
    "COMPANY_CITY",
    "COMPANY_ZIP",
    "COMPANY_NAME",
];

/// Optional letter tokens blanked in their double-brace form only.
pub const OPTIONAL_LETTER_PLACEHOLDERS: &[&str] = &[
    "YOUR_TAGLINE_OR_EDUCATION",
    "YOUR_LINKEDIN",
    "YOUR_LINKEDIN_URL",
    "YOUR_PHONE_TEL",
];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{([^}]+)\}\}\}|\{\{([^}]+)\}\}").expect("placeholder pattern is valid")
});
static TEXTBACKSLASH_ESCAPED_AMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\textbackslash\{\}\\&").expect("ampersand pattern is valid")
});
static BACKSLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\){3,}").expect("backslash pattern is valid"));
static LINEBREAK_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\,\s*").expect("linebreak comma pattern is valid"));
static BRACE_LINEBREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\\\\\s*").expect("brace linebreak pattern is valid"));

/// True for lines that only hold a LaTeX comment.
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('%')
}

fn map_code_lines(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if is_comment_line(line) {
            out.push_str(line);
        } else {
            out.push_str(&f(line));
        }
    }
    out
}

/// Substitutes every known token on non-comment lines in a single pass.
///
/// Unknown tokens are left in place. Inserted values are never rescanned,
/// so the result does not depend on the order of `tokens`.
pub fn fill_tokens(text: &str, tokens: &TokenMap) -> String {
    map_code_lines(text, |line| {
        PLACEHOLDER
            .replace_all(line, |caps: &Captures| {
                let (name, triple) = match (caps.get(1), caps.get(2)) {
                    (Some(name), _) => (name.as_str().trim(), true),
                    (None, Some(name)) => (name.as_str().trim(), false),
                    (None, None) => return caps[0].to_string(),
                };
                match tokens.get(name) {
                    Some(value) if triple => format!("{{{}}}", value.render()),
                    Some(value) => value.render(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    })
}

/// Replaces `{{{token}}}` with `{value}` and `{{token}}` with `value`
/// everywhere, comment lines included. `value` is inserted as given.
pub fn replace_token(text: &str, token: &str, value: &str) -> String {
    text.replace(&format!("{{{{{{{}}}}}}}", token), &format!("{{{}}}", value))
        .replace(&format!("{{{{{}}}}}", token), value)
}

/// Like [`replace_token`], also matching the forms whose underscores were
/// escaped to `\_` by an earlier pass.
pub fn replace_token_variants(text: &str, token: &str, value: &str) -> String {
    let escaped = token.replace('_', "\\_");
    let text = replace_token(text, token, value);
    replace_token(&text, &escaped, value)
}

/// Blanks the optional letter tokens that are still unresolved.
pub fn blank_optional_tokens(text: &str) -> String {
    let mut out = text.to_string();
    for token in OPTIONAL_LETTER_TOKENS {
        out = out.replace(&format!("{{{{{}}}}}", token), "");
        out = out.replace(&format!("{{{{{{{}}}}}}}", token), "");
    }
    for token in OPTIONAL_LETTER_PLACEHOLDERS {
        out = out.replace(&format!("{{{{{}}}}}", token), "");
    }
    out
}

/// Escapes every `_` not already preceded by a backslash on non-comment lines.
pub fn escape_bare_underscores(text: &str) -> String {
    map_code_lines(text, |line| {
        let mut out = String::with_capacity(line.len());
        let mut previous = None;
        for ch in line.chars() {
            if ch == '_' && previous != Some('\\') {
                out.push('\\');
            }
            out.push(ch);
            previous = Some(ch);
        }
        out
    })
}

/// Reduces the ampersand artifacts of escaping back to `\&`.
pub fn fix_ampersands(text: &str) -> String {
    let out = TEXTBACKSLASH_ESCAPED_AMP.replace_all(text, "\\&");
    out.replace("\\textbackslash{}&", "\\&").replace("\\\\&", "\\&")
}

/// Cleans up line-break artifacts left by blank fields.
///
/// Runs of three or more backslashes collapse to one, `\\,` and `{\\`
/// (with trailing whitespace) are dropped, and any remaining `\,` removed.
pub fn clean_backslashes(text: &str) -> String {
    let out = BACKSLASH_RUN.replace_all(text, "\\");
    let out = LINEBREAK_COMMA.replace_all(&out, "");
    let out = BRACE_LINEBREAK.replace_all(&out, "{");
    let out = out.replace("\\,", "");
    BACKSLASH_RUN.replace_all(&out, "\\").into_owned()
}

/// An immutable template; filling produces new text.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Template { text: text.into() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CvTexError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| CvTexError::io(path, e))?;
        Ok(Template { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fill(&self, tokens: &TokenMap) -> String {
        fill_tokens(&self.text, tokens)
    }
}
