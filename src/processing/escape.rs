//! LaTeX escaping for free text taken from Markdown or user profiles.

/// Escapes the LaTeX special characters in `text`.
///
/// The input is scanned once and every character is mapped on its own, so
/// a backslash produced by one escape is never escaped again. An `\&` that
/// is already present in the input stays `\&`.
///
/// # Examples
/// ```
/// use cv_tex::processing::escape::latex_escape;
///
/// assert_eq!(latex_escape("50%"), "50\\%");
/// assert_eq!(latex_escape("C++ & Go"), "C++ \\& Go");
/// assert_eq!(latex_escape("R\\&D"), "R\\&D");
/// ```
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'&') => {
                chars.next();
                out.push_str("\\&");
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_percent_and_ampersand() {
        assert_eq!(latex_escape("50%"), r"50\%");
        assert_eq!(latex_escape("C++ & Go"), r"C++ \& Go");
    }

    #[test]
    fn test_escape_every_special_character() {
        assert_eq!(latex_escape("$5"), r"\$5");
        assert_eq!(latex_escape("#1"), r"\#1");
        assert_eq!(latex_escape("snake_case"), r"snake\_case");
        assert_eq!(latex_escape("{x}"), r"\{x\}");
        assert_eq!(latex_escape("~/bin"), r"\textasciitilde{}/bin");
        assert_eq!(latex_escape("2^10"), r"2\textasciicircum{}10");
        assert_eq!(latex_escape(r"C:\Users"), r"C:\textbackslash{}Users");
    }

    #[test]
    fn test_inserted_backslashes_are_not_escaped_again() {
        let escaped = latex_escape("100% & more_stuff");
        assert_eq!(escaped, r"100\% \& more\_stuff");
        assert!(!escaped.contains("textbackslash"));
    }

    #[test]
    fn test_escaped_braces_of_textbackslash_are_literal() {
        // The braces emitted by \textbackslash{} must not be escaped themselves
        assert_eq!(latex_escape(r"a\b"), r"a\textbackslash{}b");
    }

    #[test]
    fn test_pre_escaped_ampersand_is_kept() {
        assert_eq!(latex_escape(r"R\&D"), r"R\&D");
        assert_eq!(latex_escape(r"R\&D & QA"), r"R\&D \& QA");
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(latex_escape("path\\"), r"path\textbackslash{}");
    }

    #[test]
    fn test_plain_and_unicode_text_unchanged() {
        assert_eq!(latex_escape(""), "");
        assert_eq!(latex_escape("Mit freundlichen Grüßen"), "Mit freundlichen Grüßen");
    }
}
