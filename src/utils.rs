//! Filesystem and console helpers shared by the commands
//!
//! - Reading Markdown sources with invisible characters removed
//! - Writing generated `.tex` files (creating the output directory)
//! - Interactive prompts

use crate::error::{CvTexError, Result};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

/// Removes characters that are invisible in an editor but break regex
/// matching or LaTeX compilation.
///
/// Line endings are normalized to `\n` first (`\r\n` and a lone `\r`).
/// Dropped: control characters other than tab and newline, DEL, zero-width
/// space/joiners and the byte order mark.
///
/// # Examples
/// ```
/// use cv_tex::utils::strip_invisible;
///
/// assert_eq!(strip_invisible("\u{FEFF}## About Me\u{200B}"), "## About Me");
/// ```
pub fn strip_invisible(content: &str) -> String {
    content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|&ch| {
            if ch == '\t' || ch == '\n' {
                return true;
            }
            !(ch < ' '
                || ch == '\x7F'
                || ch == '\u{200B}'
                || ch == '\u{200C}'
                || ch == '\u{200D}'
                || ch == '\u{FEFF}')
        })
        .collect()
}

/// Reads a Markdown source file, failing with `FileNotFound` when it is missing.
pub fn read_markdown(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CvTexError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|e| CvTexError::io(path, e))?;
    Ok(strip_invisible(&content))
}

/// Writes `content` to `path`, creating the parent directory first.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CvTexError::CreateOutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|e| CvTexError::io(path, e))
}

/// Collapses runs of whitespace into single spaces and trims the result.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when stdout is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdout().is_terminal()
}

/// Prints `question` and reads one trimmed line from stdin.
///
/// End of input is returned as an empty answer.
pub fn prompt(question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_invisible_control_chars() {
        let input = "Text\x01\x02\x03with\x7fcontrol chars";
        assert_eq!(strip_invisible(input), "Textwithcontrol chars");
    }

    #[test]
    fn test_strip_invisible_preserves_layout() {
        let input = "## Über mich\n\n\tBerlin";
        assert_eq!(strip_invisible(input), input);
    }

    #[test]
    fn test_strip_invisible_normalizes_line_endings() {
        assert_eq!(
            strip_invisible("## About Me\r\n\r\nAnalyst.\rEnd\r\n"),
            "## About Me\n\nAnalyst.\nEnd\n"
        );
    }

    #[test]
    fn test_read_markdown_crlf_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("cv.md");
        fs::write(&source, "## About Me\r\n\r\nAnalyst.\r\n").unwrap();

        assert_eq!(read_markdown(&source).unwrap(), "## About Me\n\nAnalyst.\n");
    }

    #[test]
    fn test_strip_invisible_zero_width() {
        let input = "\u{FEFF}Senior\u{200B} Engineer\u{200D}";
        assert_eq!(strip_invisible(input), "Senior Engineer");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Senior \t  Engineer \n"), "Senior Engineer");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_read_markdown_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.md");
        match read_markdown(&missing) {
            Err(CvTexError::FileNotFound(path)) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_write_output_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("src").join("applications").join("letter.tex");

        write_output(&target, "\\documentclass{letter}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "\\documentclass{letter}");
    }

    #[test]
    fn test_write_output_parent_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("applications");
        fs::write(&blocker, "not a directory").unwrap();

        let result = write_output(&blocker.join("letter.tex"), "x");
        assert!(matches!(result, Err(CvTexError::CreateOutputDir { .. })));
    }
}
