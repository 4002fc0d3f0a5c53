//! `normalize` command: renames `.md` files whose names carry trailing
//! whitespace or invisible characters before the extension.

use crate::logger::Logger;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TRAILING_JUNK: &[char] = &[
    ' ', '.', '\t', '\n', '\r', '\x0b', '\x0c', '\u{200B}', '\u{FEFF}',
];

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub roots: Vec<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Planned renames and the ones that failed when applied.
#[derive(Debug, Default)]
pub struct NormalizeReport {
    pub renames: Vec<Rename>,
    pub failures: Vec<(String, String)>,
}

/// Normalized form of `file_name`, or `None` when nothing changes.
///
/// The text before the last `.md` (matched case-insensitively) loses its
/// trailing junk and gets a lowercase `.md` back.
pub fn normalize_name(file_name: &str) -> Option<String> {
    let pos = file_name.to_ascii_lowercase().rfind(".md")?;
    let base = file_name[..pos].trim_end_matches(TRAILING_JUNK);
    if base.is_empty() {
        return None;
    }
    let normalized = format!("{}.md", base);
    (normalized != file_name).then_some(normalized)
}

/// First free `<stem>-N.md` next to `target`.
fn unique_target(target: &Path, taken: &HashSet<PathBuf>) -> PathBuf {
    let is_free = |candidate: &Path| !candidate.exists() && !taken.contains(candidate);
    if is_free(target) {
        return target.to_path_buf();
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    (1..)
        .map(|i| parent.join(format!("{}-{}.md", stem, i)))
        .find(|candidate| is_free(candidate))
        .unwrap_or_else(|| target.to_path_buf())
}

/// Walks every root in sorted order and plans the renames.
pub fn plan_renames(roots: &[PathBuf]) -> Vec<Rename> {
    let mut renames = Vec::new();
    let mut taken = HashSet::new();

    for root in roots {
        if !root.exists() {
            Logger::warning(&format!("Skip non-existent root: {}", root.display()));
            continue;
        }

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(new_name) = normalize_name(file_name) else {
                continue;
            };

            let from = entry.path().to_path_buf();
            let wanted = from.with_file_name(&new_name);
            let to = unique_target(&wanted, &taken);
            if to != wanted {
                Logger::detail(&format!("Collision, will use: {}", to.display()));
            }
            taken.insert(to.clone());
            renames.push(Rename { from, to });
        }
    }
    renames
}

/// Plans and, unless `dry_run` is set, applies the renames.
pub fn run(options: &NormalizeOptions) -> NormalizeReport {
    Logger::set_verbose(options.verbose);
    Logger::header("Normalize Markdown file names");

    let roots = if options.roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        options.roots.clone()
    };
    for root in &roots {
        Logger::detail(&format!("Root: {}", root.display()));
    }

    let mut report = NormalizeReport {
        renames: plan_renames(&roots),
        failures: Vec::new(),
    };

    for rename in &report.renames {
        if options.dry_run || options.verbose {
            Logger::rename(&rename.from, &rename.to);
        }
        if options.dry_run {
            continue;
        }
        if let Err(e) = fs::rename(&rename.from, &rename.to) {
            Logger::error(&format!(
                "Error renaming {} -> {}: {}",
                rename.from.display(),
                rename.to.display(),
                e
            ));
            report
                .failures
                .push((rename.from.display().to_string(), e.to_string()));
        }
    }

    if options.dry_run {
        Logger::info(&format!("Dry run: {} candidate(s) found", report.renames.len()));
    } else {
        Logger::success(&format!("Completed: {} file(s) renamed", report.renames.len()));
        Logger::batch_failures(&report.failures);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(root: &Path, dry_run: bool) -> NormalizeOptions {
        NormalizeOptions {
            roots: vec![root.to_path_buf()],
            dry_run,
            verbose: false,
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("resume   .md").as_deref(), Some("resume.md"));
        assert_eq!(normalize_name("notes. .MD").as_deref(), Some("notes.md"));
        assert_eq!(normalize_name("draft\u{200B}\u{FEFF}.md").as_deref(), Some("draft.md"));
        assert_eq!(normalize_name("a.md.md ").as_deref(), Some("a.md.md"));
        assert_eq!(normalize_name("resume.md"), None);
        assert_eq!(normalize_name("image.png"), None);
        assert_eq!(normalize_name(" .md"), None);
    }

    #[test]
    fn test_run_renames_files_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("letters");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("resume   .md"), "cv").unwrap();
        fs::write(nested.join("Acme\t.MD"), "letter").unwrap();
        fs::write(nested.join("ok.md"), "").unwrap();

        let report = run(&options(temp_dir.path(), false));

        assert_eq!(report.renames.len(), 2);
        assert!(report.failures.is_empty());
        assert_eq!(fs::read_to_string(temp_dir.path().join("resume.md")).unwrap(), "cv");
        assert_eq!(fs::read_to_string(nested.join("Acme.md")).unwrap(), "letter");
        assert!(!temp_dir.path().join("resume   .md").exists());
    }

    #[test]
    fn test_collision_with_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("resume.md"), "old").unwrap();
        fs::write(temp_dir.path().join("resume   .md"), "new").unwrap();

        run(&options(temp_dir.path(), false));

        assert_eq!(fs::read_to_string(temp_dir.path().join("resume.md")).unwrap(), "old");
        assert_eq!(fs::read_to_string(temp_dir.path().join("resume-1.md")).unwrap(), "new");
    }

    #[test]
    fn test_collision_between_planned_renames() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("resume .md"), "").unwrap();
        fs::write(temp_dir.path().join("resume  .md"), "").unwrap();

        let renames = plan_renames(&[temp_dir.path().to_path_buf()]);
        let targets: Vec<PathBuf> = renames.into_iter().map(|r| r.to).collect();
        assert_eq!(
            targets,
            vec![temp_dir.path().join("resume.md"), temp_dir.path().join("resume-1.md")]
        );
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("resume   .md"), "").unwrap();

        let report = run(&options(temp_dir.path(), true));

        assert_eq!(report.renames.len(), 1);
        assert!(temp_dir.path().join("resume   .md").exists());
        assert!(!temp_dir.path().join("resume.md").exists());
    }

    #[test]
    fn test_missing_root_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("resume   .md"), "").unwrap();

        let roots = vec![temp_dir.path().join("missing"), temp_dir.path().to_path_buf()];
        assert_eq!(plan_renames(&roots).len(), 1);
    }
}
