//! Console output for cv-tex
//!
//! Provides consistent, colored output for CLI operations with different log levels:
//! - INFO: General information (blue)
//! - SUCCESS: Generated files and completed steps (green)
//! - WARNING: Skipped inputs and non-critical issues (yellow)
//! - ERROR: Failures, written to stderr (red)
//! - DETAIL: Indented sub-items, hidden unless verbose output is enabled

use colored::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// Serialises output so multi-line blocks never interleave
static OUTPUT_LOCK: Mutex<()> = Mutex::new(());

static VERBOSE: AtomicBool = AtomicBool::new(true);

fn lock() -> std::sync::MutexGuard<'static, ()> {
    OUTPUT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Logger;

#[allow(dead_code)]
impl Logger {
    /// Print application header
    pub fn header(title: &str) {
        let _lock = lock();
        println!("{}", "═".repeat(60).bright_blue());
        println!(
            "  {} {}",
            title.bright_white().bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).bright_blue()
        );
        println!("{}", "═".repeat(60).bright_blue());
    }

    /// Enable or disable `detail` output.
    pub fn set_verbose(enabled: bool) {
        VERBOSE.store(enabled, Ordering::Relaxed);
    }

    pub fn is_verbose() -> bool {
        VERBOSE.load(Ordering::Relaxed)
    }

    pub fn info(message: &str) {
        let _lock = lock();
        println!("  {} {}", "●".bright_blue(), message);
    }

    pub fn success(message: &str) {
        let _lock = lock();
        println!("  {} {}", "✓".bright_green(), message.bright_white());
    }

    pub fn warning(message: &str) {
        let _lock = lock();
        println!("  {} {}", "⚠".bright_yellow(), message.yellow());
    }

    /// Print an error message to stderr
    pub fn error(message: &str) {
        let _lock = lock();
        eprintln!("  {} {}", "✗".bright_red(), message.red());
    }

    /// Print a progress/step message
    pub fn progress(step: &str, message: &str) {
        let _lock = lock();
        println!("\n  {} {}", step.bright_cyan().bold(), message.bright_white());
    }

    /// Print a sub-item message (indented)
    pub fn detail(message: &str) {
        if !Self::is_verbose() {
            return;
        }
        let _lock = lock();
        println!("    · {}", message.bright_black());
    }

    pub fn separator() {
        let _lock = lock();
        println!("{}", "  ─".repeat(20).bright_black());
    }

    pub fn file_operation(operation: &str, path: &Path) {
        Self::detail(&format!("{}: {}", operation, path.display()));
    }

    pub fn rename(from: &Path, to: &Path) {
        let _lock = lock();
        println!(
            "    {} {} {}",
            from.display().to_string().bright_blue(),
            "→".bright_black(),
            to.display().to_string().bright_green()
        );
    }

    pub fn stats(label: &str, value: &str) {
        let _lock = lock();
        println!("    {} {}", label.bright_white(), value.bright_cyan());
    }

    /// Print a batch completion summary
    pub fn batch_complete(successful: usize, skipped: usize, failed: usize, operation: &str) {
        let _lock = lock();
        println!("\n  {} Completed {}:", "✓".bright_green(), operation);
        println!("    {} {} generated", "✓".bright_green(), successful.to_string().bright_green());
        if skipped > 0 {
            println!("    {} {} skipped", "⚠".bright_yellow(), skipped.to_string().bright_yellow());
        }
        if failed > 0 {
            println!("    {} {} failed", "✗".bright_red(), failed.to_string().bright_red());
        }
    }

    /// Print detailed failure list with error messages
    pub fn batch_failures(failures: &[(String, String)]) {
        if failures.is_empty() {
            return;
        }

        let _lock = lock();
        eprintln!("\n  {} Failed files:", "✗".bright_red().bold());
        for (i, (file, error)) in failures.iter().enumerate() {
            eprintln!(
                "    {}. {} {}",
                (i + 1).to_string().bright_red(),
                file.bright_white(),
                "→".bright_black()
            );
            eprintln!("       {}", error.red());
        }
    }
}
