//! Error type shared by all commands.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CvTexError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("User profile '{id}' not found. Available: {}", .available.join(", "))]
    UnknownUser { id: String, available: Vec<String> },

    #[error("Could not determine user ID. Please specify with --user. Available: {}", .available.join(", "))]
    MissingUserId { available: Vec<String> },

    #[error("Unknown template '{name}'. Available: {}", .available.join(", "))]
    UnknownTemplate {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("{} directory not found", .0.display())]
    ContentDirMissing(PathBuf),

    #[error("No markdown files found in {}", .0.display())]
    NoMarkdownFiles(PathBuf),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CvTexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CvTexError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors that must stop a batch instead of being recorded per file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CvTexError::CreateOutputDir { .. })
    }
}

pub type Result<T> = std::result::Result<T, CvTexError>;
