//! Directory layout of a document project.
//!
//! Every path is relative to the working directory unless overridden on the
//! command line or through the environment (a `.env` file is honoured).

use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATES_DIR: &str = "src/templates";
pub const DEFAULT_OUTPUT_DIR: &str = "src/applications";
pub const DEFAULT_CONTENT_DIR: &str = "src/content";
pub const DEFAULT_PROFILES_FILE: &str = "user_info.yml";

#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub profiles_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            profiles_file: PathBuf::from(DEFAULT_PROFILES_FILE),
        }
    }
}

impl Paths {
    /// Builds the layout from optional overrides, falling back to the defaults.
    pub fn resolve(
        templates_dir: Option<&Path>,
        output_dir: Option<&Path>,
        profiles_file: Option<&Path>,
    ) -> Self {
        let defaults = Paths::default();
        Paths {
            templates_dir: templates_dir.map(Path::to_path_buf).unwrap_or(defaults.templates_dir),
            output_dir: output_dir.map(Path::to_path_buf).unwrap_or(defaults.output_dir),
            profiles_file: profiles_file.map(Path::to_path_buf).unwrap_or(defaults.profiles_file),
        }
    }

    pub fn template(&self, file_name: &str) -> PathBuf {
        self.templates_dir.join(file_name)
    }

    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Loads a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}
