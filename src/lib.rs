//! # cv-tex
//!
//! Turns structured Markdown into LaTeX cover letters and CVs:
//! - Section extraction from `## Heading` blocks and `\lettercontent{...}` paragraphs
//! - Field parsers for skills, experience, certifications, languages and publications
//! - LaTeX escaping and `{{TOKEN}}` template filling
//! - User profiles from a YAML store
//! - Repair of `.md` file names with trailing junk

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod processing;
pub mod utils;

pub use error::{CvTexError, Result};
pub use logger::Logger;
