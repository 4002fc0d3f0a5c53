//! Markdown-to-LaTeX building blocks used by the commands.

pub mod escape;
pub mod fields;
pub mod heuristics;
pub mod profile;
pub mod render;
pub mod sections;
pub mod template;
