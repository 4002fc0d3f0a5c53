use crate::commands::cv::CvOptions;
use crate::commands::letter::LetterOptions;
use crate::commands::normalize::NormalizeOptions;
use crate::config::DEFAULT_CONTENT_DIR;
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cv-tex",
    version,
    about = "Generate LaTeX cover letters and CVs from structured Markdown.",
    long_about = r#"cv-tex turns sectioned Markdown sources into LaTeX documents ready for
compilation with your usual TeX toolchain.

FEATURES:
- Cover letters from <!-- LABEL --> \lettercontent{...} paragraphs
- CVs from ## Heading sections, written in English or German
- User profiles (name, contact details, images) from user_info.yml
- Recipient, company and role derived from dated file names
- German or English dates and closing salutations
- Optional custom main font through fontspec
- Repair of .md file names with trailing whitespace or invisible characters

No LaTeX is compiled and no LaTeX syntax is validated."#,
    after_help = r##"EXAMPLES:

COVER LETTERS:
    cv-tex letter                                           # Every *.md in src/content
    cv-tex letter src/content/2025-10-22_Senior_Engineer_Acme.md
    cv-tex letter --user ada --template engineering -y      # No prompts
    cv-tex letter --date "1. März 2025" --font "Inter"
    cv-tex letter --dry-run                                 # Show what would be written

CVS:
    cv-tex cv src/content/cv-ada_de.md                      # User 'ada' derived from file name
    cv-tex cv resume.md --user ada --template luxsleek

FILE NAMES:
    cv-tex normalize --dry-run                              # Preview renames below the current directory
    cv-tex normalize --roots notes drafts --verbose

NOTES:
- Templates are read from src/templates, output goes to src/applications
- user_info.yml is searched in the current directory and up to three parents
- Variables may also be set in a .env file in the working directory"##
)]
pub struct Cli {
    /// Directory holding the LaTeX templates
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        global = true,
        env = "CV_TEX_TEMPLATES_DIR",
        help = "Directory holding the LaTeX templates [default: src/templates]"
    )]
    pub templates_dir: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        global = true,
        env = "CV_TEX_OUTPUT_DIR",
        help = "Output directory for generated .tex files [default: src/applications]",
        long_help = r#"Set the output directory for generated .tex files.

The directory is created if it does not exist. Failing to create it stops
the whole run.

EXAMPLES:
  -o build/                # Write into 'build'
  --output-dir out/tex     # Nested directories are created as needed"#
    )]
    pub output_dir: Option<PathBuf>,

    /// Profile store
    #[arg(
        long = "profiles",
        value_name = "FILE",
        global = true,
        env = "CV_TEX_PROFILES",
        help = "Path to the user profile store [default: user_info.yml]"
    )]
    pub profiles: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate cover letters from Markdown.
    ///
    /// Each source tags its paragraphs with a marker comment followed by a
    /// `\lettercontent{...}` macro. The paragraphs, the selected user
    /// profile and values derived from the file name fill the letter
    /// template.
    #[command(
        about = "Generate cover letters from Markdown",
        long_about = r#"Generate cover letters from Markdown sources.

A source tags every paragraph like this:

  <!-- SALUTATION -->
  \lettercontent{Dear Ms. Smith,}

  <!-- PARAGRAPH_1_INTRODUCTION -->
  \lettercontent{...}

Without FILE, every *.md in the content directory is processed in sorted
order. Per-file failures are reported at the end and do not stop the batch.

INTERACTIVE MODE:
  When stdout is a terminal and --yes is not given, cv-tex asks for a
  profile if none was given, for the output name (Enter keeps the
  suggestion, SKIP skips the file) and before overwriting a file.

FILE NAMES:
  2025-10-22_Senior_Engineer_Acme.md → company 'Acme', role 'Senior Engineer'
  A _DE or -ENG suffix selects the letter language when the front matter
  does not."#
    )]
    Letter {
        /// Single Markdown source
        #[arg(value_name = "FILE", help = "Markdown source; all *.md in the content directory when omitted")]
        file: Option<PathBuf>,

        #[arg(
            long,
            value_name = "DIR",
            default_value = DEFAULT_CONTENT_DIR,
            help = "Directory scanned when no FILE is given"
        )]
        content_dir: PathBuf,

        #[arg(short = 'u', long, value_name = "ID", env = "USER_PROFILE", help = "Profile id from the profile store")]
        user: Option<String>,

        #[arg(
            long,
            value_name = "NAME",
            env = "TEMPLATE",
            default_value = "modern",
            help = "Letter template: modern (default) or engineering"
        )]
        template: String,

        #[arg(long, value_name = "TEXT", help = "Letter date [default: today, localized]")]
        date: Option<String>,

        #[arg(long, value_name = "NAME", env = "FONT", help = "Main font family, e.g. \"Inter\"")]
        font: Option<String>,

        #[arg(
            short = 'y',
            long,
            env = "YES",
            value_parser = FalseyValueParser::new(),
            help = "Never prompt; overwrite existing files"
        )]
        yes: bool,

        #[arg(
            long,
            env = "DRY_RUN",
            value_parser = FalseyValueParser::new(),
            help = "Show planned output without writing files"
        )]
        dry_run: bool,
    },

    /// Generate a CV from Markdown.
    #[command(
        about = "Generate a CV from Markdown",
        long_about = r#"Generate a CV from a Markdown source with ## Heading sections.

English and German headings are accepted (About Me / Über mich,
Experience / Berufserfahrung, ...). A _de or -en suffix on the file name
selects the language of titles and labels.

TEMPLATES:
  hipster (default): two-column layout with proficiency circles
  luxsleek: single column with a sidebar

USER:
  Without --user, the id is taken from the file name: cv-ada-lovelace_de.md
  uses profile 'ada' when it exists.

OUTPUT:
  CV_<user>_<template>.tex in the output directory"#
    )]
    Cv {
        #[arg(value_name = "FILE", help = "Markdown CV source")]
        file: PathBuf,

        #[arg(short = 'u', long, value_name = "ID", help = "Profile id from the profile store")]
        user: Option<String>,

        #[arg(
            long,
            value_name = "NAME",
            default_value = "hipster",
            help = "CV template: hipster (default) or luxsleek"
        )]
        template: String,

        #[arg(long, value_name = "NAME", env = "FONT", help = "Main font family, e.g. \"Source Sans 3\"")]
        font: Option<String>,
    },

    /// Repair `.md` file names with trailing whitespace or invisible characters.
    #[command(
        about = "Normalize .md file names recursively",
        long_about = r#"Rename .md files whose names carry trailing spaces, dots, tabs,
line breaks, zero-width spaces or byte order marks before the extension.

  'resume   .md'  → 'resume.md'
  'notes. .MD'    → 'notes.md'

When the target exists, -1, -2, ... is appended to the stem."#
    )]
    Normalize {
        #[arg(
            long,
            value_name = "DIR",
            num_args = 1..,
            help = "Root directories to walk [default: current directory]"
        )]
        roots: Vec<PathBuf>,

        #[arg(long, help = "Show planned renames without applying them")]
        dry_run: bool,

        #[arg(long, help = "Print roots, collisions and every rename")]
        verbose: bool,
    },
}

/// A parsed subcommand turned into the options of its command.
#[derive(Debug, Clone)]
pub enum Action {
    Letter(LetterOptions),
    Cv(CvOptions),
    Normalize(NormalizeOptions),
}

impl Commands {
    pub fn into_action(self) -> Action {
        match self {
            Commands::Letter {
                file,
                content_dir,
                user,
                template,
                date,
                font,
                yes,
                dry_run,
            } => Action::Letter(LetterOptions {
                file,
                content_dir,
                user,
                template,
                date,
                font,
                yes,
                dry_run,
            }),
            Commands::Cv {
                file,
                user,
                template,
                font,
            } => Action::Cv(CvOptions {
                file,
                user,
                template,
                font,
            }),
            Commands::Normalize {
                roots,
                dry_run,
                verbose,
            } => Action::Normalize(NormalizeOptions {
                roots,
                dry_run,
                verbose,
            }),
        }
    }
}
