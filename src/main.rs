use clap::Parser;
use cv_tex::cli::{Action, Cli};
use cv_tex::commands::{cv, letter, normalize};
use cv_tex::config::{self, Paths};
use cv_tex::{Logger, Result};

fn run(cli: Cli) -> Result<()> {
    let paths = Paths::resolve(
        cli.templates_dir.as_deref(),
        cli.output_dir.as_deref(),
        cli.profiles.as_deref(),
    );

    match cli.command.into_action() {
        Action::Letter(options) => {
            letter::run(&paths, &options)?;
        }
        Action::Cv(options) => {
            cv::run(&paths, &options)?;
        }
        Action::Normalize(options) => {
            normalize::run(&options);
        }
    }
    Ok(())
}

fn main() {
    config::load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        Logger::error(&e.to_string());
        std::process::exit(1);
    }
}
