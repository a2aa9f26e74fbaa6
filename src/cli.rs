use std::path::PathBuf;

mod init;
mod long_questions;
mod migrate;
mod renumber;
mod report;
mod terminal;
mod validate;

use clap::ArgAction;
use init::Init;
use lessons::ContentDir;
use long_questions::LongQuestions;
use migrate::Migrate;
use renumber::Renumber;
use report::Report;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the lesson content directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Rewrite legacy records into the current schema
    ///
    /// A record is legacy if it has a `stem` field and no `question` field.
    /// Files without legacy records are not rewritten.
    Migrate(Migrate),

    /// Write the source verification report
    ///
    /// Lists the id, a preview of the question, and the source of every
    /// record, one section per collection.
    Report(Report),

    /// Check records against the current schema
    Validate(Validate),

    /// Reassign record ids from their position in a collection
    Renumber(Renumber),

    /// List questions with long prompts
    LongQuestions(LongQuestions),

    /// Write a default configuration file
    Init,
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(&root)?,
            Self::Migrate(command) => command.run(&ContentDir::open(root)?)?,
            Self::Report(command) => command.run(&ContentDir::open(root)?)?,
            Self::Validate(command) => command.run(&ContentDir::open(root)?)?,
            Self::Renumber(command) => command.run(&ContentDir::open(root)?)?,
            Self::LongQuestions(command) => command.run(&ContentDir::open(root)?)?,
        }
        Ok(())
    }
}

/// The collections named on the command line, or `default` if none were.
fn names_or(names: Vec<String>, default: &[String]) -> Vec<String> {
    if names.is_empty() {
        default.to_vec()
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn names_default_when_empty() {
        let default = vec!["money".to_string(), "social".to_string()];
        assert_eq!(names_or(Vec::new(), &default), default);
        assert_eq!(names_or(vec!["work".to_string()], &default), ["work"]);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lessons", "migrate", "money", "-vv", "--root", "data"])
            .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, PathBuf::from("data"));
        assert!(matches!(cli.command, Command::Migrate(_)));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["lessons"]).is_err());
    }
}
