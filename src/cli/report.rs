use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lessons::ContentDir;
use tracing::instrument;

use super::{names_or, terminal::Colorize};

#[derive(Debug, Parser, Default)]
pub struct Report {
    /// Collections to include, in report order (defaults to the configured
    /// list)
    names: Vec<String>,

    /// Where to write the report (defaults to the configured path)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the report to stdout instead of writing it
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

impl Report {
    #[instrument(level = "debug", skip(content))]
    pub fn run(self, content: &ContentDir) -> anyhow::Result<()> {
        let names = names_or(self.names, content.config().report_collections());

        if self.stdout {
            print!("{}", content.build_report(&names));
            return Ok(());
        }

        let destination = self.output.unwrap_or_else(|| content.report_path());
        content
            .write_report(&names, &destination)
            .with_context(|| format!("failed to write report to {}", destination.display()))?;

        println!(
            "{}",
            format!("✅ Report generated at: {}", destination.display()).success()
        );
        Ok(())
    }
}
