use std::num::NonZeroUsize;

use anyhow::Context;
use clap::Parser;
use lessons::{
    domain::{
        renumber::{self, DEFAULT_PER_LEVEL},
        Topic,
    },
    ContentDir,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Renumber {
    /// The collection to renumber
    name: String,

    /// The id prefix (defaults to the collection name)
    #[arg(long)]
    topic: Option<Topic>,

    /// Questions per level
    #[arg(long, default_value_t = DEFAULT_PER_LEVEL)]
    per_level: NonZeroUsize,

    /// Also overwrite each record's source_id with its new id
    #[arg(long)]
    with_source_id: bool,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Renumber {
    #[instrument(level = "debug", skip(content))]
    pub fn run(self, content: &ContentDir) -> anyhow::Result<()> {
        let topic = match self.topic {
            Some(topic) => topic,
            None => self
                .name
                .parse()
                .with_context(|| format!("collection name '{}' is not a valid topic", self.name))?,
        };

        let mut records = content
            .load(&self.name)
            .with_context(|| format!("failed to load collection '{}'", self.name))?;
        println!("Loaded {} questions.", records.len());

        if self.with_source_id && !self.yes {
            eprintln!(
                "{}",
                "--with-source-id replaces every source_id, discarding attribution.".warning()
            );
            eprint!("Proceed? (y/N) ");
            use std::io::{self, BufRead};
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            if !line.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        let options = renumber::Renumber {
            topic,
            per_level: self.per_level,
            with_source_id: self.with_source_id,
        };
        let changed = renumber::renumber(&mut records, &options);

        if changed == 0 {
            println!("All ids in {} are already up to date", self.name);
            return Ok(());
        }

        content
            .save(&self.name, &records)
            .with_context(|| format!("failed to save collection '{}'", self.name))?;
        println!(
            "{}",
            format!("✅ Updated {changed} ids in {}", self.name).success()
        );
        Ok(())
    }
}
