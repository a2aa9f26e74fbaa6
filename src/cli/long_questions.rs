use clap::Parser;
use lessons::{
    domain::review::{long_questions, DEFAULT_MIN_CHARS},
    storage::LoadError,
    ContentDir,
};
use tracing::instrument;

#[derive(Debug, Parser)]
pub struct LongQuestions {
    /// Collections to scan (defaults to every JSON file in the content
    /// directory)
    names: Vec<String>,

    /// Report prompts longer than this many characters
    #[arg(long, default_value_t = DEFAULT_MIN_CHARS)]
    min_chars: usize,
}

impl LongQuestions {
    #[instrument(level = "debug", skip(content))]
    pub fn run(self, content: &ContentDir) -> anyhow::Result<()> {
        let names = if self.names.is_empty() {
            content.discover()
        } else {
            self.names
        };

        for name in names {
            let records = match content.load(&name) {
                Ok(records) => records,
                Err(LoadError::NotFound) => {
                    tracing::warn!("Collection '{name}' not found");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Skipping '{name}': {e}");
                    continue;
                }
            };

            for question in long_questions(&records, self.min_chars) {
                println!("--- {name} #{} ---", question.position);
                println!("Type: {}", question.kind().unwrap_or("N/A"));
                println!("Stem: {}", question.prompt);
                println!("Choices: {}", question.choices().unwrap_or_default());
                println!("-------------------");
            }
        }

        Ok(())
    }
}
