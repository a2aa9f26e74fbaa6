use clap::Parser;
use lessons::{
    domain::{validate_collection, Issue, Severity},
    storage::LoadError,
    ContentDir,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Check records against the current schema")]
pub struct Validate {
    /// Collections to check (defaults to every JSON file in the content
    /// directory)
    names: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Only print errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug)]
struct CollectionResult {
    name: String,
    records: usize,
    issues: Vec<Issue>,
    unreadable: Option<String>,
}

impl CollectionResult {
    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

impl Validate {
    #[instrument(level = "debug", skip(content))]
    pub fn run(self, content: &ContentDir) -> anyhow::Result<()> {
        let results = self.check(content);

        match self.output {
            OutputFormat::Table => self.output_table(&results),
            OutputFormat::Json => Self::output_json(&results)?,
        }

        if has_errors(&results) {
            std::process::exit(2);
        }

        Ok(())
    }

    fn check(&self, content: &ContentDir) -> Vec<CollectionResult> {
        let names = if self.names.is_empty() {
            content.discover()
        } else {
            self.names.clone()
        };

        names
            .into_iter()
            .filter_map(|name| match content.load(&name) {
                Ok(records) => Some(CollectionResult {
                    issues: validate_collection(&records),
                    records: records.len(),
                    name,
                    unreadable: None,
                }),
                Err(LoadError::NotFound) => {
                    tracing::warn!("Collection '{name}' not found");
                    None
                }
                Err(e) => Some(CollectionResult {
                    name,
                    records: 0,
                    issues: Vec::new(),
                    unreadable: Some(e.to_string()),
                }),
            })
            .collect()
    }

    fn output_table(&self, results: &[CollectionResult]) {
        for result in results {
            if let Some(reason) = &result.unreadable {
                println!("{}", format!("✗ {}: {reason}", result.name).error());
                continue;
            }

            let errors = result.count(Severity::Error);
            let warnings = result.count(Severity::Warning);

            if !self.quiet {
                let line = format!(
                    "{} {}: {} records, {errors} errors, {warnings} warnings",
                    if errors == 0 { "✓" } else { "✗" },
                    result.name,
                    result.records,
                );
                if errors > 0 {
                    println!("{}", line.error());
                } else if warnings > 0 {
                    println!("{}", line.warning());
                } else {
                    println!("{}", line.success());
                }
            }

            for issue in &result.issues {
                match issue.severity {
                    Severity::Error => println!("  • {}", issue.to_string().error()),
                    Severity::Warning if !self.quiet => {
                        println!("  • {}", issue.to_string().dim());
                    }
                    Severity::Warning => {}
                }
            }
        }

        if !self.quiet {
            let total: usize = results.iter().map(|r| r.count(Severity::Error)).sum();
            if has_errors(results) {
                println!("\n{}", format!("Summary: {total} errors found").error());
            } else {
                println!("\n{}", "All collections are valid".success());
            }
        }
    }

    fn output_json(results: &[CollectionResult]) -> anyhow::Result<()> {
        use serde_json::json;

        let collections: Vec<_> = results
            .iter()
            .map(|result| {
                let issues: Vec<_> = result
                    .issues
                    .iter()
                    .map(|issue| {
                        json!({
                            "position": issue.record.position,
                            "id": issue.record.id,
                            "severity": issue.severity.to_string(),
                            "message": issue.message,
                        })
                    })
                    .collect();
                json!({
                    "name": result.name,
                    "records": result.records,
                    "unreadable": result.unreadable,
                    "issues": issues,
                })
            })
            .collect();

        let output = json!({
            "status": if has_errors(results) { "errors_found" } else { "valid" },
            "collections": collections,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn has_errors(results: &[CollectionResult]) -> bool {
    results
        .iter()
        .any(|result| result.unreadable.is_some() || result.count(Severity::Error) > 0)
}
