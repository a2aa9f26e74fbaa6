use anyhow::Context;
use clap::Parser;
use lessons::{domain::RecordLabel, ContentDir, MigrationOutcome};
use tracing::instrument;

use super::{names_or, terminal::Colorize};

#[derive(Debug, Parser, Default)]
pub struct Migrate {
    /// Collections to migrate (defaults to the configured list)
    names: Vec<String>,

    /// Report what would be migrated without writing any file
    #[arg(long)]
    dry_run: bool,
}

impl Migrate {
    #[instrument(level = "debug", skip(content))]
    pub fn run(self, content: &ContentDir) -> anyhow::Result<()> {
        let names = names_or(self.names, content.config().migrate_collections());

        println!("Starting legacy content migration...");
        let mut review = Vec::new();

        for name in &names {
            let outcome = content
                .migrate(name, self.dry_run)
                .with_context(|| format!("failed to save migrated collection '{name}'"))?;

            match outcome {
                MigrationOutcome::Missing => {
                    println!(
                        "{}",
                        format!("File not found: {}", content.path_for(name).display()).warning()
                    );
                }
                MigrationOutcome::Unreadable(reason) => {
                    println!("{}", format!("Skipped {name}: {reason}").warning());
                }
                MigrationOutcome::Unchanged => {
                    println!("No items needed migration in {name}");
                }
                MigrationOutcome::Migrated(summary) => {
                    println!(
                        "{}",
                        format!("✅ Migrated {} items in {name}", summary.migrated).success()
                    );
                    print_defaulted(&summary.defaulted_answers);
                    review.push((name, summary.needs_type_review));
                }
                MigrationOutcome::WouldMigrate(summary) => {
                    println!("Would migrate {} items in {name}", summary.migrated);
                    print_defaulted(&summary.defaulted_answers);
                }
            }
        }

        if !review.is_empty() {
            println!(
                "\n{}",
                "Migrated records were typed as multiple_choice; confirm each one:".warning()
            );
            for (name, labels) in review {
                for label in labels {
                    println!("  • {name}: {label}");
                }
            }
        }

        println!("Done.");
        Ok(())
    }
}

fn print_defaulted(labels: &[RecordLabel]) {
    if labels.is_empty() {
        return;
    }
    println!(
        "{}",
        format!(
            "  {} records had no answer_index; correct_index set to 0:",
            labels.len()
        )
        .warning()
    );
    for label in labels {
        println!("    • {label}");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn run_migrates_configured_collections() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("money.json"),
            r#"[{"id": "money_l01_01", "stem": "Q", "what": "A"}]"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("social.json"),
            r#"[{"id": "social_l01_01", "stem": "Q", "answer_index": 1}]"#,
        )
        .unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        Migrate::default().run(&content).unwrap();

        for name in ["money", "social"] {
            let records = content.load(name).unwrap();
            assert_eq!(records[0]["source_id"], "legacy_content_v1");
            assert!(!records[0].contains_key("stem"));
        }
    }

    #[test]
    fn run_continues_past_missing_collections() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("work.json"), r#"[{"stem": "Q"}]"#).unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let command = Migrate {
            names: vec!["health".to_string(), "work".to_string()],
            dry_run: false,
        };
        command.run(&content).unwrap();

        assert_eq!(content.load("work").unwrap()[0]["question"], "Q");
    }
}
