use std::path::Path;

use lessons::{storage::CONFIG_FILE, Config};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    pub fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("Already initialized (found existing {CONFIG_FILE})");
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized lesson content directory in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  lessons migrate");
        println!("  lessons report");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn run_writes_default_config() {
        let tmp = tempdir().unwrap();

        Init::run(tmp.path()).unwrap();

        let config = Config::load(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn run_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "_version = \"1\"\n").unwrap();

        assert!(Init::run(tmp.path()).is_err());
    }
}
