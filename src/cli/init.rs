use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use notices::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Write a configuration file with the default settings")]
pub struct Init {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Init {
    /// Writes `config` to `path`. Sources and the notices file given on the
    /// command line are included.
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(&self, path: PathBuf, config: Config) -> anyhow::Result<()> {
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (pass --force to overwrite)",
                path.display()
            );
        }

        config
            .save(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        println!("{} Created {}", "✓".success(), path.display());
        print_next_steps(&path, &config);

        Ok(())
    }
}

fn print_next_steps(path: &Path, config: &Config) {
    println!("  notices file: {}", config.notices_file().display());
    if config.sources().is_empty() {
        println!();
        println!("Next steps:");
        println!(
            "  Add [[sources]] tables with a name and path to {}",
            path.display()
        );
        println!("  notices update --dry-run");
    } else {
        for source in config.sources() {
            println!("  source: {} ({})", source.name, source.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use notices::domain::SourceConfig;

    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.add_source(SourceConfig {
            name: "runtime".to_string(),
            path: PathBuf::from("vendor/runtime"),
        });
        config
    }

    #[test]
    fn writes_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notices.toml");

        Init::default().run(path.clone(), config()).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config());
    }

    #[test]
    fn existing_config_is_kept_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notices.toml");
        std::fs::write(&path, "_version = \"1\"\n").unwrap();

        assert!(Init::default().run(path.clone(), config()).is_err());
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        Init { force: true }.run(path.clone(), config()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("notices.toml");

        let error = Init::default().run(path, config()).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to write config file"));
    }
}
