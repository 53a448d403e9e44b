use std::path::PathBuf;

use clap::Parser;
use notices::{Config, Updater, storage::notices_file};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Check that notices files parse")]
pub struct Check {
    /// Files to check (defaults to the local notices file)
    files: Vec<PathBuf>,
}

impl Check {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: PathBuf, config: Config) -> anyhow::Result<()> {
        let files = if self.files.is_empty() {
            vec![Updater::new(root, config).notices_path()]
        } else {
            self.files
        };

        let mut invalid = 0;
        for path in &files {
            match notices_file::load(path) {
                Ok(document) => println!(
                    "{} {}: {} section(s)",
                    "✓".success(),
                    path.display(),
                    document.sections().len()
                ),
                Err(error) => {
                    tracing::debug!("{} failed to load: {error:?}", path.display());
                    println!("{} {}: {error}", "✗".error(), path.display());
                    invalid += 1;
                }
            }
        }

        if invalid > 0 {
            anyhow::bail!("{invalid} of {} notices file(s) invalid", files.len());
        }

        Ok(())
    }
}
