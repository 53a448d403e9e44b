use std::{path::PathBuf, process};

use clap::Parser;
use notices::{Config, Updater};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Show which notices document each upstream source supplies")]
pub struct Sources {
    /// Also show candidate paths where nothing was found
    #[arg(long, short)]
    all: bool,
}

impl Sources {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: PathBuf, config: Config) -> anyhow::Result<()> {
        let updater = Updater::new(root, config);

        if updater.config().sources().is_empty() {
            println!("No sources configured. Add [[sources]] to notices.toml or pass --source NAME=PATH.");
            return Ok(());
        }

        let report = updater.sources();

        for probe in &report.probes {
            if probe.found {
                println!("{} {probe}", "✓".success());
            } else if self.all {
                println!("{}", format!("· {probe}").dim());
            }
        }

        for failure in &report.read_failures {
            println!("{} {failure}", "✗".error());
        }
        for ambiguous in &report.ambiguous {
            println!("{} {ambiguous}", "!".warning());
        }

        if report.is_ok() {
            println!(
                "{}",
                format!(
                    "{} source(s) ready",
                    updater.config().sources().len()
                )
                .info()
            );
            Ok(())
        } else {
            process::exit(2);
        }
    }
}
