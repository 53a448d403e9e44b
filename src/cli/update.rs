use std::{path::PathBuf, process};

use clap::Parser;
use notices::{
    Config, Mode, SectionName, UpdateError, UpdateReport, Updater,
    domain::{ImportedSection, Probe},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Import new sections from upstream sources into the local notices file")]
pub struct Update {
    /// Show what would be imported without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Like --dry-run, but exit with code 2 if any section would be imported
    #[arg(long)]
    check: bool,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress everything but the summary line
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Update {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: PathBuf, config: Config) -> anyhow::Result<()> {
        let updater = Updater::new(root, config);
        let mode = if self.dry_run || self.check {
            Mode::DryRun
        } else {
            Mode::Write
        };

        let report = match updater.run(mode) {
            Ok(report) => report,
            Err(UpdateError::Aborted(failures)) => {
                for failure in failures.iter() {
                    eprintln!("{} {failure}", "✗".error());
                }
                anyhow::bail!(
                    "{} problem(s) found; {} was not modified",
                    failures.len(),
                    updater.notices_path().display()
                );
            }
            Err(error) => return Err(error.into()),
        };

        match self.output {
            OutputFormat::Json => Self::output_json(&report)?,
            OutputFormat::Table => self.output_table(&report),
        }

        if self.check && !report.imported.is_empty() {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(report: &UpdateReport) -> anyhow::Result<()> {
        use serde_json::json;

        let section = |section: &ImportedSection| {
            json!({
                "name": section.name.as_str(),
                "source": section.provenance.source,
                "path": section.provenance.path,
            })
        };
        let probe = |probe: &Probe| {
            json!({
                "source": probe.source,
                "path": probe.path,
                "found": probe.found,
            })
        };

        let output = json!({
            "path": report.path.display().to_string(),
            "written": report.written,
            "probes": report.probes.iter().map(probe).collect::<Vec<_>>(),
            "imported": report.imported.iter().map(section).collect::<Vec<_>>(),
            "already_imported": report.already_imported.iter().map(section).collect::<Vec<_>>(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(&self, report: &UpdateReport) {
        if !self.quiet {
            for probe in report.probes.iter().filter(|probe| probe.found) {
                println!("{} {probe}", "•".dim());
            }

            if !report.already_imported.is_empty() {
                println!(
                    "{}",
                    format!(
                        "{} section(s) already present",
                        report.already_imported.len()
                    )
                    .dim()
                );
            }

            for section in &report.imported {
                println!(
                    "{} {} {}",
                    "+".success(),
                    short_name(&section.name),
                    format!("from {}", section.provenance).dim()
                );
            }
        }

        let path = report.path.display();
        let count = report.imported.len();
        if count == 0 {
            println!("{} {path} is up to date", "✓".success());
        } else if report.written {
            println!("{} Imported {count} section(s) into {path}", "✓".success());
        } else {
            println!(
                "{} {count} section(s) would be imported into {path}",
                "!".warning()
            );
        }
    }
}

/// The first line of a section name; multi-line names are marked with an
/// ellipsis.
pub(super) fn short_name(name: &SectionName) -> String {
    let mut lines = name.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first}…")
    } else {
        first.to_string()
    }
}
