use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use notices::{Config, Document, Section, Updater};
use regex::Regex;
use tracing::instrument;

use super::{
    terminal::{Colorize, is_narrow},
    update::short_name,
};

/// Command arguments for `notices list`.
#[derive(Debug, Parser)]
#[command(about = "List the sections of the local notices file")]
pub struct List {
    /// Regular expression matched against section names.
    #[arg(long)]
    regex: Option<String>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Print only section names, one per line.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, root: PathBuf, config: Config) -> anyhow::Result<()> {
        let updater = Updater::new(root, config);
        let path = updater.notices_path();
        let document = updater
            .load_local()
            .with_context(|| format!("failed to load {}", path.display()))?;

        let pattern = self
            .regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --regex")?;

        let sections: Vec<(usize, &Section)> = document
            .sections()
            .iter()
            .enumerate()
            .filter(|(_, section)| {
                pattern
                    .as_ref()
                    .is_none_or(|pattern| pattern.is_match(section.name()))
            })
            .collect();

        match self.output {
            OutputFormat::Json => Self::output_json(&document, &sections)?,
            OutputFormat::Table if self.quiet => {
                for (_, section) in &sections {
                    println!("{}", section.name());
                }
            }
            OutputFormat::Table => Self::output_table(&document, &sections),
        }

        Ok(())
    }

    fn output_json(document: &Document, sections: &[(usize, &Section)]) -> anyhow::Result<()> {
        use serde_json::json;

        let sections: Vec<_> = sections
            .iter()
            .map(|(index, section)| {
                let header = section.header();
                json!({
                    "index": index,
                    "name": section.name().as_str(),
                    "format": header.format().label(),
                    "line": header.start_line() + 1,
                    "content_lines": section.content().lines().count(),
                })
            })
            .collect();

        let output = json!({
            "total": document.sections().len(),
            "sections": sections,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(document: &Document, sections: &[(usize, &Section)]) {
        if sections.is_empty() {
            println!("No matching sections.");
            return;
        }

        if is_narrow() {
            for (index, section) in sections {
                println!("{:>3}. {}", index + 1, short_name(section.name()));
            }
        } else {
            println!(
                "{:>3}  {:<10} {:>5} {:>6}  Name",
                "#", "Format", "Line", "Lines"
            );
            println!("{}", "─".repeat(48).dim());
            for (index, section) in sections {
                let header = section.header();
                println!(
                    "{:>3}  {:<10} {:>5} {:>6}  {}",
                    index + 1,
                    header.format().label(),
                    header.start_line() + 1,
                    section.content().lines().count(),
                    short_name(section.name())
                );
            }
        }

        println!(
            "{}",
            format!(
                "{} of {} section(s)",
                sections.len(),
                document.sections().len()
            )
            .dim()
        );
    }
}
