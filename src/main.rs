//! `notices`: keep a third-party notices file in step with its upstream
//! sources.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
