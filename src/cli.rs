use std::path::{Path, PathBuf};

mod check;
mod init;
mod list;
mod sources;
mod terminal;
mod update;

use anyhow::Context;
use check::Check;
use clap::ArgAction;
use init::Init;
use list::List;
use notices::{Config, domain::SourceConfig};
use sources::Sources;
use update::Update;

const DEFAULT_CONFIG: &str = "notices.toml";

/// Parse a `NAME=PATH` source override.
fn parse_source(s: &str) -> Result<SourceConfig, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{s}'"));
    }
    Ok(SourceConfig {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The working root; relative paths are resolved against it
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Configuration file (defaults to notices.toml in the root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path of the local notices file, overriding the configuration
    #[arg(long, global = true)]
    notices_file: Option<PathBuf>,

    /// Add or replace an upstream source (can be given multiple times)
    #[arg(long = "source", value_name = "NAME=PATH", value_parser = parse_source, global = true)]
    source_overrides: Vec<SourceConfig>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        if let Some(Command::Init(init)) = &self.command {
            let config = self.with_overrides(Config::default());
            return init.run(self.config_path(), config);
        }

        let config = self.load_config()?;

        self.command
            .unwrap_or_else(|| Command::Check(Check::default()))
            .run(self.root, config)
    }

    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_CONFIG))
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => load_default_config(&self.root)?,
        };

        Ok(self.with_overrides(config))
    }

    fn with_overrides(&self, mut config: Config) -> Config {
        if let Some(path) = &self.notices_file {
            config.set_notices_file(path.clone());
        }
        for source in &self.source_overrides {
            if config.add_source(source.clone()) {
                tracing::debug!("source '{}' overridden from the command line", source.name);
            }
        }

        config
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_default_config(root: &Path) -> anyhow::Result<Config> {
    let path = root.join(DEFAULT_CONFIG);
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Write a notices.toml with default settings and any --source overrides
    Init(Init),

    /// Check that notices files parse (default)
    Check(Check),

    /// Import sections from upstream sources into the local notices file
    ///
    /// Sections the local file already has (matched by name, ignoring case)
    /// are left alone. New sections are appended, sorted by name.
    Update(Update),

    /// List the sections of the local notices file
    List(List),

    /// Show which notices document each upstream source supplies
    Sources(Sources),
}

impl Command {
    fn run(self, root: PathBuf, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(root.join(DEFAULT_CONFIG), config)?,
            Self::Check(command) => command.run(root, config)?,
            Self::Update(command) => command.run(root, config)?,
            Self::List(command) => command.run(root, config)?,
            Self::Sources(command) => command.run(root, config)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_source_override() {
        let source = parse_source("sdk=vendor/sdk").unwrap();
        assert_eq!(source.name, "sdk");
        assert_eq!(source.path, PathBuf::from("vendor/sdk"));
    }

    #[test]
    fn parse_source_rejects_missing_parts() {
        assert!(parse_source("vendor/sdk").is_err());
        assert!(parse_source("=vendor/sdk").is_err());
        assert!(parse_source("sdk=").is_err());
    }

    #[test]
    fn cli_overrides_apply_to_config() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "notices",
            "--root",
            tmp.path().to_str().unwrap(),
            "--notices-file",
            "docs/NOTICES.txt",
            "--source",
            "sdk=vendor/sdk",
            "list",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();

        assert_eq!(config.notices_file(), Path::new("docs/NOTICES.txt"));
        assert_eq!(config.sources().len(), 1);
        assert_eq!(config.sources()[0].name, "sdk");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");
        let cli = Cli::try_parse_from(["notices", "--config", missing.to_str().unwrap()]).unwrap();

        assert!(cli.load_config().is_err());
    }

    #[test]
    fn init_ignores_missing_config_and_keeps_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        let cli = Cli::try_parse_from([
            "notices",
            "--config",
            path.to_str().unwrap(),
            "--source",
            "sdk=vendor/sdk",
            "init",
        ])
        .unwrap();

        assert_eq!(cli.config_path(), path);
        let config = cli.with_overrides(Config::default());
        assert_eq!(config.sources()[0].name, "sdk");
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
