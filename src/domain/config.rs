use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Configuration for notices maintenance.
///
/// This struct holds the location of the local notices document and the
/// upstream sources its sections are harvested from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path of the local notices document, relative to the working root.
    notices_file: PathBuf,

    /// Paths probed under every source root, in order.
    ///
    /// Each source must have a notices document at exactly one of these.
    candidate_paths: Vec<String>,

    /// The upstream sources to harvest sections from.
    sources: Vec<SourceConfig>,
}

/// An upstream source: a named directory holding a notices document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Identifier used in reports.
    pub name: String,
    /// Root directory of the source, relative to the working root or
    /// absolute.
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notices_file: default_notices_file(),
            candidate_paths: default_candidate_paths(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Path of the local notices document, relative to the working root.
    #[must_use]
    pub fn notices_file(&self) -> &Path {
        &self.notices_file
    }

    /// Sets the path of the local notices document.
    pub fn set_notices_file(&mut self, path: PathBuf) {
        self.notices_file = path;
    }

    /// Paths probed under every source root.
    #[must_use]
    pub fn candidate_paths(&self) -> &[String] {
        &self.candidate_paths
    }

    /// The configured upstream sources.
    #[must_use]
    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Adds a source, replacing any existing source with the same name.
    ///
    /// Returns `true` if an existing source was replaced.
    pub fn add_source(&mut self, source: SourceConfig) -> bool {
        if let Some(existing) = self.sources.iter_mut().find(|s| s.name == source.name) {
            *existing = source;
            true
        } else {
            self.sources.push(source);
            false
        }
    }
}

fn default_notices_file() -> PathBuf {
    PathBuf::from("THIRD-PARTY-NOTICES.txt")
}

fn default_candidate_paths() -> Vec<String> {
    ["THIRD-PARTY-NOTICES.txt", "ThirdPartyNotices.txt", "NOTICE.txt"]
        .map(String::from)
        .to_vec()
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),

    /// The file could not be parsed.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] io::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_notices_file")]
        notices_file: PathBuf,

        /// Probed in order under every source root.
        #[serde(default = "default_candidate_paths")]
        candidate_paths: Vec<String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sources: Vec<SourceConfig>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                notices_file,
                candidate_paths,
                sources,
            } => Self {
                notices_file,
                candidate_paths,
                sources,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            notices_file: config.notices_file,
            candidate_paths: config.candidate_paths,
            sources: config.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"_version = "1"
notices_file = "docs/NOTICES.txt"
candidate_paths = ["NOTICE"]

[[sources]]
name = "runtime"
path = "vendor/runtime"

[[sources]]
name = "sdk"
path = "/opt/sdk"
"#,
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.notices_file(), Path::new("docs/NOTICES.txt"));
        assert_eq!(config.candidate_paths(), &["NOTICE".to_string()]);
        assert_eq!(
            config.sources(),
            &[
                SourceConfig {
                    name: "runtime".to_string(),
                    path: PathBuf::from("vendor/runtime"),
                },
                SourceConfig {
                    name: "sdk".to_string(),
                    path: PathBuf::from("/opt/sdk"),
                },
            ]
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ncandidate_paths = \"NOTICE\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notices.toml");

        let mut config = Config::default();
        config.add_source(SourceConfig {
            name: "runtime".to_string(),
            path: PathBuf::from("vendor/runtime"),
        });
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn add_source_replaces_by_name() {
        let mut config = Config::default();
        let first = SourceConfig {
            name: "sdk".to_string(),
            path: PathBuf::from("old"),
        };
        let second = SourceConfig {
            name: "sdk".to_string(),
            path: PathBuf::from("new"),
        };

        assert!(!config.add_source(first));
        assert!(config.add_source(second.clone()));
        assert_eq!(config.sources(), &[second]);
    }
}
