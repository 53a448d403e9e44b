//! Bringing the local notices document up to date with its upstream sources.
//!
//! The [`Updater`] wraps the pure merge in the filesystem work around it: it
//! reads the local document, probes the sources, and writes the result back.
//! Nothing is written unless every step before the merge succeeded.

use std::{fmt, io, path::PathBuf};

use nonempty::NonEmpty;

use crate::{
    domain::{
        AmbiguousSourceError, Config, Document, ExternalDocument, ImportedSection, ParseError,
        Probe, Provenance, merge, source,
    },
    storage::{
        notices_file::{self, LoadError},
        sources::{self, ReadFailure},
    },
};

/// Whether an update writes its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write the merged document if it gained sections.
    #[default]
    Write,
    /// Compute the merge without writing anything.
    DryRun,
}

/// Updates a local notices document from the sources in a [`Config`].
#[derive(Debug, Clone)]
pub struct Updater {
    root: PathBuf,
    config: Config,
}

impl Updater {
    /// Creates an updater for the working root.
    ///
    /// Relative paths in the configuration are resolved against `root`.
    #[must_use]
    pub const fn new(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the local notices document.
    #[must_use]
    pub fn notices_path(&self) -> PathBuf {
        self.root.join(self.config.notices_file())
    }

    /// Loads the local notices document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub fn load_local(&self) -> Result<Document, LoadError> {
        notices_file::load(&self.notices_path())
    }

    /// Probes the sources and checks that each supplied exactly one document,
    /// without parsing or merging anything.
    #[must_use]
    pub fn sources(&self) -> SourcesReport {
        let probed = sources::probe(&self.root, &self.config);
        let probes = probed.candidates.iter().map(|c| c.probe()).collect();
        let ambiguous = source::resolve(probed.candidates)
            .err()
            .map(|error| error.into_iter().collect())
            .unwrap_or_default();

        SourcesReport {
            probes,
            read_failures: probed.failures,
            ambiguous,
        }
    }

    /// Merges every source's sections into the local document.
    ///
    /// All problems are collected before giving up: a missing or invalid local
    /// document, unreadable candidates, sources with zero or several
    /// documents, and source documents that fail to parse are reported
    /// together. The merge only runs, and the file is only written, when there
    /// are none.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Aborted`] with every problem found before the
    /// merge, or [`UpdateError::Write`] if the merged document could not be
    /// saved.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&self, mode: Mode) -> Result<UpdateReport, UpdateError> {
        let path = self.notices_path();
        let mut failures = Vec::new();

        let local = self.load_local().map_err(|error| Failure::Local {
            path: path.clone(),
            error,
        });

        let probed = sources::probe(&self.root, &self.config);
        let probes: Vec<Probe> = probed.candidates.iter().map(|c| c.probe()).collect();
        failures.extend(probed.failures.into_iter().map(Failure::Read));

        let resolved = source::resolve(probed.candidates).unwrap_or_else(|error| {
            failures.extend(error.into_iter().map(Failure::Source));
            Vec::new()
        });

        let externals: Vec<ExternalDocument> = resolved
            .into_iter()
            .filter_map(|resolved| match Document::parse(&resolved.text) {
                Ok(document) => Some(ExternalDocument {
                    provenance: resolved.provenance,
                    document,
                }),
                Err(error) => {
                    failures.push(Failure::Parse {
                        provenance: resolved.provenance,
                        error,
                    });
                    None
                }
            })
            .collect();

        let local = match (local, NonEmpty::from_vec(failures)) {
            (Ok(local), None) => local,
            (Ok(_), Some(failures)) => return Err(UpdateError::Aborted(Failures { failures })),
            (Err(failure), rest) => {
                let mut failures = NonEmpty::new(failure);
                for failure in rest.into_iter().flatten() {
                    failures.push(failure);
                }
                return Err(UpdateError::Aborted(Failures { failures }));
            }
        };

        let result = merge(&local, &externals);

        let written = if result.is_unchanged() {
            tracing::info!("no new sections to import");
            false
        } else if mode == Mode::DryRun {
            tracing::info!(
                sections = result.imported.len(),
                "dry run; not writing {}",
                path.display()
            );
            false
        } else {
            notices_file::save(&result.document, &path)
                .map_err(|source| UpdateError::Write {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(
                sections = result.imported.len(),
                "updated {}",
                path.display()
            );
            true
        };

        Ok(UpdateReport {
            path,
            probes,
            imported: result.imported,
            already_imported: result.already_imported,
            written,
        })
    }
}

/// What [`Updater::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Path of the local notices document.
    pub path: PathBuf,
    /// Every (source, candidate path) combination that was tried.
    pub probes: Vec<Probe>,
    /// Sections appended to the local document, with their source.
    pub imported: Vec<ImportedSection>,
    /// Sections the sources supplied that the local document already had.
    pub already_imported: Vec<ImportedSection>,
    /// Whether the local document was rewritten.
    pub written: bool,
}

/// What [`Updater::sources`] found.
#[derive(Debug)]
pub struct SourcesReport {
    /// Every (source, candidate path) combination that was tried.
    pub probes: Vec<Probe>,
    /// Candidates that exist but could not be read.
    pub read_failures: Vec<ReadFailure>,
    /// Sources that did not supply exactly one document.
    pub ambiguous: Vec<AmbiguousSourceError>,
}

impl SourcesReport {
    /// Whether every source supplied exactly one readable document.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.read_failures.is_empty() && self.ambiguous.is_empty()
    }
}

/// A problem that prevents the merge.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// The local document could not be loaded.
    #[error("failed to load {}: {error}", .path.display())]
    Local {
        /// Path of the local document.
        path: PathBuf,
        /// The underlying error.
        error: LoadError,
    },

    /// A candidate exists but could not be read.
    #[error("{0}")]
    Read(ReadFailure),

    /// A source did not supply exactly one document.
    #[error(transparent)]
    Source(AmbiguousSourceError),

    /// A source's document is not a valid notices document.
    #[error("invalid notices document from {provenance}: {error}")]
    Parse {
        /// Where the document came from.
        provenance: Provenance,
        /// The underlying error.
        error: ParseError,
    },
}

/// Every problem that prevented a merge.
#[derive(Debug)]
pub struct Failures {
    failures: NonEmpty<Failure>,
}

impl Failures {
    /// The individual problems, in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter()
    }

    /// The number of problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

impl std::error::Error for Failures {}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "merge aborted: ")?;

        let total = self.failures.len();

        let displayed: Vec<String> = self
            .failures
            .iter()
            .take(MAX_DISPLAY)
            .map(ToString::to_string)
            .collect();

        let msg = displayed.join("; ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}

/// Errors that can occur when updating the local notices document.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Problems found before the merge; nothing was written.
    #[error(transparent)]
    Aborted(Failures),

    /// The merged document could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Path of the local document.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}
