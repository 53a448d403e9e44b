//! Choosing which candidate text each upstream source supplies.
//!
//! Every upstream source is probed at several candidate paths. Exactly one of
//! those probes must find a document; anything else is ambiguous and blocks
//! the merge.

use std::{collections::HashMap, fmt};

use nonempty::NonEmpty;

use crate::domain::merge::Provenance;

/// The result of probing one candidate path of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Identifier of the upstream source.
    pub source: String,
    /// The candidate path that was tried.
    pub path: String,
    /// The text found at the path, or `None` if there was nothing there.
    pub text: Option<String>,
}

impl Candidate {
    /// Whether a document was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.text.is_some()
    }

    /// Summarises this candidate for reporting.
    #[must_use]
    pub fn probe(&self) -> Probe {
        Probe {
            source: self.source.clone(),
            path: self.path.clone(),
            found: self.is_found(),
        }
    }
}

/// A report row: whether a source had a document at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Identifier of the upstream source.
    pub source: String,
    /// The candidate path that was tried.
    pub path: String,
    /// Whether a document was found there.
    pub found: bool,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(f, "{}: found at {}", self.source, self.path)
        } else {
            write!(f, "{}: not found at {}", self.source, self.path)
        }
    }
}

/// The single document a source supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The source and path the document was found at.
    pub provenance: Provenance,
    /// The raw document text.
    pub text: String,
}

/// A source did not supply exactly one document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmbiguousSourceError {
    /// No candidate path had a document.
    #[error("source '{source_name}' has no notices document (tried {})", .tried.join(", "))]
    NotFound {
        /// Identifier of the upstream source.
        source_name: String,
        /// Every candidate path that was tried.
        tried: Vec<String>,
    },

    /// More than one candidate path had a document.
    #[error("source '{source_name}' has more than one notices document: {}", .found.join(", "))]
    Multiple {
        /// Identifier of the upstream source.
        source_name: String,
        /// Every candidate path a document was found at.
        found: Vec<String>,
    },
}

impl AmbiguousSourceError {
    /// Identifier of the source at fault.
    #[must_use]
    pub fn source_id(&self) -> &str {
        match self {
            Self::NotFound { source_name, .. } | Self::Multiple { source_name, .. } => source_name,
        }
    }
}

/// One or more sources did not supply exactly one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    failures: NonEmpty<AmbiguousSourceError>,
}

impl ResolutionError {
    /// Every source that failed to resolve, in the order the sources were
    /// first probed.
    #[must_use]
    pub const fn failures(&self) -> &NonEmpty<AmbiguousSourceError> {
        &self.failures
    }
}

impl std::error::Error for ResolutionError {}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to resolve sources: ")?;
        let sources: Vec<&str> = self
            .failures
            .iter()
            .map(AmbiguousSourceError::source_id)
            .collect();
        write!(f, "{}", sources.join(", "))
    }
}

impl IntoIterator for ResolutionError {
    type Item = AmbiguousSourceError;
    type IntoIter = <NonEmpty<AmbiguousSourceError> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

/// Picks the one document each source supplied.
///
/// Candidates are grouped by source, keeping the order in which sources first
/// appear. Every source is checked before any error is returned, so a single
/// call reports all ambiguous sources.
///
/// # Errors
///
/// Returns a [`ResolutionError`] listing each source with no document, or with
/// more than one.
pub fn resolve(candidates: Vec<Candidate>) -> Result<Vec<Resolved>, ResolutionError> {
    let mut order: Vec<String> = Vec::new();
    let mut by_source: HashMap<String, Vec<Candidate>> = HashMap::new();

    for candidate in candidates {
        by_source
            .entry(candidate.source.clone())
            .or_insert_with(|| {
                order.push(candidate.source.clone());
                Vec::new()
            })
            .push(candidate);
    }

    let mut resolved = Vec::with_capacity(order.len());
    let mut failures = Vec::new();

    for source in order {
        let candidates = by_source.remove(&source).unwrap_or_default();
        let (found, missing): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(Candidate::is_found);

        let mut found = found.into_iter();
        match (found.next(), found.next()) {
            (Some(Candidate { path, text: Some(text), .. }), None) => {
                tracing::debug!(source = %source, path = %path, "resolved source");
                resolved.push(Resolved {
                    provenance: Provenance { source, path },
                    text,
                });
            }
            (None, _) => {
                let tried = missing.into_iter().map(|c| c.path).collect();
                failures.push(AmbiguousSourceError::NotFound {
                    source_name: source,
                    tried,
                });
            }
            (Some(first), second) => {
                let found = [Some(first), second]
                    .into_iter()
                    .flatten()
                    .chain(found)
                    .map(|c| c.path)
                    .collect();
                failures.push(AmbiguousSourceError::Multiple {
                    source_name: source,
                    found,
                });
            }
        }
    }

    NonEmpty::from_vec(failures).map_or(Ok(resolved), |failures| Err(ResolutionError { failures }))
}
