//! Probing upstream source directories for notices documents.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::domain::{Candidate, Config};

/// A candidate path that exists but could not be read.
#[derive(Debug)]
pub struct ReadFailure {
    /// Identifier of the upstream source.
    pub source_name: String,
    /// The full path that failed.
    pub path: PathBuf,
    /// The underlying error.
    pub error: io::Error,
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to read {} for source '{}': {}",
            self.path.display(),
            self.source_name,
            self.error
        )
    }
}

/// The outcome of probing every (source, candidate path) combination.
#[derive(Debug, Default)]
pub struct Probed {
    /// One entry per combination, in configuration order.
    pub candidates: Vec<Candidate>,
    /// Paths that exist but could not be read.
    pub failures: Vec<ReadFailure>,
}

/// Probes every candidate path under every configured source.
///
/// Sources are read in parallel; the result keeps configuration order. A path
/// that does not exist, or is not a file, is a miss rather than an error.
#[must_use]
pub fn probe(root: &Path, config: &Config) -> Probed {
    let combinations: Vec<_> = config
        .sources()
        .iter()
        .flat_map(|source| {
            config
                .candidate_paths()
                .iter()
                .map(move |candidate| (source, candidate))
        })
        .collect();

    let results: Vec<_> = combinations
        .into_par_iter()
        .map(|(source, candidate)| {
            let path = root.join(&source.path).join(candidate);
            let text = read_candidate(&path).map_err(|error| ReadFailure {
                source_name: source.name.clone(),
                path: path.clone(),
                error,
            });
            (source.name.clone(), candidate.clone(), text)
        })
        .collect();

    let mut probed = Probed::default();
    for (source, path, text) in results {
        match text {
            Ok(text) => probed.candidates.push(Candidate { source, path, text }),
            Err(failure) => {
                tracing::warn!("{failure}");
                probed.candidates.push(Candidate {
                    source,
                    path,
                    text: None,
                });
                probed.failures.push(failure);
            }
        }
    }
    probed
}

fn read_candidate(path: &Path) -> io::Result<Option<String>> {
    if !path.is_file() {
        tracing::debug!("no candidate at {}", path.display());
        return Ok(None);
    }

    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("found candidate at {}", path.display());
            Ok(Some(text))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
