//! Third-party notices maintenance
//!
//! A notices document is a plain-text file: a free-form preamble followed by
//! one section per upstream dependency. This crate recognizes the section
//! headers found in hand-edited notices files, and merges in the sections that
//! upstream sources supply but the local file lacks.

pub mod domain;
pub use domain::{
    Config, Document, ExternalDocument, HeaderFormat, MergeResult, ParseError, Section,
    SectionHeader, SectionName, merge,
};

/// Filesystem access: the local notices file and upstream source directories.
pub mod storage;
pub use storage::{Mode, UpdateError, UpdateReport, Updater};
