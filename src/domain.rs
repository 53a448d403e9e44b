//! Domain models for notices maintenance.
//!
//! Everything in this module is pure: parsing, merging and rendering operate
//! on values and never touch the filesystem.

mod config;
pub use config::{Config, ConfigError, SourceConfig};

/// Notices documents and their sections.
pub mod document;
pub use document::{Document, ParseError, Section};

/// Section header recognition.
pub mod header;
pub use header::{HeaderFormat, MalformedHeaderError, SectionHeader};

/// Merging external documents into the local one.
pub mod merge;
pub use merge::{ExternalDocument, ImportedSection, MergeResult, Provenance, merge};

mod name;
pub use name::{EmptyNameError, SectionName};

/// Choosing the document each upstream source supplies.
pub mod source;
pub use source::{AmbiguousSourceError, Candidate, Probe, ResolutionError, Resolved};
