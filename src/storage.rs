/// Reading and writing the local notices document.
pub mod notices_file;
/// Probing upstream source directories.
pub mod sources;
mod update;

pub use notices_file::LoadError;
pub use sources::{Probed, ReadFailure};
pub use update::{Failure, Failures, Mode, SourcesReport, UpdateError, UpdateReport, Updater};
