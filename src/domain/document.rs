//! Notices documents: a free-form preamble followed by named sections.

use std::iter;

use nonempty::NonEmpty;

use crate::domain::{
    header::{self, MalformedHeaderError, SectionHeader},
    name::SectionName,
};

/// One upstream dependency's notice: a header and the text below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    header: SectionHeader,
    content: String,
}

impl Section {
    /// The section's header.
    #[must_use]
    pub const fn header(&self) -> &SectionHeader {
        &self.header
    }

    /// The section's name. Two sections with the same name (ignoring case)
    /// are the same section.
    #[must_use]
    pub const fn name(&self) -> &SectionName {
        self.header.name()
    }

    /// The text between the header and the next section, without trailing
    /// blank lines.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether `other` describes the same upstream dependency.
    #[must_use]
    pub fn is_same_section(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// A parsed notices document.
///
/// A document always contains at least one section. Header line indices refer
/// to the text each section was parsed from; a merged document may hold
/// sections from several texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    preamble: String,
    sections: NonEmpty<Section>,
}

impl Document {
    /// Parses a document from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text has no recognizable section header, or if
    /// a header is malformed.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(&lines)
    }

    /// Parses a document from its lines.
    ///
    /// The preamble is everything before the first header. Each section's
    /// content starts after the blank line that follows its header and runs
    /// up to the next header; trailing blank lines are dropped from both.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no recognizable section header, or if a
    /// header is malformed.
    pub fn from_lines(lines: &[&str]) -> Result<Self, ParseError> {
        let headers = header::recognize(lines)?;
        let first = headers.first().ok_or(ParseError::NoSectionsFound)?;

        let preamble = join(trim_trailing_blank(&lines[..first.start_line()]));

        let ends = headers
            .iter()
            .skip(1)
            .map(SectionHeader::start_line)
            .chain(iter::once(lines.len()))
            .collect::<Vec<_>>();

        let sections = headers
            .into_iter()
            .zip(ends)
            .map(|(header, end)| {
                // One blank line always follows a header.
                let start = (header.end_line() + 1).min(end);
                let content = join(trim_trailing_blank(&lines[start..end]));
                Section { header, content }
            })
            .collect();

        let sections = NonEmpty::from_vec(sections).ok_or(ParseError::NoSectionsFound)?;
        tracing::debug!(sections = sections.len(), "parsed notices document");

        Ok(Self { preamble, sections })
    }

    pub(crate) const fn new(preamble: String, sections: NonEmpty<Section>) -> Self {
        Self { preamble, sections }
    }

    /// The text before the first section.
    #[must_use]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// The sections, in document order.
    #[must_use]
    pub const fn sections(&self) -> &NonEmpty<Section> {
        &self.sections
    }

    /// Looks up a section by name, ignoring case.
    #[must_use]
    pub fn section(&self, name: &SectionName) -> Option<&Section> {
        self.sections.iter().find(|section| section.name() == name)
    }

    /// Whether the document has a section with the given name, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &SectionName) -> bool {
        self.section(name).is_some()
    }

    /// Renders the document back to text.
    ///
    /// Each section is preceded by one blank line and its header is followed
    /// by exactly one blank line. Text ending in a separator line gets a second
    /// blank line, so the separator cannot claim the next header as its name.
    /// Rendering a parsed rendering gives the same text back.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();

        if !self.preamble.is_empty() {
            lines.extend(self.preamble.lines());
        }

        for section in self.sections.iter() {
            if lines.last().is_some_and(|line| header::is_separator_line(line)) {
                lines.push("");
            }
            lines.push("");
            lines.extend(section.header.lines());
            lines.push("");
            if !section.content.is_empty() {
                lines.extend(section.content.lines());
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn trim_trailing_blank<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let len = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    &lines[..len]
}

fn join(lines: &[&str]) -> String {
    lines.join("\n")
}

/// Errors that can occur when parsing a notices document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text has no recognizable section header.
    #[error("no section headers found")]
    NoSectionsFound,

    /// A header is malformed.
    #[error(transparent)]
    MalformedHeader(#[from] MalformedHeaderError),
}
