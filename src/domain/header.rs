//! Section header recognition.
//!
//! Notices documents in the wild use three header conventions:
//!
//! ```text
//! Separated          Underlined         Numbered
//!
//! ----------         libfoo             1.	libfoo
//!                    ------
//! libfoo
//! ```
//!
//! [`recognize`] scans a document once, top to bottom, and returns every
//! header it finds in line order.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::name::SectionName;

/// `<digits> "." <TAB> <name>`
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\t(.+)$").expect("this must never fail"));

/// The syntactic convention a header was written in.
///
/// Each variant keeps the raw text needed to write the header back out the way
/// it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderFormat {
    /// A separator line, a blank line, then the name.
    Separated {
        /// The separator line, trimmed.
        separator: String,
    },
    /// The name, directly followed by a separator line.
    Underlined {
        /// The separator line, trimmed.
        separator: String,
    },
    /// A single `N.<TAB>name` line.
    Numbered {
        /// The original line, verbatim.
        line: String,
    },
}

impl HeaderFormat {
    /// A short lowercase label for the format.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Separated { .. } => "separated",
            Self::Underlined { .. } => "underlined",
            Self::Numbered { .. } => "numbered",
        }
    }
}

/// Marks where a section begins, and what it is called.
///
/// Line indices are 0-based and refer to the document the header was
/// recognized in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    name: SectionName,
    format: HeaderFormat,
    start_line: usize,
    span_length: usize,
}

impl SectionHeader {
    /// The name of the section this header introduces.
    #[must_use]
    pub const fn name(&self) -> &SectionName {
        &self.name
    }

    /// The convention the header was written in.
    #[must_use]
    pub const fn format(&self) -> &HeaderFormat {
        &self.format
    }

    /// Index of the first line of the header.
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.start_line
    }

    /// Number of lines the header occupies.
    #[must_use]
    pub const fn span_length(&self) -> usize {
        self.span_length
    }

    /// Index of the first line after the header.
    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.start_line + self.span_length
    }

    /// The canonical lines of this header.
    pub fn lines(&self) -> Vec<&str> {
        match &self.format {
            HeaderFormat::Separated { separator } => {
                let mut lines = vec![separator.as_str(), ""];
                lines.extend(self.name.lines());
                lines
            }
            HeaderFormat::Underlined { separator } => {
                let mut lines: Vec<_> = self.name.lines().collect();
                lines.push(separator);
                lines
            }
            HeaderFormat::Numbered { line } => vec![line.as_str()],
        }
    }
}

/// Two runs of separator lines were found with no section name between them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "separator on line {separator_line} encloses another separator on line {embedded_line} \
     inside its section name"
)]
pub struct MalformedHeaderError {
    /// 1-based line number of the separator introducing the header.
    pub separator_line: usize,
    /// 1-based line number of the separator found inside the name.
    pub embedded_line: usize,
}

/// Finds every section header in a document.
///
/// Headers are returned in line order and never overlap. A document with no
/// recognizable header yields an empty vector.
///
/// # Errors
///
/// Returns [`MalformedHeaderError`] if a separated header's name contains a
/// separator line anywhere other than its last line.
pub fn recognize(lines: &[&str]) -> Result<Vec<SectionHeader>, MalformedHeaderError> {
    let mut headers: Vec<SectionHeader> = Vec::new();

    // The first and last lines never start a header.
    for i in 1..lines.len().saturating_sub(1) {
        if headers.last().is_some_and(|h| i < h.end_line()) {
            continue;
        }

        let header = if is_separator_candidate(lines, i) {
            if is_blank(lines[i - 1]) {
                separated(lines, i)?
            } else {
                underlined(lines, i)
            }
        } else {
            numbered(lines, i)
        };

        if let Some(header) = header {
            tracing::trace!(
                line = header.start_line + 1,
                format = header.format.label(),
                name = %header.name,
                "recognized header"
            );
            debug_assert!(
                headers
                    .last()
                    .is_none_or(|last| last.end_line() <= header.start_line),
                "headers must not overlap"
            );
            headers.push(header);
        }
    }

    Ok(headers)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A line made only of `-` and `=`, more than two characters long.
pub(crate) fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() > 2 && trimmed.chars().all(|c| c == '-' || c == '=')
}

/// A separator line followed by a blank line.
fn is_separator_candidate(lines: &[&str], i: usize) -> bool {
    is_separator_line(lines[i]) && lines.get(i + 1).is_some_and(|next| is_blank(next))
}

fn separated(lines: &[&str], i: usize) -> Result<Option<SectionHeader>, MalformedHeaderError> {
    let name_start = i + 2;
    let name_lines: Vec<&str> = lines
        .get(name_start..)
        .unwrap_or_default()
        .iter()
        .take_while(|line| !is_blank(line))
        .map(|line| line.trim())
        .collect();

    if let Some(offset) = name_lines.iter().position(|line| is_separator_line(line)) {
        if offset + 1 == name_lines.len() {
            // The trailing separator underlines the name instead.
            tracing::debug!(
                line = i + 1,
                "separator ends the following name; deferring to underlined header"
            );
            return Ok(None);
        }
        return Err(MalformedHeaderError {
            separator_line: i + 1,
            embedded_line: name_start + offset + 1,
        });
    }

    let Ok(name) = SectionName::from_lines(name_lines.iter().copied()) else {
        tracing::debug!(line = i + 1, "separator is not followed by a name");
        return Ok(None);
    };

    Ok(Some(SectionHeader {
        name,
        format: HeaderFormat::Separated {
            separator: lines[i].trim().to_string(),
        },
        start_line: i,
        span_length: 2 + name_lines.len(),
    }))
}

fn underlined(lines: &[&str], i: usize) -> Option<SectionHeader> {
    let count = lines[..i]
        .iter()
        .rev()
        .take_while(|line| !is_blank(line))
        .count();
    let start_line = i - count;

    let name =
        SectionName::from_lines(lines[start_line..i].iter().map(|line| line.trim())).ok()?;

    Some(SectionHeader {
        name,
        format: HeaderFormat::Underlined {
            separator: lines[i].trim().to_string(),
        },
        start_line,
        span_length: count + 1,
    })
}

fn numbered(lines: &[&str], i: usize) -> Option<SectionHeader> {
    if !is_blank(lines[i - 1]) || !is_blank(lines[i + 1]) {
        return None;
    }

    let captures = NUMBERED.captures(lines[i].trim_end())?;
    let name = SectionName::try_from(captures[1].trim()).ok()?;

    Some(SectionHeader {
        name,
        format: HeaderFormat::Numbered {
            line: lines[i].to_string(),
        },
        start_line: i,
        span_length: 1,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn headers(text: &str) -> Vec<SectionHeader> {
        let lines: Vec<&str> = text.lines().collect();
        recognize(&lines).unwrap()
    }

    fn summary(text: &str) -> Vec<(String, &'static str, usize, usize)> {
        headers(text)
            .into_iter()
            .map(|h| {
                (
                    h.name().to_string(),
                    h.format().label(),
                    h.start_line(),
                    h.span_length(),
                )
            })
            .collect()
    }

    #[test_case("---", true; "three dashes")]
    #[test_case("===", true; "three equals")]
    #[test_case("  -=-=-=  ", true; "mixed and padded")]
    #[test_case("--", false; "too short")]
    #[test_case("---x", false; "foreign character")]
    #[test_case("", false; "empty")]
    #[test_case("***", false; "asterisks")]
    fn separator_lines(line: &str, expected: bool) {
        assert_eq!(is_separator_line(line), expected);
    }

    #[test]
    fn separated_header() {
        let text = "Preamble\n\n----------\n\nlibfoo\n\nLicense text\n";
        assert_eq!(summary(text), [("libfoo".to_string(), "separated", 2, 3)]);
    }

    #[test]
    fn separated_header_with_multi_line_name() {
        let text = "P\n\n=====\n\nlibfoo\nversion 1.2\n\nbody\n";
        assert_eq!(
            summary(text),
            [("libfoo\nversion 1.2".to_string(), "separated", 2, 4)]
        );
    }

    #[test]
    fn underlined_header() {
        let text = "Preamble\n\nlibbar\n------\n\nLicense text\n";
        assert_eq!(summary(text), [("libbar".to_string(), "underlined", 2, 2)]);
    }

    #[test]
    fn underlined_header_at_document_start() {
        let text = "libbar\n======\n\nbody\n";
        assert_eq!(summary(text), [("libbar".to_string(), "underlined", 0, 2)]);
    }

    #[test]
    fn underlined_header_with_multi_line_name() {
        let text = "P\n\nlibbar\n(c) Someone\n---\n\nbody\n";
        assert_eq!(
            summary(text),
            [("libbar\n(c) Someone".to_string(), "underlined", 2, 3)]
        );
    }

    #[test]
    fn numbered_header() {
        let text = "P\n\n1.\tlibbaz\n\nbody\n";
        assert_eq!(summary(text), [("libbaz".to_string(), "numbered", 2, 1)]);
    }

    #[test]
    fn numbered_header_keeps_original_line() {
        let text = "P\n\n12.\tlibbaz  \n\nbody\n";
        let header = &headers(text)[0];
        assert_eq!(header.name().as_str(), "libbaz");
        assert_eq!(header.lines(), ["12.\tlibbaz  "]);
    }

    #[test_case("P\n\n1. libbaz\n\nbody\n"; "space instead of tab")]
    #[test_case("P\n\n1.\tlibbaz\nbody\n"; "no blank line below")]
    #[test_case("P\n1.\tlibbaz\n\nbody\n"; "no blank line above")]
    #[test_case("P\n\nA.\tlibbaz\n\nbody\n"; "not a number")]
    fn not_numbered(text: &str) {
        assert!(headers(text).is_empty());
    }

    #[test]
    fn separator_needs_blank_line_below() {
        let text = "P\n\n-----\nlibfoo\n\nbody\n";
        assert!(headers(text).is_empty());
    }

    #[test]
    fn first_and_last_lines_never_start_a_header() {
        assert!(headers("-----\n\nlibfoo").is_empty());
        assert!(headers("P\n\n1.\tlibfoo").is_empty());
    }

    #[test]
    fn separator_without_name_is_ignored() {
        let text = "P\n\n-----\n\n\nbody\n";
        assert!(headers(text).is_empty());
    }

    #[test]
    fn trailing_separator_in_name_defers_to_underlined() {
        let text = "P\n\n=====\n\nlibfoo\n-----\n\nbody\n";
        assert_eq!(summary(text), [("libfoo".to_string(), "underlined", 4, 2)]);
    }

    #[test]
    fn embedded_separator_in_name_is_malformed() {
        let text = "P\n\n=====\n\n-----\n=====\n\nbody\n";
        let lines: Vec<&str> = text.lines().collect();
        let error = recognize(&lines).unwrap_err();
        assert_eq!(
            error,
            MalformedHeaderError {
                separator_line: 3,
                embedded_line: 5,
            }
        );
    }

    #[test]
    fn numbered_line_inside_separated_name_is_not_a_second_header() {
        let text = "P\n\n-----\n\n1.\tlibfoo\n\nbody\n";
        assert_eq!(summary(text), [("1.\tlibfoo".to_string(), "separated", 2, 3)]);
    }

    #[test]
    fn mixed_formats_are_found_in_order() {
        let text = "\
Notices

----------

alpha

alpha body

beta
====

beta body

3.\tgamma

gamma body
";
        assert_eq!(
            summary(text),
            [
                ("alpha".to_string(), "separated", 2, 3),
                ("beta".to_string(), "underlined", 8, 2),
                ("gamma".to_string(), "numbered", 13, 1),
            ]
        );
    }

    #[test]
    fn header_lines_reconstruct_format() {
        let text = "P\n\n=====\n\nlibfoo\nv1\n\nbody\n\nlibbar\n---\n\nbody\n";
        let found = headers(text);
        assert_eq!(found[0].lines(), ["=====", "", "libfoo", "v1"]);
        assert_eq!(found[1].lines(), ["libbar", "---"]);
    }

    #[test]
    fn names_are_trimmed() {
        let text = "P\n\n-----\n\n   libfoo   \n\nbody\n";
        assert_eq!(headers(text)[0].name().as_str(), "libfoo");
    }
}
