//! Merging sections harvested from upstream sources into the local document.

use std::{collections::HashSet, fmt};

use crate::domain::{Document, Section, SectionName};

/// Where an external document came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// Identifier of the upstream source.
    pub source: String,
    /// The candidate path the document was found at.
    pub path: String,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.path)
    }
}

/// A notices document harvested from an upstream source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocument {
    /// Where the document was found.
    pub provenance: Provenance,
    /// The parsed document.
    pub document: Document,
}

/// A section name, and the source it was seen in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSection {
    /// The section's name.
    pub name: SectionName,
    /// The source the section was taken from.
    pub provenance: Provenance,
}

/// The outcome of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// The local document with every new section appended.
    pub document: Document,
    /// Sections appended to the local document, in the order they were
    /// appended.
    pub imported: Vec<ImportedSection>,
    /// External sections the local document already has.
    pub already_imported: Vec<ImportedSection>,
}

impl MergeResult {
    /// Whether the merge left the local document unchanged.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.imported.is_empty()
    }
}

/// Merges external documents into the local one.
///
/// Sections are matched by name, ignoring case. The local document's sections
/// are kept as they are, in their original order. External sections the local
/// document lacks are appended as one block sorted by name; a name found in
/// several external documents is imported once, from the first document that
/// has it.
#[must_use]
pub fn merge(local: &Document, externals: &[ExternalDocument]) -> MergeResult {
    let local_names: HashSet<&SectionName> =
        local.sections().iter().map(Section::name).collect();

    let mut seen: HashSet<&SectionName> = HashSet::new();
    let mut new_sections: Vec<(&Section, &Provenance)> = Vec::new();
    let mut already_imported = Vec::new();

    let all_external_sections = externals.iter().flat_map(|external| {
        external
            .document
            .sections()
            .iter()
            .map(move |section| (section, &external.provenance))
    });

    for (section, provenance) in all_external_sections {
        if local_names.contains(section.name()) {
            already_imported.push(ImportedSection {
                name: section.name().clone(),
                provenance: provenance.clone(),
            });
        } else if seen.insert(section.name()) {
            new_sections.push((section, provenance));
        } else {
            tracing::debug!(
                section = %section.name(),
                source = %provenance,
                "section already supplied by an earlier source"
            );
        }
    }

    new_sections.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));

    let mut sections = local.sections().clone();
    let mut imported = Vec::with_capacity(new_sections.len());
    for (section, provenance) in new_sections {
        tracing::info!(section = %section.name(), source = %provenance, "importing section");
        sections.push(section.clone());
        imported.push(ImportedSection {
            name: section.name().clone(),
            provenance: provenance.clone(),
        });
    }

    MergeResult {
        document: Document::new(local.preamble().to_string(), sections),
        imported,
        already_imported,
    }
}
