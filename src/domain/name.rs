use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
};

use non_empty_string::NonEmptyString;

/// The title of a section, identifying one upstream dependency.
///
/// A name may span several lines (joined with `\n`). Names are compared
/// case-insensitively: `"Foo"` and `"foo"` identify the same section. Equality,
/// ordering and hashing all use the same lowercase folding, so a
/// [`SectionName`] can be used directly as a set or map key for
/// deduplication.
#[derive(Debug, Clone)]
pub struct SectionName(NonEmptyString);

impl SectionName {
    /// Creates a new `SectionName`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the string is empty.
    pub fn new(name: String) -> Result<Self, EmptyNameError> {
        NonEmptyString::new(name)
            .map(Self)
            .map_err(|_| EmptyNameError)
    }

    /// Builds a name from the lines of a header, joined with line breaks.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if there are no lines, or the joined text is
    /// empty.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, EmptyNameError> {
        Self::new(lines.into_iter().collect::<Vec<_>>().join("\n"))
    }

    /// Returns the name as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The individual lines of the name.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.as_str().lines()
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.as_str().chars().flat_map(char::to_lowercase)
    }
}

impl PartialEq for SectionName {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SectionName {}

impl PartialOrd for SectionName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SectionName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl Hash for SectionName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
    }
}

impl Deref for SectionName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for SectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for SectionName {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl TryFrom<String> for SectionName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Error returned when constructing a [`SectionName`] from an empty string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("section name cannot be empty")]
pub struct EmptyNameError;

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use test_case::test_case;

    use super::*;

    fn name(s: &str) -> SectionName {
        SectionName::try_from(s).unwrap()
    }

    #[test_case("Foo", "foo"; "simple case change")]
    #[test_case("OpenSSL", "openssl"; "mixed case")]
    #[test_case("Ärger", "äRGER"; "non-ascii")]
    #[test_case("Foo\nBar", "FOO\nbar"; "multi-line")]
    fn names_match_ignoring_case(left: &str, right: &str) {
        assert_eq!(name(left), name(right));
    }

    #[test_case("Foo", "Foo "; "trailing space")]
    #[test_case("Foo\nBar", "Foo Bar"; "line break is significant")]
    #[test_case("zlib", "libz"; "different names")]
    fn names_differ(left: &str, right: &str) {
        assert_ne!(name(left), name(right));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(SectionName::new(String::new()), Err(EmptyNameError));
        assert_eq!(SectionName::from_lines(Vec::<&str>::new()), Err(EmptyNameError));
    }

    #[test]
    fn from_lines_joins_with_line_breaks() {
        let joined = SectionName::from_lines(["First", "Second"]).unwrap();
        assert_eq!(joined.as_str(), "First\nSecond");
        assert_eq!(joined.lines().collect::<Vec<_>>(), ["First", "Second"]);
    }

    #[test]
    fn ordering_ignores_case() {
        let sorted: Vec<_> = BTreeSet::from([name("beta"), name("Alpha"), name("GAMMA")])
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(sorted, ["Alpha", "beta", "GAMMA"]);
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        let set = HashSet::from([name("Foo"), name("FOO"), name("foo")]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&name("fOO")));
    }

    #[test]
    fn display_preserves_original_case() {
        assert_eq!(name("LibFoo").to_string(), "LibFoo");
    }
}
