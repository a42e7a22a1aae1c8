//! Name tagging and validation helpers.
//!
//! The engine itself never validates names; these helpers sit at the request
//! boundary and turn free text into the tagged names the engine consumes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::outcome::Version;

static VERSION_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\((scarlet|violet)\)\s*").expect("version tag pattern is valid")
});

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a trailing-or-embedded version tag off a name.
///
/// `"Larvitar (Scarlet)"` becomes `("Larvitar", Some(Version::Scarlet))`.
#[must_use]
pub fn split_version_tag(name: &str) -> (String, Option<Version>) {
    let version = VERSION_TAG
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|tag| Version::parse(tag.as_str()));
    (strip_version_tag(name), version)
}

/// Remove any version tag, trimming and collapsing whitespace.
#[must_use]
pub fn strip_version_tag(name: &str) -> String {
    collapse_whitespace(&VERSION_TAG.replace_all(name, " "))
}

/// Apply `version`'s tag to `name`, replacing any tag already present.
#[must_use]
pub fn with_version_tag(name: &str, version: Version) -> String {
    format!("{} {}", strip_version_tag(name), version.tag())
}

/// Case-insensitive comparison ignoring version tags.
#[must_use]
pub fn same_name(left: &str, right: &str) -> bool {
    strip_version_tag(left).to_lowercase() == strip_version_tag(right).to_lowercase()
}

/// Split comma or newline separated free text into trimmed, non-empty names.
#[must_use]
pub fn split_names(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(collapse_whitespace)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Title-case each whitespace separated word.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Index of recognised outcome names in their canonical (possibly tagged) form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    names: Vec<String>,
}

impl NameIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a canonical name; names equal up to case and tag are kept once,
    /// preferring the tagged spelling.
    pub fn insert(&mut self, name: &str) {
        let canonical = collapse_whitespace(name);
        if canonical.is_empty() {
            return;
        }
        if let Some(existing) = self
            .names
            .iter_mut()
            .find(|existing| same_name(existing, &canonical))
        {
            if split_version_tag(existing).1.is_none() && split_version_tag(&canonical).1.is_some()
            {
                *existing = canonical;
            }
            return;
        }
        self.names.push(canonical);
    }

    /// Resolve free text to the canonical name it denotes.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| same_name(name, text))
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.resolve(text).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::new();
        for name in iter {
            index.insert(name.as_ref());
        }
        index
    }
}
