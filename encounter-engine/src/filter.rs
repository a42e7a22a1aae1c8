//! Eligibility rules: duplicate exclusion, version compatibility and
//! restriction to a named subset.

use crate::links::ExclusionSet;
use crate::outcome::{Version, key_name};

/// Caller-supplied allow-list of substrings. When active it replaces
/// duplicate exclusion for the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestrictionSet {
    needles: Vec<String>,
}

impl RestrictionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank entries are ignored so they cannot match every key.
    pub fn insert(&mut self, needle: &str) {
        let normalized = needle.trim().to_lowercase();
        if !normalized.is_empty() && !self.needles.contains(&normalized) {
            self.needles.push(normalized);
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.needles.is_empty()
    }

    /// Case-insensitive match of any needle starting at a word boundary of
    /// `key`, so `"mime"` finds `"Mr. Mime_Psychic_Fairy"` but `"a"` does not
    /// find `"Banana_Water"`. Partial-name searches must start at a word:
    /// `"pika"` finds `"Pikachu_Electric"` but `"chu"` does not.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let haystack = key.trim().to_lowercase();
        self.needles
            .iter()
            .any(|needle| occurs_at_word_start(&haystack, needle))
    }
}

fn occurs_at_word_start(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|prev| !prev.is_alphanumeric())
    })
}

impl<S: AsRef<str>> FromIterator<S> for RestrictionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for needle in iter {
            set.insert(needle.as_ref());
        }
        set
    }
}

/// A key is compatible unless it carries the other version's tag.
#[must_use]
pub fn version_compatible(version: Version, key: &str) -> bool {
    let foreign_tag = version.opposite().tag().to_lowercase();
    !key.to_lowercase().contains(&foreign_tag)
}

#[derive(Debug, Clone, Copy)]
pub struct EligibilityFilter<'a> {
    version: Version,
    exclusions: Option<&'a ExclusionSet>,
    restriction: &'a RestrictionSet,
}

impl<'a> EligibilityFilter<'a> {
    /// `exclusions` is `None` when duplicate checking is switched off.
    #[must_use]
    pub const fn new(
        version: Version,
        exclusions: Option<&'a ExclusionSet>,
        restriction: &'a RestrictionSet,
    ) -> Self {
        Self {
            version,
            exclusions,
            restriction,
        }
    }

    #[must_use]
    pub fn is_eligible(&self, key: &str) -> bool {
        if !version_compatible(self.version, key) {
            return false;
        }
        if self.restriction.is_active() {
            return self.restriction.matches(key);
        }
        self.exclusions
            .is_none_or(|exclusions| !exclusions.contains(key_name(key)))
    }
}
