//! Link table relating each outcome to its family, and the per-query
//! exclusion set derived from it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::names::{same_name, strip_version_tag};

/// Base name → related base names (the whole family, usually including itself).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkTable {
    links: BTreeMap<String, Vec<String>>,
}

impl LinkTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, related: Vec<String>) {
        self.links.insert(name.into(), related);
    }

    /// Related names for `name`, matched case-insensitively and ignoring version tags.
    #[must_use]
    pub fn related(&self, name: &str) -> Option<&[String]> {
        self.links
            .iter()
            .find(|(key, _)| same_name(key, name))
            .map(|(_, related)| related.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Union of the families of every held name. Held names without a link
    /// entry contribute nothing.
    pub fn exclusion_set<'a, I>(&self, held: I) -> ExclusionSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut exclusions = ExclusionSet::new();
        for name in held {
            match self.related(name) {
                Some(related) => {
                    for relative in related {
                        exclusions.insert(relative);
                    }
                }
                None => log::debug!("held outcome {name:?} has no link entry"),
            }
        }
        exclusions
    }
}

/// Names a single query must treat as ineligible. Stored normalized
/// (lowercase, version tag removed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

fn normalize(name: &str) -> String {
    strip_version_tag(name).to_lowercase()
}

impl ExclusionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        let normalized = normalize(name);
        if !normalized.is_empty() {
            self.names.insert(normalized);
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        !self.names.is_empty() && self.names.contains(&normalize(name))
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

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}
