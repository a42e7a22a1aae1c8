//! Outcome identifiers, game versions and categories.
//!
//! Weight tables key their entries by the legacy composite string
//! (`"Larvitar (Scarlet)_Rock_Ground"`); [`OutcomeId`] is the structured form
//! that string is rendered from.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{CATEGORY_LABELS, ID_SEPARATOR};
use crate::names::split_version_tag;

/// One of the two mutually exclusive game versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Version {
    #[default]
    Scarlet,
    Violet,
}

impl Version {
    pub const ALL: [Self; 2] = [Self::Scarlet, Self::Violet];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scarlet => "Scarlet",
            Self::Violet => "Violet",
        }
    }

    /// Exclusivity tag embedded in identifiers, e.g. `(Scarlet)`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Scarlet => "(Scarlet)",
            Self::Violet => "(Violet)",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Scarlet => Self::Violet,
            Self::Violet => Self::Scarlet,
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|version| version.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Elemental category an encounter power can favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl Category {
    pub const ALL: [Self; 18] = [
        Self::Normal,
        Self::Fighting,
        Self::Flying,
        Self::Poison,
        Self::Ground,
        Self::Rock,
        Self::Bug,
        Self::Ghost,
        Self::Steel,
        Self::Fire,
        Self::Water,
        Self::Grass,
        Self::Electric,
        Self::Psychic,
        Self::Ice,
        Self::Dragon,
        Self::Dark,
        Self::Fairy,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        CATEGORY_LABELS[self as usize]
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured outcome identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeId {
    base_name: String,
    categories: SmallVec<[String; 2]>,
    version: Option<Version>,
}

impl OutcomeId {
    /// Build an identifier from a raw data row. `name` may carry a version tag
    /// (`"Larvitar (Scarlet)"`); a second category equal to the first is dropped.
    #[must_use]
    pub fn from_row(name: &str, category_a: &str, category_b: &str) -> Self {
        let (base_name, version) = split_version_tag(name);
        let mut categories: SmallVec<[String; 2]> = SmallVec::new();
        let first = category_a.trim();
        let second = category_b.trim();
        categories.push(first.to_string());
        if !second.is_empty() && second != first {
            categories.push(second.to_string());
        }
        Self {
            base_name,
            categories,
            version,
        }
    }

    /// Parse the legacy composite string form.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let mut parts = key.trim().split(ID_SEPARATOR);
        let name = parts.next().filter(|name| !name.trim().is_empty())?;
        let (base_name, version) = split_version_tag(name);
        let categories = parts
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Some(Self {
            base_name,
            categories,
            version,
        })
    }

    /// Name without any version tag.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub const fn version(&self) -> Option<Version> {
        self.version
    }

    /// Name segment of the legacy key, including the version tag if any.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.version {
            Some(version) => format!("{} {}", self.base_name, version.tag()),
            None => self.base_name.clone(),
        }
    }

    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())?;
        for category in &self.categories {
            write!(f, "{ID_SEPARATOR}{category}")?;
        }
        Ok(())
    }
}

/// Name segment of a legacy key: everything before the first separator.
#[must_use]
pub fn key_name(key: &str) -> &str {
    key.split(ID_SEPARATOR).next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_category_rows_collapse_duplicate_category() {
        let id = OutcomeId::from_row("Dugtrio", "Ground", "Ground");
        assert_eq!(id.key(), "Dugtrio_Ground");
        assert_eq!(id.categories().len(), 1);
    }

    #[test]
    fn dual_category_and_tagged_rows_render_legacy_keys() {
        let id = OutcomeId::from_row("Larvitar (Scarlet)", "Rock", "Ground");
        assert_eq!(id.key(), "Larvitar (Scarlet)_Rock_Ground");
        assert_eq!(id.base_name(), "Larvitar");
        assert_eq!(id.version(), Some(Version::Scarlet));
        assert_eq!(id.display_name(), "Larvitar (Scarlet)");
    }

    #[test]
    fn parse_recovers_structure_from_key() {
        let id = OutcomeId::parse("Gyarados_Water_Flying").unwrap();
        assert_eq!(id.base_name(), "Gyarados");
        assert_eq!(id.categories(), ["Water", "Flying"]);
        assert_eq!(id.version(), None);
        assert_eq!(key_name("Deino (Violet)_Dark_Dragon"), "Deino (Violet)");
        assert!(OutcomeId::parse("  ").is_none());
    }

    #[test]
    fn versions_and_categories_parse_case_insensitively() {
        assert_eq!(Version::parse("violet"), Some(Version::Violet));
        assert_eq!(Version::Scarlet.opposite(), Version::Violet);
        assert_eq!(Category::parse(" fire "), Some(Category::Fire));
        assert_eq!(Category::Fairy.label(), "Fairy");
        assert_eq!(Category::parse("Sound"), None);
    }
}
