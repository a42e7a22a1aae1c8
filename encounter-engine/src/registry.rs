//! Location registry: every location's weight tables, built once at startup
//! and read-only afterwards.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::DataLoader;
use crate::data::{CoverageTable, RawRow};
use crate::links::LinkTable;
use crate::names::strip_version_tag;
use crate::slot::TimeSlot;
use crate::table::{SlotTable, TableError, WeightTables};

/// Errors raised while loading the registry. All of them are fatal: a
/// location with incomplete weight data is never served.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("data source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("location `{location}`: {source}")]
    Table {
        location: String,
        #[source]
        source: TableError,
    },
    #[error("location `{name}` is defined more than once")]
    DuplicateLocation { name: String },
    #[error("location name must not be blank")]
    BlankLocation,
}

/// Lookup form of a location name: trimmed, single-spaced, lowercase.
#[must_use]
pub fn normalize_location_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    key: String,
    coverage: CoverageTable,
    tables: WeightTables,
}

impl Location {
    /// Build a location from its backing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight tables cannot be built (see [`WeightTables::build`]).
    pub fn build(name: &str, coverage: CoverageTable, rows: &[RawRow]) -> Result<Self, TableError> {
        let tables = WeightTables::build(&coverage, rows)?;
        Ok(Self {
            name: name.split_whitespace().collect::<Vec<_>>().join(" "),
            key: normalize_location_key(name),
            coverage,
            tables,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized lookup key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn coverage(&self) -> &CoverageTable {
        &self.coverage
    }

    #[must_use]
    pub const fn tables(&self) -> &WeightTables {
        &self.tables
    }

    #[must_use]
    pub const fn slot_table(&self, slot: TimeSlot) -> &SlotTable {
        self.tables.slot(slot)
    }

    /// Slots (in display order) where `base_name` can be encountered.
    #[must_use]
    pub fn slots_with(&self, base_name: &str) -> Vec<TimeSlot> {
        TimeSlot::ALL
            .into_iter()
            .filter(|slot| self.slot_table(*slot).has_outcome(base_name))
            .collect()
    }

    /// `"Name"` when found in every slot, `"Name (Dawn, Night)"` for a subset,
    /// `None` when absent.
    #[must_use]
    pub fn habitat_label(&self, base_name: &str) -> Option<String> {
        let slots = self.slots_with(base_name);
        if slots.is_empty() {
            return None;
        }
        if slots.len() == TimeSlot::ALL.len() {
            return Some(self.name.clone());
        }
        let labels: Vec<&str> = slots.iter().map(|slot| slot.label()).collect();
        Some(format!("{} ({})", self.name, labels.join(", ")))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationRegistry {
    locations: BTreeMap<String, Location>,
    links: LinkTable,
}

impl LocationRegistry {
    /// Load every location the loader knows about, plus its link table.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader fails, a location's tables are invalid,
    /// or two locations normalize to the same key.
    pub fn load<L: DataLoader>(loader: &L) -> Result<Self, RegistryError> {
        let source = |err: L::Error| RegistryError::Source(Box::new(err));
        let mut locations = Vec::new();
        for name in loader.location_names().map_err(source)? {
            let key = normalize_location_key(&name);
            if key.is_empty() {
                return Err(RegistryError::BlankLocation);
            }
            let coverage = loader.load_coverage(&key).map_err(source)?;
            let rows = loader.load_rows(&key).map_err(source)?;
            let location =
                Location::build(&name, coverage, &rows).map_err(|err| RegistryError::Table {
                    location: name.clone(),
                    source: err,
                })?;
            locations.push(location);
        }
        let links = loader.load_links().map_err(source)?;
        let registry = Self::from_locations(locations, links)?;
        log::debug!(
            "Location registry | locations:{} links:{}",
            registry.len(),
            registry.links.len()
        );
        Ok(registry)
    }

    /// Assemble a registry from already built locations.
    ///
    /// # Errors
    ///
    /// Returns an error if two locations share a normalized key.
    pub fn from_locations<I>(locations: I, links: LinkTable) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Location>,
    {
        let mut by_key = BTreeMap::new();
        for location in locations {
            if by_key.contains_key(location.key()) {
                return Err(RegistryError::DuplicateLocation {
                    name: location.name,
                });
            }
            by_key.insert(location.key.clone(), location);
        }
        Ok(Self {
            locations: by_key,
            links,
        })
    }

    /// Look up a location by name, ignoring case and extra whitespace.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(&normalize_location_key(name))
    }

    /// 1-based position in alphabetical order.
    #[must_use]
    pub fn by_position(&self, position: usize) -> Option<&Location> {
        position
            .checked_sub(1)
            .and_then(|idx| self.locations.values().nth(idx))
    }

    /// Locations in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    #[must_use]
    pub const fn links(&self) -> &LinkTable {
        &self.links
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Every location (alphabetical) where `name` can be encountered; see
    /// [`Location::habitat_label`]. Version tags on `name` are ignored.
    #[must_use]
    pub fn locate(&self, name: &str) -> Vec<String> {
        let base_name = strip_version_tag(name);
        if base_name.is_empty() {
            return Vec::new();
        }
        self.iter()
            .filter_map(|location| location.habitat_label(&base_name))
            .collect()
    }
}
