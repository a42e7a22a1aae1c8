use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::DataLoader;
use crate::links::LinkTable;
use crate::registry::normalize_location_key;
use crate::slot::TimeSlot;

/// Sub-region name → fraction of the location's area it covers.
pub type CoverageTable = BTreeMap<String, f64>;

/// One raw encounter row: a creature seen in one sub-region with integer
/// base weights for dawn, day, dusk and night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    pub category_a: String,
    #[serde(default)]
    pub category_b: String,
    pub subregion: String,
    pub weights: [u32; 4],
}

impl RawRow {
    #[must_use]
    pub fn new(
        name: &str,
        category_a: &str,
        category_b: &str,
        subregion: &str,
        weights: [u32; 4],
    ) -> Self {
        Self {
            name: name.to_string(),
            category_a: category_a.to_string(),
            category_b: category_b.to_string(),
            subregion: subregion.to_string(),
            weights,
        }
    }

    #[must_use]
    pub const fn weight(&self, slot: TimeSlot) -> u32 {
        self.weights[slot.index()]
    }
}

/// Backing tables for a single location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub name: String,
    #[serde(default)]
    pub coverage: CoverageTable,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

/// Container for a whole data pack: every location plus the link table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RegionData {
    pub locations: Vec<LocationData>,
    #[serde(default)]
    pub links: LinkTable,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("no backing tables for location `{key}`")]
    MissingLocation { key: String },
}

impl RegionData {
    /// Create an empty data pack (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a data pack from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid data pack.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn location(&self, key: &str) -> Result<&LocationData, DataError> {
        self.locations
            .iter()
            .find(|location| normalize_location_key(&location.name) == key)
            .ok_or_else(|| DataError::MissingLocation {
                key: key.to_string(),
            })
    }
}

impl DataLoader for RegionData {
    type Error = DataError;

    fn location_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self
            .locations
            .iter()
            .map(|location| location.name.clone())
            .collect())
    }

    fn load_coverage(&self, location_key: &str) -> Result<CoverageTable, Self::Error> {
        self.location(location_key)
            .map(|location| location.coverage.clone())
    }

    fn load_rows(&self, location_key: &str) -> Result<Vec<RawRow>, Self::Error> {
        self.location(location_key)
            .map(|location| location.rows.clone())
    }

    fn load_links(&self) -> Result<LinkTable, Self::Error> {
        Ok(self.links.clone())
    }
}
