//! Per-slot weight tables built from coverage fractions and raw rows.

use std::collections::HashMap;
use thiserror::Error;

use crate::constants::ID_SEPARATOR;
use crate::data::{CoverageTable, RawRow};
use crate::names::same_name;
use crate::outcome::OutcomeId;
use crate::slot::TimeSlot;

/// Errors raised while building a location's weight tables.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("row {row} references unknown subregion `{subregion}`")]
    UnknownSubregion { row: usize, subregion: String },
    #[error("row {row} is malformed: {reason}")]
    MalformedRow { row: usize, reason: &'static str },
    #[error("coverage for `{subregion}` must be between 0 and 1 (got {value})")]
    InvalidCoverage { subregion: String, value: f64 },
}

/// One outcome's accumulated weight in a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotEntry {
    id: OutcomeId,
    key: String,
    weight: f64,
}

impl SlotEntry {
    #[must_use]
    pub const fn id(&self) -> &OutcomeId {
        &self.id
    }

    /// Legacy composite key, e.g. `"Gyarados_Water_Flying"`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Insertion-ordered outcome → weight table for one time slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotTable {
    entries: Vec<SlotEntry>,
    index: HashMap<String, usize>,
}

impl SlotTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `contribution` to `id`'s weight, inserting it on first sight.
    /// Keys compare case-insensitively.
    pub(crate) fn accumulate(&mut self, id: &OutcomeId, contribution: f64) {
        let key = id.key();
        let lookup = key.to_lowercase();
        if let Some(&idx) = self.index.get(&lookup) {
            self.entries[idx].weight += contribution;
            return;
        }
        self.index.insert(lookup, self.entries.len());
        self.entries.push(SlotEntry {
            id: id.clone(),
            key,
            weight: contribution,
        });
    }

    #[must_use]
    pub fn weight_of(&self, key: &str) -> Option<f64> {
        self.index
            .get(&key.to_lowercase())
            .map(|&idx| self.entries[idx].weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(SlotEntry::weight).sum()
    }

    /// Whether an outcome with this base name (tags ignored) can appear,
    /// i.e. is present with a positive weight.
    #[must_use]
    pub fn has_outcome(&self, base_name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.weight > 0.0 && same_name(entry.id.base_name(), base_name))
    }
}

/// The four slot tables of one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTables {
    slots: [SlotTable; 4],
}

impl WeightTables {
    /// Combine raw rows with coverage fractions.
    ///
    /// # Errors
    ///
    /// Returns an error if a row names a subregion missing from `coverage`,
    /// a row has no name or category, a name or category contains
    /// [`ID_SEPARATOR`], or a coverage fraction is outside `0..=1`.
    pub fn build(coverage: &CoverageTable, rows: &[RawRow]) -> Result<Self, TableError> {
        for (subregion, &value) in coverage {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TableError::InvalidCoverage {
                    subregion: subregion.clone(),
                    value,
                });
            }
        }

        let mut tables = Self::default();
        for (row_idx, row) in rows.iter().enumerate() {
            if row.name.trim().is_empty() {
                return Err(TableError::MalformedRow {
                    row: row_idx,
                    reason: "missing name",
                });
            }
            if row.category_a.trim().is_empty() {
                return Err(TableError::MalformedRow {
                    row: row_idx,
                    reason: "missing category",
                });
            }
            if row.name.contains(ID_SEPARATOR) {
                return Err(TableError::MalformedRow {
                    row: row_idx,
                    reason: "name contains separator",
                });
            }
            if row.category_a.contains(ID_SEPARATOR) || row.category_b.contains(ID_SEPARATOR) {
                return Err(TableError::MalformedRow {
                    row: row_idx,
                    reason: "category contains separator",
                });
            }
            let Some(&multiplier) = coverage.get(row.subregion.trim()) else {
                return Err(TableError::UnknownSubregion {
                    row: row_idx,
                    subregion: row.subregion.clone(),
                });
            };

            let id = OutcomeId::from_row(&row.name, &row.category_a, &row.category_b);
            for slot in TimeSlot::ALL {
                let contribution = f64::from(row.weight(slot)) * multiplier;
                tables.slots[slot.index()].accumulate(&id, contribution);
            }
        }
        Ok(tables)
    }

    #[must_use]
    pub const fn slot(&self, slot: TimeSlot) -> &SlotTable {
        &self.slots[slot.index()]
    }
}
