//! Validation of user-facing query parameters.
//!
//! Location and slot have no safe default and are rejected outright. Category
//! and power are optional refinements: bad values degrade (category never
//! matches, power becomes zero) and are reported as warnings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::bias::BiasPolicy;
use crate::constants::MAX_POWER_LEVEL;
use crate::outcome::{Category, Version};
use crate::registry::{Location, LocationRegistry};
use crate::slot::TimeSlot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown location `{input}`")]
    UnknownLocation { input: String },
    #[error("unknown time slot `{input}` (expected Dawn, Day, Dusk, Night or 0-3)")]
    UnknownSlot { input: String },
    #[error("unknown game version `{input}` (expected Scarlet or Violet)")]
    UnknownVersion { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryWarning {
    UnknownCategory { input: String },
    PowerOutOfRange { level: i64 },
    PowerWithoutCategory { level: u8 },
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory { input } => {
                write!(f, "unknown category `{input}`; power will match nothing")
            }
            Self::PowerOutOfRange { level } => {
                write!(f, "power level {level} outside 0-{MAX_POWER_LEVEL}; using no power")
            }
            Self::PowerWithoutCategory { level } => {
                write!(f, "power level {level} set without a category")
            }
        }
    }
}

/// Raw parameters as they arrive from the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QueryParams {
    pub location: String,
    pub slot: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub power: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery<'r> {
    pub location: &'r Location,
    pub slot: TimeSlot,
    pub bias: BiasPolicy,
    pub warnings: Vec<QueryWarning>,
}

/// Parse a game version.
///
/// # Errors
///
/// Returns [`QueryError::UnknownVersion`] for anything but Scarlet or Violet.
pub fn parse_version(input: &str) -> Result<Version, QueryError> {
    Version::parse(input).ok_or_else(|| QueryError::UnknownVersion {
        input: input.trim().to_string(),
    })
}

fn resolve_location<'r>(
    registry: &'r LocationRegistry,
    input: &str,
) -> Result<&'r Location, QueryError> {
    let trimmed = input.trim();
    let by_name = registry.get(trimmed);
    let by_position = || {
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|position| registry.by_position(position))
    };
    by_name
        .or_else(by_position)
        .ok_or_else(|| QueryError::UnknownLocation {
            input: trimmed.to_string(),
        })
}

fn resolve_power(power: i64, warnings: &mut Vec<QueryWarning>) -> u8 {
    match u8::try_from(power) {
        Ok(level) if level <= MAX_POWER_LEVEL => level,
        _ => {
            warnings.push(QueryWarning::PowerOutOfRange { level: power });
            0
        }
    }
}

fn resolve_category(input: Option<&str>, warnings: &mut Vec<QueryWarning>) -> Option<Category> {
    let trimmed = input.map(str::trim).filter(|text| !text.is_empty())?;
    let category = Category::parse(trimmed);
    if category.is_none() {
        warnings.push(QueryWarning::UnknownCategory {
            input: trimmed.to_string(),
        });
    }
    category
}

impl QueryParams {
    #[must_use]
    pub fn new(location: &str, slot: &str) -> Self {
        Self {
            location: location.to_string(),
            slot: slot.to_string(),
            category: None,
            power: 0,
        }
    }

    #[must_use]
    pub fn with_power(mut self, category: &str, power: i64) -> Self {
        self.category = Some(category.to_string());
        self.power = power;
        self
    }

    /// Resolve against the registry. Locations match by name (any case) or by
    /// 1-based alphabetical position; slots by label or `0..=3`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location or slot is not recognised.
    pub fn validate<'r>(
        &self,
        registry: &'r LocationRegistry,
    ) -> Result<ResolvedQuery<'r>, QueryError> {
        let location = resolve_location(registry, &self.location)?;
        let slot = TimeSlot::parse(&self.slot).ok_or_else(|| QueryError::UnknownSlot {
            input: self.slot.trim().to_string(),
        })?;

        let mut warnings = Vec::new();
        let level = resolve_power(self.power, &mut warnings);
        let category = resolve_category(self.category.as_deref(), &mut warnings);
        let category_blank = self
            .category
            .as_deref()
            .is_none_or(|text| text.trim().is_empty());
        if level > 0 && category_blank {
            warnings.push(QueryWarning::PowerWithoutCategory { level });
        }
        for warning in &warnings {
            log::warn!("Encounter query | {warning}");
        }

        Ok(ResolvedQuery {
            location,
            slot,
            bias: BiasPolicy::new(category, level),
            warnings,
        })
    }
}
