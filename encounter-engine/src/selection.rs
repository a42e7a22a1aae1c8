//! Encounter selection: one weighted draw, or the full ranked distribution.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bias::BiasPolicy;
use crate::constants::NONE_OUTCOME;
use crate::filter::{EligibilityFilter, RestrictionSet};
use crate::links::ExclusionSet;
use crate::numbers::truncate_percentage;
use crate::outcome::{Version, key_name};
use crate::ranges::WeightedRanges;
use crate::registry::Location;
use crate::slot::TimeSlot;
use crate::table::{SlotEntry, SlotTable};

/// Everything a single selection needs besides the location.
#[derive(Debug, Clone, Copy)]
pub struct SelectionQuery<'a> {
    pub version: Version,
    pub slot: TimeSlot,
    pub bias: BiasPolicy,
    pub exclusions: &'a ExclusionSet,
    /// When false the exclusion set is never consulted, even if non-empty.
    pub check_exclusions: bool,
    pub restriction: &'a RestrictionSet,
}

impl<'a> SelectionQuery<'a> {
    #[must_use]
    pub fn filter(&self) -> EligibilityFilter<'a> {
        let exclusions = self.check_exclusions.then_some(self.exclusions);
        EligibilityFilter::new(self.version, exclusions, self.restriction)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'t> {
    entry: &'t SlotEntry,
    matches_category: bool,
}

fn eligible_candidates<'t>(
    table: &'t SlotTable,
    query: &SelectionQuery<'_>,
) -> Vec<Candidate<'t>> {
    let filter = query.filter();
    table
        .iter()
        .filter(|entry| filter.is_eligible(entry.key()))
        .map(|entry| Candidate {
            entry,
            matches_category: query.bias.matches(entry.key()),
        })
        .collect()
}

/// Result of a single draw. `outcome` is `None` when nothing was eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub location: String,
    pub slot: TimeSlot,
    pub outcome: Option<String>,
    pub bias_active: bool,
}

impl DrawOutcome {
    /// Drawn name, or `"None"` for an empty pool.
    #[must_use]
    pub fn outcome_name(&self) -> &str {
        self.outcome.as_deref().unwrap_or(NONE_OUTCOME)
    }
}

/// Draw one outcome from `location` for the query's slot.
pub fn draw<R: Rng + ?Sized>(
    location: &Location,
    query: &SelectionQuery<'_>,
    rng: &mut R,
) -> DrawOutcome {
    let table = location.slot_table(query.slot);
    let bias_active = query.bias.roll_active(rng);

    let candidates = eligible_candidates(table, query);
    let mut ranges = WeightedRanges::with_capacity(candidates.len());
    for candidate in &candidates {
        if bias_active && !candidate.matches_category {
            continue;
        }
        ranges.push(candidate.entry, candidate.entry.weight());
    }

    log::debug!(
        "Encounter draw | location:{} slot:{} power_active:{} eligible:{} pool:{} total:{:.4}",
        location.name(),
        query.slot,
        bias_active,
        candidates.len(),
        ranges.len(),
        ranges.total()
    );

    let outcome = ranges.sample(rng).map(|(entry, roll)| {
        log::debug!("Encounter draw | roll {roll:.4} picked {}", entry.key());
        key_name(entry.key()).to_string()
    });

    DrawOutcome {
        location: location.name().to_string(),
        slot: query.slot,
        outcome,
        bias_active,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Name segment of the key, including any version tag.
    pub name: String,
    pub key: String,
    /// Exact fraction of the effective total.
    pub share: f64,
    /// `share` as a percentage truncated to four decimal places.
    pub percentage: f64,
    pub matches_category: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub location: String,
    pub slot: TimeSlot,
    pub entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Drop entries that cannot be encountered under the query.
    #[must_use]
    pub fn nonzero(mut self) -> Self {
        self.entries.retain(|entry| entry.share > 0.0);
        self
    }

    #[must_use]
    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().map(|entry| entry.percentage).sum()
    }

    #[must_use]
    pub fn percentage_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.percentage)
    }

    /// `(name, percentage)` pairs in ranked order.
    #[must_use]
    pub fn rows(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.percentage))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Full distribution over every eligible outcome, highest percentage first.
/// Ties keep table order. Zero-share entries are included; see [`Distribution::nonzero`].
#[must_use]
pub fn distribution(location: &Location, query: &SelectionQuery<'_>) -> Distribution {
    let table = location.slot_table(query.slot);
    let candidates = eligible_candidates(table, query);

    let mut ranges = WeightedRanges::with_capacity(candidates.len());
    for candidate in &candidates {
        let weight = query
            .bias
            .effective_weight(candidate.matches_category, candidate.entry.weight());
        ranges.push(*candidate, weight);
    }

    let mut entries: Vec<DistributionEntry> = ranges
        .shares()
        .map(|(candidate, share)| DistributionEntry {
            name: key_name(candidate.entry.key()).to_string(),
            key: candidate.entry.key().to_string(),
            share,
            percentage: truncate_percentage(share),
            matches_category: candidate.matches_category,
        })
        .collect();
    entries.sort_by(|a, b| b.share.total_cmp(&a.share));

    log::debug!(
        "Encounter distribution | location:{} slot:{} eligible:{} total:{:.4}",
        location.name(),
        query.slot,
        entries.len(),
        ranges.total()
    );

    Distribution {
        location: location.name().to_string(),
        slot: query.slot,
        entries,
    }
}
