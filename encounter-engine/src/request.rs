//! Plain-data request and report shapes for the outer boundary.

use serde::{Deserialize, Serialize};

use crate::filter::RestrictionSet;
use crate::links::{ExclusionSet, LinkTable};
use crate::names::split_names;
use crate::outcome::Version;
use crate::query::{QueryParams, QueryWarning};
use crate::selection::{Distribution, DrawOutcome};
use crate::slot::TimeSlot;

/// One encounter query as submitted by a client.
///
/// `shared_text` is comma or newline separated. With `specific` set it lists
/// the only names that may appear; otherwise it is the held box, whose
/// families are excluded when `check_duplicates` is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EncounterRequest {
    #[serde(default)]
    pub version: Version,
    pub location: String,
    pub slot: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub power: i64,
    #[serde(default)]
    pub check_duplicates: bool,
    #[serde(default)]
    pub shared_text: String,
    #[serde(default)]
    pub specific: bool,
}

impl EncounterRequest {
    #[must_use]
    pub fn new(version: Version, location: &str, slot: &str) -> Self {
        Self {
            version,
            location: location.to_string(),
            slot: slot.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(&self) -> QueryParams {
        QueryParams {
            location: self.location.clone(),
            slot: self.slot.clone(),
            category: self.category.clone(),
            power: self.power,
        }
    }

    /// Names parsed out of `shared_text`.
    #[must_use]
    pub fn shared_names(&self) -> Vec<String> {
        split_names(&self.shared_text)
    }

    /// Allow-list for specific mode; inactive otherwise.
    #[must_use]
    pub fn restriction(&self) -> RestrictionSet {
        if self.specific {
            self.shared_names().into_iter().collect()
        } else {
            RestrictionSet::new()
        }
    }

    /// Families of every held name. Empty in specific mode or when duplicate
    /// checking is off.
    #[must_use]
    pub fn exclusions(&self, links: &LinkTable) -> ExclusionSet {
        if self.specific || !self.check_duplicates {
            return ExclusionSet::new();
        }
        let held = self.shared_names();
        links.exclusion_set(held.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    pub location: String,
    pub slot: TimeSlot,
    /// Drawn name, `"None"` when the pool was empty.
    pub name: String,
    pub power_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QueryWarning>,
}

impl GenerateReport {
    #[must_use]
    pub fn new(outcome: &DrawOutcome, warnings: Vec<QueryWarning>) -> Self {
        Self {
            location: outcome.location.clone(),
            slot: outcome.slot,
            name: outcome.outcome_name().to_string(),
            power_active: outcome.bias_active,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub location: String,
    pub slot: TimeSlot,
    /// Ranked, with zero-percentage outcomes left out.
    pub entries: Vec<DistributionRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QueryWarning>,
}

impl DistributionReport {
    #[must_use]
    pub fn new(distribution: Distribution, warnings: Vec<QueryWarning>) -> Self {
        let distribution = distribution.nonzero();
        let entries = distribution
            .rows()
            .into_iter()
            .map(|(name, percentage)| DistributionRow { name, percentage })
            .collect();
        Self {
            location: distribution.location,
            slot: distribution.slot,
            entries,
            warnings,
        }
    }

    #[must_use]
    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().map(|row| row.percentage).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateReport {
    /// Canonical spelling, version tag included when the name is exclusive.
    pub name: String,
    pub locations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> LinkTable {
        let mut links = LinkTable::new();
        links.insert("Pichu", vec!["Pichu".into(), "Pikachu".into(), "Raichu".into()]);
        links
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let request: EncounterRequest = serde_json::from_str(
            r#"{
                "version": "Violet",
                "location": "Poco Path",
                "slot": "Dusk",
                "category": "Electric",
                "power": 2,
                "checkDuplicates": true,
                "sharedText": "Pikachu, Lechonk"
            }"#,
        )
        .unwrap();
        assert_eq!(request.version, Version::Violet);
        assert_eq!(request.power, 2);
        assert!(request.check_duplicates);
        assert!(!request.specific);
        assert_eq!(request.shared_names(), vec!["Pikachu", "Lechonk"]);
    }

    #[test]
    fn held_box_excludes_families_only_when_checking() {
        let mut request = EncounterRequest::new(Version::Scarlet, "Poco Path", "Day");
        request.shared_text = "pikachu".to_string();
        assert!(request.exclusions(&links()).is_empty());

        request.check_duplicates = true;
        let exclusions = request.exclusions(&links());
        assert!(exclusions.contains("Raichu"));
        assert!(!request.restriction().is_active());
    }

    #[test]
    fn specific_mode_swaps_exclusions_for_restriction() {
        let mut request = EncounterRequest::new(Version::Scarlet, "Poco Path", "Day");
        request.shared_text = "Pichu\nTarountula".to_string();
        request.check_duplicates = true;
        request.specific = true;
        assert!(request.exclusions(&links()).is_empty());
        let restriction = request.restriction();
        assert!(restriction.matches("Tarountula_Bug"));
        assert!(!restriction.matches("Lechonk_Normal"));
    }

    #[test]
    fn generate_report_serializes_without_empty_warnings() {
        let report = GenerateReport {
            location: "Poco Path".to_string(),
            slot: TimeSlot::Dawn,
            name: "None".to_string(),
            power_active: false,
            warnings: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "None");
        assert_eq!(json["powerActive"], false);
        assert!(json.get("warnings").is_none());
    }
}
