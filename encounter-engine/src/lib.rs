//! Encounter Engine
//!
//! Weighted wild-encounter selection over per-location, per-time-slot tables.
//! This crate holds the selection logic only; data packs arrive through
//! [`DataLoader`] and every query receives its random source from the caller.

pub mod bias;
pub mod constants;
pub mod data;
pub mod filter;
pub mod links;
pub mod names;
pub mod numbers;
pub mod outcome;
pub mod query;
pub mod ranges;
pub mod registry;
pub mod request;
pub mod selection;
pub mod slot;
pub mod table;

// Re-export commonly used types
pub use bias::{BiasPolicy, activation_probability};
pub use data::{CoverageTable, DataError, LocationData, RawRow, RegionData};
pub use filter::{EligibilityFilter, RestrictionSet, version_compatible};
pub use links::{ExclusionSet, LinkTable};
pub use names::{NameIndex, split_names, strip_version_tag, with_version_tag};
pub use outcome::{Category, OutcomeId, Version, key_name};
pub use query::{QueryError, QueryParams, QueryWarning, ResolvedQuery, parse_version};
pub use registry::{Location, LocationRegistry, RegistryError};
pub use request::{
    DistributionReport, DistributionRow, EncounterRequest, GenerateReport, LocateReport,
};
pub use selection::{
    Distribution, DistributionEntry, DrawOutcome, SelectionQuery, distribution, draw,
};
pub use slot::TimeSlot;
pub use table::{SlotEntry, SlotTable, TableError, WeightTables};

use rand::Rng;

use crate::names::title_case;

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Names of every location the source provides tables for.
    ///
    /// # Errors
    ///
    /// Returns an error if the location list cannot be read.
    fn location_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Sub-region coverage fractions for one location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location has no coverage data.
    fn load_coverage(&self, location_key: &str) -> Result<CoverageTable, Self::Error>;

    /// Raw encounter rows for one location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location has no row data.
    fn load_rows(&self, location_key: &str) -> Result<Vec<RawRow>, Self::Error>;

    /// Family link table shared by every location.
    ///
    /// # Errors
    ///
    /// Returns an error if the link table cannot be loaded.
    fn load_links(&self) -> Result<LinkTable, Self::Error>;
}

/// Main engine answering encounter requests against a loaded registry
#[derive(Debug, Clone)]
pub struct EncounterEngine {
    registry: LocationRegistry,
    names: NameIndex,
}

impl EncounterEngine {
    /// Build the registry from `loader` and index every known outcome name.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be loaded or fails validation.
    pub fn load<L: DataLoader>(loader: &L) -> Result<Self, RegistryError> {
        LocationRegistry::load(loader).map(Self::from_registry)
    }

    #[must_use]
    pub fn from_registry(registry: LocationRegistry) -> Self {
        let mut names = NameIndex::new();
        for location in registry.iter() {
            for slot in TimeSlot::ALL {
                for entry in location.slot_table(slot).iter() {
                    names.insert(&entry.id().display_name());
                }
            }
        }
        let links = registry.links();
        for name in links.names() {
            names.insert(name);
            for relative in links.related(name).unwrap_or_default() {
                names.insert(relative);
            }
        }
        log::debug!(
            "Encounter engine ready | locations:{} names:{}",
            registry.len(),
            names.len()
        );
        Self { registry, names }
    }

    #[must_use]
    pub const fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn names(&self) -> &NameIndex {
        &self.names
    }

    /// Draw one encounter for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request names an unknown location or slot.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &EncounterRequest,
        rng: &mut R,
    ) -> Result<GenerateReport, QueryError> {
        let resolved = request.params().validate(&self.registry)?;
        let exclusions = request.exclusions(self.registry.links());
        let restriction = request.restriction();
        let query = SelectionQuery {
            version: request.version,
            slot: resolved.slot,
            bias: resolved.bias,
            exclusions: &exclusions,
            check_exclusions: request.check_duplicates,
            restriction: &restriction,
        };
        let outcome = draw(resolved.location, &query, rng);
        Ok(GenerateReport::new(&outcome, resolved.warnings))
    }

    /// Ranked distribution of every outcome `request` could produce.
    ///
    /// # Errors
    ///
    /// Returns an error if the request names an unknown location or slot.
    pub fn distribution(
        &self,
        request: &EncounterRequest,
    ) -> Result<DistributionReport, QueryError> {
        let resolved = request.params().validate(&self.registry)?;
        let exclusions = request.exclusions(self.registry.links());
        let restriction = request.restriction();
        let query = SelectionQuery {
            version: request.version,
            slot: resolved.slot,
            bias: resolved.bias,
            exclusions: &exclusions,
            check_exclusions: request.check_duplicates,
            restriction: &restriction,
        };
        let ranked = distribution(resolved.location, &query);
        Ok(DistributionReport::new(ranked, resolved.warnings))
    }

    /// Every location where `name` appears. Unknown names are echoed back
    /// title-cased with no locations.
    #[must_use]
    pub fn locate(&self, name: &str) -> LocateReport {
        let canonical = self
            .names
            .resolve(name)
            .map_or_else(|| title_case(name), str::to_string);
        LocateReport {
            locations: self.registry.locate(&canonical),
            name: canonical,
        }
    }
}
