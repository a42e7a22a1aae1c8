use std::collections::HashMap;
use std::hash::Hasher;

use encounter_engine::{
    BiasPolicy, Category, CoverageTable, ExclusionSet, Location, RawRow, RestrictionSet,
    SelectionQuery, TimeSlot, Version, distribution, draw,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use twox_hash::XxHash64;

const DRAWS: usize = 20_000;
const TOLERANCE: f64 = 0.015;

fn meadow_coverage() -> CoverageTable {
    CoverageTable::from([
        ("Field".to_string(), 0.5),
        ("Forest".to_string(), 0.3),
        ("Pond".to_string(), 0.2),
    ])
}

fn meadow_rows() -> Vec<RawRow> {
    vec![
        RawRow::new("Pikachu", "Electric", "", "Field", [6, 6, 2, 0]),
        RawRow::new("Pikachu", "Electric", "", "Forest", [4, 4, 4, 8]),
        RawRow::new("Fletchling", "Normal", "Flying", "Field", [10, 10, 5, 0]),
        RawRow::new("Tarountula", "Bug", "", "Forest", [3, 6, 6, 12]),
        RawRow::new("Psyduck", "Water", "", "Pond", [15, 15, 15, 15]),
        RawRow::new("Charcadet (Scarlet)", "Fire", "", "Field", [2, 2, 2, 2]),
        RawRow::new("Charcadet (Violet)", "Fire", "", "Field", [2, 2, 2, 2]),
        RawRow::new("Marill", "Water", "Fairy", "Pond", [0, 0, 0, 0]),
    ]
}

fn meadow() -> Location {
    Location::build("Mesagoza Meadow", meadow_coverage(), &meadow_rows()).expect("meadow tables")
}

fn fire_water() -> Location {
    let coverage = CoverageTable::from([("Field".to_string(), 1.0)]);
    let rows = vec![
        RawRow::new("A", "Fire", "Fire", "Field", [30, 30, 30, 30]),
        RawRow::new("B", "Water", "Water", "Field", [10, 10, 10, 10]),
        RawRow::new("C", "Fire", "Fire", "Field", [10, 10, 10, 10]),
    ];
    Location::build("Fieldtown", coverage, &rows).expect("fieldtown tables")
}

struct Sets {
    exclusions: ExclusionSet,
    restriction: RestrictionSet,
}

impl Sets {
    fn empty() -> Self {
        Self {
            exclusions: ExclusionSet::new(),
            restriction: RestrictionSet::new(),
        }
    }

    fn query(&self, slot: TimeSlot, bias: BiasPolicy) -> SelectionQuery<'_> {
        SelectionQuery {
            version: Version::Scarlet,
            slot,
            bias,
            exclusions: &self.exclusions,
            check_exclusions: true,
            restriction: &self.restriction,
        }
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn repeated_rows_accumulate_weighted_by_coverage() {
    let location = meadow();
    let expected = [
        (TimeSlot::Dawn, 6.0 * 0.5 + 4.0 * 0.3),
        (TimeSlot::Day, 6.0 * 0.5 + 4.0 * 0.3),
        (TimeSlot::Dusk, 2.0 * 0.5 + 4.0 * 0.3),
        (TimeSlot::Night, 8.0 * 0.3),
    ];
    for (slot, weight) in expected {
        let actual = location
            .slot_table(slot)
            .weight_of("Pikachu_Electric")
            .expect("pikachu present in every slot");
        assert!((actual - weight).abs() < 1e-9, "{slot}: {actual} != {weight}");
    }
}

#[test]
fn slot_totals_equal_summed_row_contributions() {
    let location = meadow();
    let coverage = meadow_coverage();
    let rows = meadow_rows();
    for slot in TimeSlot::ALL {
        let expected: f64 = rows
            .iter()
            .map(|row| f64::from(row.weight(slot)) * coverage[&row.subregion])
            .sum();
        let actual = location.slot_table(slot).total_weight();
        assert!((actual - expected).abs() < 1e-9, "{slot}: {actual} != {expected}");
    }
}

#[test]
fn distribution_percentages_never_exceed_one_hundred() {
    let location = meadow();
    let sets = Sets::empty();
    for slot in TimeSlot::ALL {
        for level in 0..=3 {
            for category in [Category::Water, Category::Electric, Category::Dragon] {
                let bias = BiasPolicy::new(Some(category), level);
                let dist = distribution(&location, &sets.query(slot, bias));
                let total = dist.total_percentage();
                assert!(total <= 100.0 + 1e-9, "{slot} {category} {level}: {total}");
                #[allow(clippy::cast_precision_loss)]
                let floor = 100.0 - 0.0001 * dist.len() as f64;
                if dist.entries.iter().any(|entry| entry.share > 0.0) {
                    assert!(total >= floor - 1e-9, "{slot} {category} {level}: {total}");
                }
            }
        }
    }
}

#[test]
fn draws_stay_inside_the_eligible_pool_and_converge() {
    let location = meadow();
    let sets = Sets::empty();
    let query = sets.query(TimeSlot::Day, BiasPolicy::none());
    let dist = distribution(&location, &query);
    let expected: HashMap<&str, f64> = dist
        .entries
        .iter()
        .map(|entry| (entry.name.as_str(), entry.share))
        .collect();

    let mut rng = ChaCha20Rng::seed_from_u64(0x5EED);
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..DRAWS {
        let pick = draw(&location, &query, &mut rng);
        let name = pick.outcome.expect("pool is not empty");
        assert!(expected.contains_key(name.as_str()), "{name} outside pool");
        *counts.entry(name).or_default() += 1;
    }

    assert!(!counts.contains_key("Charcadet (Violet)"));
    assert!(!counts.contains_key("Marill"));
    for (name, share) in &expected {
        let seen = counts.get(*name).copied().unwrap_or_default();
        #[allow(clippy::cast_precision_loss)]
        let observed = seen as f64 / DRAWS as f64;
        assert!(
            (observed - share).abs() < TOLERANCE,
            "{name}: observed {observed:.4} expected {share:.4}"
        );
    }
}

#[test]
fn distribution_is_idempotent() {
    let location = meadow();
    let sets = Sets::empty();
    let query = sets.query(TimeSlot::Dusk, BiasPolicy::new(Some(Category::Water), 2));
    let first = serde_json::to_vec(&distribution(&location, &query)).unwrap();
    let second = serde_json::to_vec(&distribution(&location, &query)).unwrap();
    assert_eq!(snapshot_hash(&first), snapshot_hash(&second));
}

#[test]
fn full_power_only_draws_matching_category() {
    let location = meadow();
    let sets = Sets::empty();
    let query = sets.query(TimeSlot::Night, BiasPolicy::new(Some(Category::Water), 3));
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    for _ in 0..500 {
        let pick = draw(&location, &query, &mut rng);
        assert_eq!(pick.outcome_name(), "Psyduck");
    }
    let dist = distribution(&location, &query).nonzero();
    assert_eq!(dist.rows(), vec![("Psyduck".to_string(), 100.0)]);
}

#[test]
fn zero_power_matches_unbiased_distribution() {
    let location = meadow();
    let sets = Sets::empty();
    let biased = distribution(
        &location,
        &sets.query(TimeSlot::Dawn, BiasPolicy::new(Some(Category::Bug), 0)),
    );
    let plain = distribution(&location, &sets.query(TimeSlot::Dawn, BiasPolicy::none()));
    assert_eq!(biased.rows(), plain.rows());
}

#[test]
fn half_strength_bias_applies_demultiplier() {
    let location = fire_water();
    let sets = Sets::empty();
    let query = sets.query(TimeSlot::Day, BiasPolicy::new(Some(Category::Fire), 2));
    let dist = distribution(&location, &query);
    assert_eq!(dist.percentage_of("A"), Some(70.5882));
    assert_eq!(dist.percentage_of("C"), Some(23.5294));
    assert_eq!(dist.percentage_of("B"), Some(5.8823));
}

#[test]
fn restriction_replaces_duplicate_exclusion() {
    let coverage = CoverageTable::from([("Orchard".to_string(), 1.0)]);
    let rows = vec![
        RawRow::new("Apple", "Grass", "", "Orchard", [10, 10, 10, 10]),
        RawRow::new("Banana", "Water", "", "Orchard", [10, 10, 10, 10]),
    ];
    let location = Location::build("Orchard", coverage, &rows).unwrap();
    let sets = Sets {
        exclusions: ["Apple"].into_iter().collect(),
        restriction: ["A"].into_iter().collect(),
    };
    let query = sets.query(TimeSlot::Day, BiasPolicy::none());
    let dist = distribution(&location, &query);
    assert_eq!(dist.rows(), vec![("Apple".to_string(), 100.0)]);

    let mut rng = ChaCha20Rng::seed_from_u64(1);
    for _ in 0..100 {
        assert_eq!(draw(&location, &query, &mut rng).outcome_name(), "Apple");
    }
}
