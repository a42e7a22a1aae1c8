//! Encounter power bias toward one category.
//!
//! A single draw rolls once to decide whether the power fires and, if so,
//! removes every non-matching outcome. The distribution instead scales
//! non-matching weights by the chance the power does not fire.

use rand::Rng;

use crate::constants::{MAX_POWER_LEVEL, POWER_ACTIVATION_PERCENT, POWER_ROLL_MAX};
use crate::numbers::percent_to_probability;
use crate::outcome::Category;

fn activation_percent(level: u8) -> u32 {
    if level > MAX_POWER_LEVEL {
        return 0;
    }
    POWER_ACTIVATION_PERCENT[usize::from(level)]
}

/// Chance that a power of `level` forces its category; unknown levels act as no power.
#[must_use]
pub fn activation_probability(level: u8) -> f64 {
    percent_to_probability(activation_percent(level))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BiasPolicy {
    category: Option<Category>,
    level: u8,
}

impl BiasPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            category: None,
            level: 0,
        }
    }

    /// `category: None` never matches, so an active power empties the pool.
    #[must_use]
    pub const fn new(category: Option<Category>, level: u8) -> Self {
        Self { category, level }
    }

    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        self.category
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn activation_probability(&self) -> f64 {
        activation_probability(self.level)
    }

    /// Factor applied to non-matching weights in distribution mode.
    #[must_use]
    pub fn demultiplier(&self) -> f64 {
        1.0 - self.activation_probability()
    }

    /// Case-sensitive containment of the category label anywhere in the key.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.category
            .is_some_and(|category| key.contains(category.label()))
    }

    /// One Bernoulli trial for draw mode. A level without activation chance
    /// consumes no randomness.
    pub fn roll_active<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let percent = activation_percent(self.level);
        if percent == 0 {
            return false;
        }
        rng.gen_range(1..=POWER_ROLL_MAX) <= percent
    }

    /// Distribution-mode weight: matching outcomes are never scaled.
    #[must_use]
    pub fn effective_weight(&self, matches: bool, weight: f64) -> f64 {
        if matches || activation_percent(self.level) == 0 {
            weight
        } else {
            weight * self.demultiplier()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn activation_table_and_out_of_range_levels() {
        let expected = [0.0, 0.5, 0.75, 1.0];
        for (level, probability) in expected.into_iter().enumerate() {
            let level = u8::try_from(level).unwrap();
            assert!((activation_probability(level) - probability).abs() < FLOAT_EPSILON);
        }
        assert!(activation_probability(4).abs() < FLOAT_EPSILON);
        assert!(activation_probability(u8::MAX).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn category_matching_is_substring_and_case_sensitive() {
        let bias = BiasPolicy::new(Some(Category::Fire), 2);
        assert!(bias.matches("Charmander_Fire"));
        assert!(bias.matches("Firefly_Bug"));
        assert!(!bias.matches("fireling_Bug"));
        assert!(!BiasPolicy::new(None, 3).matches("Charmander_Fire"));
    }

    #[test]
    fn demultiplier_scales_only_non_matching() {
        let bias = BiasPolicy::new(Some(Category::Water), 2);
        assert!((bias.effective_weight(true, 8.0) - 8.0).abs() < FLOAT_EPSILON);
        assert!((bias.effective_weight(false, 8.0) - 2.0).abs() < FLOAT_EPSILON);
        let full = BiasPolicy::new(Some(Category::Water), 3);
        assert!(full.effective_weight(false, 8.0).abs() < FLOAT_EPSILON);
        let off = BiasPolicy::new(Some(Category::Water), 0);
        assert!((off.effective_weight(false, 8.0) - 8.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn roll_extremes_are_deterministic() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let full = BiasPolicy::new(Some(Category::Fire), 3);
        let none = BiasPolicy::new(Some(Category::Fire), 0);
        for _ in 0..100 {
            assert!(full.roll_active(&mut rng));
            assert!(!none.roll_active(&mut rng));
        }
    }

    #[test]
    fn half_power_fires_about_half_the_time() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let bias = BiasPolicy::new(Some(Category::Grass), 1);
        let fired = (0..10_000).filter(|_| bias.roll_active(&mut rng)).count();
        assert!((4_500..5_500).contains(&fired), "fired {fired} times");
    }
}
