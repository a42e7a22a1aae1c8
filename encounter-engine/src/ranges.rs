//! Cumulative weight intervals shared by the draw and distribution paths.

use rand::Rng;

/// Half-open interval `[lower, upper)` owned by one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRange<T> {
    pub item: T,
    pub weight: f64,
    pub lower: f64,
    pub upper: f64,
}

impl<T> WeightedRange<T> {
    #[must_use]
    pub fn encloses(&self, roll: f64) -> bool {
        self.lower <= roll && roll < self.upper
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRanges<T> {
    ranges: Vec<WeightedRange<T>>,
    total: f64,
}

impl<T> Default for WeightedRanges<T> {
    fn default() -> Self {
        Self {
            ranges: Vec::new(),
            total: 0.0,
        }
    }
}

impl<T> WeightedRanges<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
            total: 0.0,
        }
    }

    /// Append `item`. Negative or non-finite weights count as zero and get a
    /// zero-width interval that no roll can land in.
    pub fn push(&mut self, item: T, weight: f64) {
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };
        let lower = self.total;
        self.total += weight;
        self.ranges.push(WeightedRange {
            item,
            weight,
            lower,
            upper: self.total,
        });
    }

    /// Sum of all weights; equal to the last interval's upper bound.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedRange<T>> {
        self.ranges.iter()
    }

    /// First interval containing `roll`, if `roll` lies in `[0, total)`.
    #[must_use]
    pub fn locate(&self, roll: f64) -> Option<&WeightedRange<T>> {
        if !(0.0..self.total).contains(&roll) {
            return None;
        }
        self.ranges.iter().find(|range| range.encloses(roll))
    }

    /// Roll uniformly in `[0, total)` and return the enclosing item with the roll.
    /// Returns `None` when nothing carries weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&T, f64)> {
        if self.total <= 0.0 {
            return None;
        }
        let roll = rng.gen_range(0.0..self.total);
        self.locate(roll)
            .or_else(|| self.ranges.iter().rev().find(|range| range.weight > 0.0))
            .map(|range| (&range.item, roll))
    }

    /// Each item's fraction of the total; all zero when the total is zero.
    pub fn shares(&self) -> impl Iterator<Item = (&T, f64)> {
        let total = self.total;
        self.ranges.iter().map(move |range| {
            let share = if total > 0.0 { range.weight / total } else { 0.0 };
            (&range.item, share)
        })
    }
}
