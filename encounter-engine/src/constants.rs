//! Centralized tuning constants for the encounter engine.
//!
//! Power activation odds and display precision live here so that changing
//! the encounter math is a reviewed code change rather than a data edit.

// Identifier layout ---------------------------------------------------------
/// Separator between the name segment and the category segments of a key.
pub const ID_SEPARATOR: char = '_';
/// Outcome name reported when a draw has nothing eligible to pick.
pub const NONE_OUTCOME: &str = "None";

// Power tuning --------------------------------------------------------------
/// Highest supported encounter power level.
pub const MAX_POWER_LEVEL: u8 = 3;
/// Chance (out of 100) that a power of the given level forces its category.
pub(crate) const POWER_ACTIVATION_PERCENT: [u32; 4] = [0, 50, 75, 100];
/// Upper bound (inclusive) of the integer roll used for power activation.
pub(crate) const POWER_ROLL_MAX: u32 = 100;

// Display precision ---------------------------------------------------------
/// Percentages are truncated to four decimal places.
pub(crate) const PERCENT_DECIMAL_SCALE: f64 = 10_000.0;
pub(crate) const PERCENT_FULL: f64 = 100.0;
/// Scaled percentages this close to a whole step are snapped before truncating.
pub(crate) const PERCENT_SNAP_TOLERANCE: f64 = 1e-6;

// Categories ----------------------------------------------------------------
pub(crate) const CATEGORY_LABELS: [&str; 18] = [
    "Normal", "Fighting", "Flying", "Poison", "Ground", "Rock", "Bug", "Ghost", "Steel", "Fire",
    "Water", "Grass", "Electric", "Psychic", "Ice", "Dragon", "Dark", "Fairy",
];

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
