//! Time-of-day slots partitioning every location's weight table.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeSlot {
    /// Every slot in display order.
    pub const ALL: [Self; 4] = [Self::Dawn, Self::Day, Self::Dusk, Self::Night];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dawn => 0,
            Self::Day => 1,
            Self::Dusk => 2,
            Self::Night => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dawn => "Dawn",
            Self::Day => "Day",
            Self::Dusk => "Dusk",
            Self::Night => "Night",
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Dawn),
            1 => Some(Self::Day),
            2 => Some(Self::Dusk),
            3 => Some(Self::Night),
            _ => None,
        }
    }

    /// Parse user input: a slot label in any case, or its index `0..=3`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .into_iter()
            .find(|slot| slot.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
