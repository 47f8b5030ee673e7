//! Faction definitions and their fixed stats.
//!
//! Factions are a closed set. Everything that differs between them is
//! either a row in the stats table below or an explicit `match` at the
//! place the behavior is used.

use serde::{Deserialize, Serialize};

use crate::coord::{Offset, ALL_EIGHT, DIAGONAL, ORTHOGONAL};

/// Base stats shared by every unit of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionStats {
    /// Health at spawn, also the maximum.
    pub max_health: i32,
    /// Attack power at spawn.
    pub attack_power: i32,
    /// Health restored by one heal.
    pub healing_rate: i32,
    /// Upper bound reachable through inferno.
    pub attack_power_cap: i32,
}

const EARTH: FactionStats = FactionStats {
    max_health: 18,
    attack_power: 2,
    healing_rate: 3,
    attack_power_cap: 2,
};

const FIRE: FactionStats = FactionStats {
    max_health: 12,
    attack_power: 4,
    healing_rate: 1,
    attack_power_cap: 6,
};

const WATER: FactionStats = FactionStats {
    max_health: 14,
    attack_power: 3,
    healing_rate: 2,
    attack_power_cap: 3,
};

const AIR: FactionStats = FactionStats {
    max_health: 10,
    attack_power: 2,
    healing_rate: 2,
    attack_power_cap: 2,
};

/// Unique identifier for factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    /// Sturdy melee units that halve incoming damage.
    Earth,
    /// Glass cannons that grow stronger with every kill.
    Fire,
    /// Diagonal attackers that flood an empty neighbor once per wave.
    Water,
    /// The only mobile faction; strikes over empty cells and merges on collision.
    Air,
}

impl Faction {
    /// Every faction, in input-file order.
    pub const ALL: [Faction; 4] = [Self::Earth, Self::Fire, Self::Water, Self::Air];

    /// Base stats for this faction.
    #[must_use]
    pub const fn stats(self) -> &'static FactionStats {
        match self {
            Self::Earth => &EARTH,
            Self::Fire => &FIRE,
            Self::Water => &WATER,
            Self::Air => &AIR,
        }
    }

    /// Cells this faction can target, relative to its own position.
    #[must_use]
    pub const fn attack_pattern(self) -> &'static [Offset] {
        match self {
            Self::Earth => &ORTHOGONAL,
            Self::Water => &DIAGONAL,
            Self::Fire | Self::Air => &ALL_EIGHT,
        }
    }

    /// Whether attacks skip over an empty adjacent cell to the one behind it.
    #[must_use]
    pub const fn leaps(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Single-character code used on boards and in output files.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Earth => 'E',
            Self::Fire => 'F',
            Self::Water => 'W',
            Self::Air => 'A',
        }
    }

    /// Parse a single-character board code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'E' => Some(Self::Earth),
            'F' => Some(Self::Fire),
            'W' => Some(Self::Water),
            'A' => Some(Self::Air),
            _ => None,
        }
    }

    /// Label used in input files ("Earth", "Fire", ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Earth => "Earth",
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Air => "Air",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for faction in Faction::ALL {
            assert_eq!(Faction::from_code(faction.code()), Some(faction));
        }
        assert_eq!(Faction::from_code('.'), None);
    }

    #[test]
    fn test_pattern_sizes() {
        assert_eq!(Faction::Earth.attack_pattern().len(), 4);
        assert_eq!(Faction::Water.attack_pattern().len(), 4);
        assert_eq!(Faction::Fire.attack_pattern().len(), 8);
        assert_eq!(Faction::Air.attack_pattern().len(), 8);
    }

    #[test]
    fn test_water_pattern_is_diagonal() {
        assert!(Faction::Water
            .attack_pattern()
            .iter()
            .all(|o| o.d_row != 0 && o.d_col != 0));
    }

    #[test]
    fn test_only_fire_can_grow() {
        for faction in Faction::ALL {
            let stats = faction.stats();
            if faction == Faction::Fire {
                assert_eq!(stats.attack_power_cap, 6);
            } else {
                assert_eq!(stats.attack_power_cap, stats.attack_power);
            }
        }
    }

    #[test]
    fn test_only_air_leaps() {
        assert!(Faction::Air.leaps());
        assert!(!Faction::Fire.leaps());
    }
}
