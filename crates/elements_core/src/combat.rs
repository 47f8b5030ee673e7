//! Damage aggregation and mitigation.
//!
//! Every strike aimed at one cell during an action phase is summed before
//! mitigation, so an Earth unit halves the total once rather than halving
//! each hit. Damage always lands before healing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::factions::Faction;
use crate::pack::{Pack, Strike};
use crate::unit::Unit;

/// Everything aimed at one cell in an action phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incoming {
    /// Attacks on the cell, in arrival order.
    pub strikes: Vec<Strike>,
    /// Whether the occupant asked to heal.
    pub healed: bool,
}

impl Incoming {
    /// Sum of strike power before mitigation.
    #[must_use]
    pub fn raw_damage(&self) -> i32 {
        self.strikes.iter().map(|strike| strike.power).sum()
    }

    /// Record one action pack.
    pub fn push(&mut self, pack: &Pack) {
        match pack {
            Pack::Attack(strike) => self.strikes.push(*strike),
            Pack::Heal { .. } => self.healed = true,
            Pack::Move(_) | Pack::Flood(_) => {}
        }
    }
}

/// Group action packs by the cell they affect. Move and flood packs are
/// ignored.
pub fn aggregate<'a>(packs: impl IntoIterator<Item = &'a Pack>) -> BTreeMap<Coord, Incoming> {
    let mut by_target: BTreeMap<Coord, Incoming> = BTreeMap::new();
    for pack in packs {
        if let (Pack::Attack(_) | Pack::Heal { .. }, Some(target)) = (pack, pack.target()) {
            by_target.entry(target).or_default().push(pack);
        }
    }
    by_target
}

/// Damage actually taken by a unit of `faction` from `raw` total damage.
#[must_use]
pub const fn mitigated_damage(faction: Faction, raw: i32) -> i32 {
    match faction {
        Faction::Earth => raw / 2,
        Faction::Fire | Faction::Water | Faction::Air => raw,
    }
}

/// What happened to a unit after one action resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Health dropped to zero or below; the cell must be cleared.
    Killed,
    /// Still standing.
    Survived {
        /// Whether a heal was applied after damage.
        healed: bool,
    },
}

/// Apply one cell's aggregated actions to its occupant.
pub fn apply(unit: &mut Unit, incoming: &Incoming) -> Outcome {
    unit.health -= mitigated_damage(unit.faction, incoming.raw_damage());
    if !unit.is_alive() {
        return Outcome::Killed;
    }
    if incoming.healed {
        unit.heal();
    }
    Outcome::Survived {
        healed: incoming.healed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(power: i32) -> Strike {
        Strike {
            from: Coord::new(0, 0),
            to: Coord::new(0, 1),
            power,
        }
    }

    #[test]
    fn test_earth_halves_total_damage() {
        assert_eq!(mitigated_damage(Faction::Earth, 7), 3);
        assert_eq!(mitigated_damage(Faction::Earth, 1), 0);
        assert_eq!(mitigated_damage(Faction::Fire, 7), 7);
    }

    #[test]
    fn test_earth_halves_once_for_many_strikes() {
        let mut earth = Unit::new(Faction::Earth, Coord::new(0, 1));
        let incoming = Incoming {
            strikes: vec![strike(3), strike(3)],
            healed: false,
        };
        assert_eq!(apply(&mut earth, &incoming), Outcome::Survived { healed: false });
        assert_eq!(earth.health, 15);
    }

    #[test]
    fn test_damage_before_heal() {
        let mut water = Unit::new(Faction::Water, Coord::new(0, 1));
        let incoming = Incoming {
            strikes: vec![strike(4)],
            healed: true,
        };
        apply(&mut water, &incoming);
        assert_eq!(water.health, 12);
    }

    #[test]
    fn test_killed_unit_is_not_healed() {
        let mut air = Unit::new(Faction::Air, Coord::new(0, 1));
        let incoming = Incoming {
            strikes: vec![strike(6), strike(4)],
            healed: true,
        };
        assert_eq!(apply(&mut air, &incoming), Outcome::Killed);
        assert_eq!(air.health, 0);
    }

    #[test]
    fn test_aggregate_groups_by_target() {
        let packs = [
            Pack::Attack(strike(2)),
            Pack::Attack(strike(4)),
            Pack::Heal {
                coord: Coord::new(0, 1),
            },
            Pack::Heal {
                coord: Coord::new(3, 3),
            },
        ];
        let grouped = aggregate(&packs);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&Coord::new(0, 1)].raw_damage(), 6);
        assert!(grouped[&Coord::new(0, 1)].healed);
        assert!(grouped[&Coord::new(3, 3)].strikes.is_empty());
    }
}
