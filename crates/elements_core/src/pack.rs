//! Packs: the per-phase messages workers produce, exchange and resolve.
//!
//! A pack describes one intended effect. Packs have no identity beyond the
//! phase that produced them; they are created by the phase engine, filtered
//! before transmission, and consumed during resolution.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;

/// The three exchange phases of a wave.
///
/// Each phase uses its own message tag so a late message from one phase
/// can never be taken as the answer for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    /// Air relocation.
    Move,
    /// Attacks and heals.
    Action,
    /// Once-per-wave water spreading.
    Flood,
}

impl PhaseKind {
    /// Lower-case name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Action => "action",
            Self::Flood => "flood",
        }
    }
}

/// One unit hitting one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strike {
    /// Attacker position.
    pub from: Coord,
    /// Victim position.
    pub to: Coord,
    /// Damage before mitigation.
    pub power: i32,
}

/// An Air unit relocating, carrying the stats needed to rebuild it remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOrder {
    /// Current position.
    pub from: Coord,
    /// Chosen destination; equal to `from` when staying put.
    pub to: Coord,
    /// Health at decision time.
    pub health: i32,
    /// Attack power at decision time.
    pub power: i32,
    /// Healing rate at decision time.
    pub healing_rate: i32,
}

impl MoveOrder {
    /// Whether the unit stays on its current cell.
    #[must_use]
    pub fn is_stay(&self) -> bool {
        self.from == self.to
    }
}

/// A Water unit flooding a neighbor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloodOrder {
    /// Position of the flooding unit.
    pub from: Coord,
    /// Target cell, `None` when every neighbor was occupied.
    pub to: Option<Coord>,
    /// Attack power of the flooding unit. Not transferred to the new unit.
    pub power: i32,
}

/// A tagged per-phase message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pack {
    /// Damage aimed at a cell.
    Attack(Strike),
    /// A unit heals itself instead of attacking.
    Heal {
        /// Position of the healing unit.
        coord: Coord,
    },
    /// Air relocation.
    Move(MoveOrder),
    /// Water spreading.
    Flood(FloodOrder),
}

impl Pack {
    /// The phase this pack belongs to.
    #[must_use]
    pub const fn phase(&self) -> PhaseKind {
        match self {
            Self::Attack(_) | Self::Heal { .. } => PhaseKind::Action,
            Self::Move(_) => PhaseKind::Move,
            Self::Flood(_) => PhaseKind::Flood,
        }
    }

    /// Every coordinate this pack reads or writes.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Coord> {
        match self {
            Self::Attack(strike) => vec![strike.from, strike.to],
            Self::Heal { coord } => vec![*coord],
            Self::Move(order) => vec![order.from, order.to],
            Self::Flood(order) => std::iter::once(order.from).chain(order.to).collect(),
        }
    }

    /// The cell this pack changes, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Coord> {
        match self {
            Self::Attack(strike) => Some(strike.to),
            Self::Heal { coord } => Some(*coord),
            Self::Move(order) => Some(order.to),
            Self::Flood(order) => order.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_of_each_kind() {
        let at = Coord::new(1, 1);
        assert_eq!(Pack::Heal { coord: at }.phase(), PhaseKind::Action);
        assert_eq!(
            Pack::Attack(Strike {
                from: at,
                to: at,
                power: 1
            })
            .phase(),
            PhaseKind::Action
        );
        assert_eq!(
            Pack::Flood(FloodOrder {
                from: at,
                to: None,
                power: 3
            })
            .phase(),
            PhaseKind::Flood
        );
    }

    #[test]
    fn test_flood_without_target_has_one_endpoint() {
        let pack = Pack::Flood(FloodOrder {
            from: Coord::new(2, 2),
            to: None,
            power: 3,
        });
        assert_eq!(pack.endpoints(), vec![Coord::new(2, 2)]);
        assert_eq!(pack.target(), None);
    }

    #[test]
    fn test_stay_detection() {
        let order = MoveOrder {
            from: Coord::new(4, 4),
            to: Coord::new(4, 4),
            health: 10,
            power: 2,
            healing_rate: 2,
        };
        assert!(order.is_stay());
    }
}
