//! Units and their per-faction decisions.
//!
//! Every decision here is a pure function of the unit and a
//! [`Surroundings`] snapshot. Nothing in this module touches a field.

use serde::{Deserialize, Serialize};

use crate::coord::{Coord, ALL_EIGHT};
use crate::factions::Faction;
use crate::field::{Cell, Surroundings};
use crate::pack::{FloodOrder, MoveOrder, Pack, Strike};

/// A live unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Owning faction.
    pub faction: Faction,
    /// Current health. Always positive while the unit is on a field.
    pub health: i32,
    /// Health ceiling for heals and merges.
    pub max_health: i32,
    /// Damage dealt per attack.
    pub attack_power: i32,
    /// Health restored by one heal.
    pub healing_rate: i32,
    /// Current position.
    pub coord: Coord,
}

impl Unit {
    /// Spawn a unit with its faction's base stats.
    #[must_use]
    pub fn new(faction: Faction, coord: Coord) -> Self {
        let stats = faction.stats();
        Self {
            faction,
            health: stats.max_health,
            max_health: stats.max_health,
            attack_power: stats.attack_power,
            healing_rate: stats.healing_rate,
            coord,
        }
    }

    /// Rebuild an Air unit at `at` from the stats a move pack carried.
    #[must_use]
    pub fn from_move(order: &MoveOrder, at: Coord) -> Self {
        Self {
            health: order.health,
            attack_power: order.power,
            healing_rate: order.healing_rate,
            ..Self::new(Faction::Air, at)
        }
    }

    /// Merge every Air unit landing on `at` into one.
    ///
    /// Health is summed and capped at Air's max health; attack power is
    /// summed without a cap.
    #[must_use]
    pub fn combine<'a>(orders: impl IntoIterator<Item = &'a MoveOrder>, at: Coord) -> Self {
        let mut unit = Self::new(Faction::Air, at);
        let (health, power) = orders
            .into_iter()
            .fold((0, 0), |(h, p), order| (h + order.health, p + order.power));
        unit.health = health.min(unit.max_health);
        unit.attack_power = power;
        unit
    }

    /// Whether the unit is still standing.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Below half health; such units heal instead of fighting when the
    /// wounded-retreat rule is on.
    #[must_use]
    pub const fn is_wounded(&self) -> bool {
        2 * self.health < self.max_health
    }

    /// Restore `healing_rate` health, up to the maximum.
    pub fn heal(&mut self) {
        self.health = (self.health + self.healing_rate).min(self.max_health);
    }

    /// Fire's kill bonus: +1 attack power up to the faction cap. No effect
    /// on other factions.
    pub fn inferno(&mut self) {
        if self.faction == Faction::Fire {
            let cap = self.faction.stats().attack_power_cap;
            self.attack_power = (self.attack_power + 1).min(cap);
        }
    }

    /// Wave-end reset of Fire's attack power. No effect on other factions.
    pub fn reset_attack_power(&mut self) {
        if self.faction == Faction::Fire {
            self.attack_power = self.faction.stats().attack_power;
        }
    }

    /// The heal pack for this unit.
    #[must_use]
    pub const fn heal_pack(&self) -> Pack {
        Pack::Heal { coord: self.coord }
    }

    /// Coordinates this unit would inspect for targets from `at`, given a
    /// way to tell whether a cell is empty. Air leaps over empty neighbors;
    /// off-board coordinates are dropped.
    pub fn target_cells<F>(&self, at: Coord, board_size: i32, is_empty: F) -> Vec<Coord>
    where
        F: Fn(Coord) -> bool,
    {
        self.faction
            .attack_pattern()
            .iter()
            .filter_map(|&offset| {
                let near = at + offset;
                let target = if self.faction.leaps() && is_empty(near) {
                    at.step(offset, 2)
                } else {
                    near
                };
                target.in_board(board_size).then_some(target)
            })
            .collect()
    }

    fn is_enemy(&self, cell: &Cell) -> bool {
        cell.unit().is_some_and(|other| other.faction != self.faction)
    }

    /// Heal-or-attack: one attack pack per enemy in the sample, otherwise a
    /// single heal pack.
    #[must_use]
    pub fn decide_action(&self, surroundings: &Surroundings) -> Vec<Pack> {
        let attacks: Vec<Pack> = surroundings
            .iter()
            .filter(|(_, cell)| self.is_enemy(cell))
            .map(|(to, _)| {
                Pack::Attack(Strike {
                    from: self.coord,
                    to,
                    power: self.attack_power,
                })
            })
            .collect();

        if attacks.is_empty() {
            vec![self.heal_pack()]
        } else {
            attacks
        }
    }

    /// Number of enemies an Air unit could hit from `at`, leap included.
    #[must_use]
    pub fn attackable_enemies(&self, at: Coord, surroundings: &Surroundings) -> usize {
        ALL_EIGHT
            .iter()
            .filter(|&&offset| {
                let near = at + offset;
                match surroundings.cell(near) {
                    Cell::OutOfBounds => false,
                    Cell::Empty => self.is_enemy(surroundings.cell(at.step(offset, 2))),
                    occupied => self.is_enemy(occupied),
                }
            })
            .count()
    }

    /// Pick the Air unit's destination.
    ///
    /// `window` must cover at least radius 3 around the unit. The unit only
    /// leaves its cell for a strictly better position; ties between better
    /// positions go to the smallest `(row, col)`.
    #[must_use]
    pub fn choose_move(&self, window: &Surroundings) -> Pack {
        let mut view = window.clone();
        view.vacate(self.coord);

        let staying = self.attackable_enemies(self.coord, &view);
        let mut best = (self.coord, staying);

        for candidate in self.coord.square(1) {
            if !view.cell(candidate).is_empty() {
                continue;
            }
            let score = self.attackable_enemies(candidate, &view);
            // Row-major iteration: the first maximal candidate is the smallest.
            if score > best.1 {
                best = (candidate, score);
            }
        }

        Pack::Move(MoveOrder {
            from: self.coord,
            to: best.0,
            health: self.health,
            power: self.attack_power,
            healing_rate: self.healing_rate,
        })
    }

    /// Pick the Water unit's flood target: the smallest empty neighbor.
    #[must_use]
    pub fn choose_flood(&self, surroundings: &Surroundings) -> Pack {
        let to = self
            .coord
            .square(1)
            .find(|&candidate| surroundings.cell(candidate).is_empty());

        Pack::Flood(FloodOrder {
            from: self.coord,
            to,
            power: self.attack_power,
        })
    }
}
