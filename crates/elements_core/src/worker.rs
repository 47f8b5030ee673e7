//! The per-worker phase engine.
//!
//! A [`Worker`] owns one field and drives it through waves. Each round runs a
//! move phase and an action phase; each wave ends with a flood phase. Every
//! phase follows the same shape:
//!
//! 1. produce packs from units in the owned regions ([`Worker::move_phase`],
//!    [`Worker::action_phase`], [`Worker::flood_phase`]),
//! 2. trade the [`Worker::outgoing`] subset with neighbors through an
//!    [`Exchange`],
//! 3. resolve own and received packs against the field.
//!
//! Nothing here blocks or allocates threads; transport lives behind
//! [`Exchange`].

use std::collections::BTreeMap;

use tracing::{debug, error, warn};

use crate::combat::{self, Incoming, Outcome};
use crate::config::RuleConfig;
use crate::coord::Coord;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::field::{Cell, Field, Tile};
use crate::pack::{MoveOrder, Pack, PhaseKind};
use crate::region::{classify, OwnedRect, Region};
use crate::topology::WorkerTopology;
use crate::unit::Unit;

/// Radius of the window an Air unit scores moves against: one step of
/// movement plus a two-cell leap.
pub const MOVE_WINDOW_RADIUS: i32 = 3;

/// Pack exchange with neighboring workers.
///
/// `exchange` sends `outgoing` to every neighbor and returns what each
/// neighbor sent for the same phase. It is a barrier: it must not return
/// before every neighbor's packs have arrived.
pub trait Exchange {
    /// Transport failure type. Core violations convert into it.
    type Error: From<SimError>;

    /// Trade one phase's packs with every neighbor.
    fn exchange(
        &mut self,
        phase: PhaseKind,
        outgoing: &[Pack],
    ) -> std::result::Result<Vec<Vec<Pack>>, Self::Error>;
}

/// Exchange for a worker with no neighbors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Isolated;

impl Exchange for Isolated {
    type Error = SimError;

    fn exchange(&mut self, _phase: PhaseKind, _outgoing: &[Pack]) -> Result<Vec<Vec<Pack>>> {
        Ok(Vec::new())
    }
}

/// One worker's simulation state.
#[derive(Debug, Clone)]
pub struct Worker {
    topology: WorkerTopology,
    owned: OwnedRect,
    rules: RuleConfig,
    field: Field,
    waves_received: usize,
    round: usize,
}

impl Worker {
    /// Create a worker with an empty field. The first wave fills it.
    #[must_use]
    pub fn new(topology: WorkerTopology, rules: RuleConfig) -> Self {
        Self {
            owned: topology.owned_rect(),
            field: Field::new(topology.board_size as i32),
            topology,
            rules,
            waves_received: 0,
            round: 0,
        }
    }

    /// This worker's rank.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.topology.rank
    }

    /// Placement of this worker.
    #[must_use]
    pub const fn topology(&self) -> &WorkerTopology {
        &self.topology
    }

    /// The owned rectangle.
    #[must_use]
    pub const fn owned_rect(&self) -> &OwnedRect {
        &self.owned
    }

    /// The local field.
    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// Waves merged so far.
    #[must_use]
    pub const fn waves_received(&self) -> usize {
        self.waves_received
    }

    /// Region of `coord` from this worker's point of view.
    #[must_use]
    pub fn region(&self, coord: Coord) -> Region {
        classify(coord, &self.owned, &self.field)
    }

    fn protocol_violation(&self, coord: Coord, context: &str) -> SimError {
        error!(rank = self.rank(), %coord, context, "Coordinate outside worker field");
        SimError::UnknownCoordinate {
            rank: self.rank(),
            coord,
        }
    }

    /// Merge a wave's field into local state.
    ///
    /// The first wave is adopted verbatim. Later waves only fill cells that
    /// are currently empty; units that survived earlier waves are kept.
    pub fn receive_wave(&mut self, tiles: &[(Coord, Tile)]) -> Result<()> {
        if self.waves_received == 0 {
            self.field = Field::from_tiles(self.field.board_size(), tiles.iter().copied());
        } else {
            for &(coord, tile) in tiles {
                let Some(current) = self.field.get(coord) else {
                    return Err(self.protocol_violation(coord, "wave"));
                };
                if current.is_empty() {
                    self.field.replace(coord, Cell::from_tile(tile, coord));
                } else if let (Cell::Occupied(kept), Some(faction)) = (current, tile.faction()) {
                    debug!(
                        rank = self.rank(),
                        %coord,
                        kept = kept.faction.label(),
                        dropped = faction.label(),
                        "Wave placement dropped on occupied cell"
                    );
                }
            }
        }
        self.waves_received += 1;
        self.round = 0;
        debug!(
            rank = self.rank(),
            wave = self.waves_received,
            cells = self.field.len(),
            units = self.field.units().count(),
            "Wave received"
        );
        Ok(())
    }

    /// Units this worker is the authority for.
    fn owned_units(&self) -> impl Iterator<Item = &Unit> {
        self.field
            .units()
            .filter(|unit| self.region(unit.coord).is_owned())
    }

    /// Move packs for every owned Air unit.
    #[must_use]
    pub fn move_phase(&self) -> Vec<Pack> {
        self.owned_units()
            .filter(|unit| unit.faction == Faction::Air)
            .map(|unit| unit.choose_move(&self.field.window(unit.coord, MOVE_WINDOW_RADIUS)))
            .collect()
    }

    /// Attack and heal packs for every owned unit.
    #[must_use]
    pub fn action_phase(&self) -> Vec<Pack> {
        let board_size = self.field.board_size();
        let mut packs = Vec::new();
        for unit in self.owned_units() {
            if self.rules.heal_when_wounded && unit.is_wounded() {
                packs.push(unit.heal_pack());
                continue;
            }
            let targets = unit.target_cells(unit.coord, board_size, |coord| {
                self.field.cell(coord).is_empty()
            });
            packs.extend(unit.decide_action(&self.field.sample(targets)));
        }
        packs
    }

    /// Flood packs for every owned Water unit.
    #[must_use]
    pub fn flood_phase(&self) -> Vec<Pack> {
        self.owned_units()
            .filter(|unit| unit.faction == Faction::Water)
            .map(|unit| unit.choose_flood(&self.field.window(unit.coord, 1)))
            .collect()
    }

    /// The packs worth sending to neighbors.
    ///
    /// A pack whose endpoints all sit in the interior can affect no one
    /// else. A flood with no target has nothing to resolve.
    #[must_use]
    pub fn outgoing(&self, packs: &[Pack]) -> Vec<Pack> {
        packs
            .iter()
            .filter(|pack| match pack {
                Pack::Flood(order) => order.to.is_some(),
                Pack::Attack(_) | Pack::Heal { .. } | Pack::Move(_) => true,
            })
            .filter(|pack| {
                !pack
                    .endpoints()
                    .into_iter()
                    .all(|coord| self.region(coord) == Region::Interior)
            })
            .copied()
            .collect()
    }

    /// Apply own and neighbors' move packs.
    pub fn resolve_moves(&mut self, own: &[Pack], received: &[Vec<Pack>]) -> Result<()> {
        let mut by_destination: BTreeMap<Coord, Vec<MoveOrder>> = BTreeMap::new();
        let mut departures = Vec::new();

        for pack in received.iter().flatten() {
            if let Pack::Move(order) = pack {
                if self.field.contains(order.to) {
                    by_destination.entry(order.to).or_default().push(*order);
                }
            }
        }
        for pack in own {
            if let Pack::Move(order) = pack {
                if self.field.contains(order.to) {
                    by_destination.entry(order.to).or_default().push(*order);
                } else {
                    departures.push(*order);
                }
            }
        }

        for (destination, orders) in &by_destination {
            match orders.as_slice() {
                [order] => {
                    let mut unit = self
                        .field
                        .take_unit(order.from)
                        .unwrap_or_else(|| Unit::from_move(order, *destination));
                    unit.coord = *destination;
                    self.field.replace(*destination, Cell::Occupied(unit));
                }
                _ => {
                    for order in orders {
                        self.field.take_unit(order.from);
                    }
                    let merged = Unit::combine(orders, *destination);
                    debug!(
                        rank = self.rank(),
                        coord = %destination,
                        contenders = orders.len(),
                        health = merged.health,
                        power = merged.attack_power,
                        "Air units combined"
                    );
                    self.field.replace(*destination, Cell::Occupied(merged));
                }
            }
        }

        for order in departures {
            warn!(
                rank = self.rank(),
                from = %order.from,
                to = %order.to,
                "Unit moved out of worker field"
            );
            self.field.take_unit(order.from);
        }

        debug!(
            rank = self.rank(),
            round = self.round,
            destinations = by_destination.len(),
            "Moves resolved"
        );
        Ok(())
    }

    /// Apply own and neighbors' attack and heal packs.
    pub fn resolve_actions(&mut self, own: &[Pack], received: &[Vec<Pack>]) -> Result<()> {
        let mut incoming: BTreeMap<Coord, Incoming> = BTreeMap::new();
        for pack in received.iter().flatten() {
            if let Some(target) = pack.target() {
                if matches!(pack, Pack::Attack(_) | Pack::Heal { .. }) && self.field.contains(target) {
                    incoming.entry(target).or_default().push(pack);
                }
            }
        }
        for (target, local) in combat::aggregate(own) {
            if !self.field.contains(target) {
                return Err(self.protocol_violation(target, "action"));
            }
            let entry = incoming.entry(target).or_default();
            entry.strikes.extend(local.strikes);
            entry.healed |= local.healed;
        }

        let mut kills = 0;
        for (coord, actions) in &incoming {
            let fire_attackers: Vec<Coord> = actions
                .strikes
                .iter()
                .map(|strike| strike.from)
                .filter(|from| {
                    self.field
                        .unit(*from)
                        .is_some_and(|attacker| attacker.faction == Faction::Fire)
                })
                .collect();

            let Some(victim) = self.field.unit_mut(*coord) else {
                continue;
            };
            if combat::apply(victim, actions) == Outcome::Killed {
                kills += 1;
                self.field.replace(*coord, Cell::Empty);
                for from in fire_attackers {
                    if let Some(fire) = self.field.unit_mut(from) {
                        fire.inferno();
                    }
                }
            }
        }

        debug!(
            rank = self.rank(),
            round = self.round,
            targets = incoming.len(),
            kills,
            "Actions resolved"
        );
        Ok(())
    }

    /// Apply own and neighbors' flood packs. Each targeted cell gets one
    /// fresh Water unit, however many floods aimed at it.
    pub fn resolve_floods(&mut self, own: &[Pack], received: &[Vec<Pack>]) -> Result<()> {
        let mut targets = Vec::new();
        for pack in received.iter().flatten() {
            if let Pack::Flood(order) = pack {
                targets.extend(order.to.filter(|to| self.field.contains(*to)));
            }
        }
        for pack in own {
            if let Pack::Flood(order) = pack {
                if let Some(to) = order.to {
                    if !self.field.contains(to) {
                        return Err(self.protocol_violation(to, "flood"));
                    }
                    targets.push(to);
                }
            }
        }
        targets.sort_unstable();
        targets.dedup();

        for coord in &targets {
            if !matches!(self.field.cell(*coord), Cell::OutOfBounds) {
                self.field
                    .replace(*coord, Cell::Occupied(Unit::new(Faction::Water, *coord)));
            }
        }
        debug!(rank = self.rank(), flooded = targets.len(), "Floods resolved");
        Ok(())
    }

    /// Wave-end bookkeeping: Fire attack power resets.
    pub fn end_wave(&mut self) {
        for unit in self.field.units_mut() {
            unit.reset_attack_power();
        }
    }

    /// Owned cells as board tiles, for the coordinator.
    #[must_use]
    pub fn report(&self) -> Vec<(Coord, Tile)> {
        self.field
            .iter()
            .filter(|(coord, _)| self.region(*coord).is_owned())
            .map(|(coord, cell)| (coord, cell.tile()))
            .collect()
    }

    /// One phase: produce, trade, resolve.
    fn run_phase<X: Exchange>(
        &mut self,
        phase: PhaseKind,
        exchange: &mut X,
    ) -> std::result::Result<(), X::Error> {
        let own = match phase {
            PhaseKind::Move => self.move_phase(),
            PhaseKind::Action => self.action_phase(),
            PhaseKind::Flood => self.flood_phase(),
        };
        let outgoing = self.outgoing(&own);
        debug!(
            rank = self.rank(),
            phase = phase.name(),
            produced = own.len(),
            sent = outgoing.len(),
            "Phase packs ready"
        );
        let received = exchange.exchange(phase, &outgoing)?;
        match phase {
            PhaseKind::Move => self.resolve_moves(&own, &received)?,
            PhaseKind::Action => self.resolve_actions(&own, &received)?,
            PhaseKind::Flood => self.resolve_floods(&own, &received)?,
        }
        Ok(())
    }

    /// Run one round: move then action.
    pub fn run_round<X: Exchange>(&mut self, exchange: &mut X) -> std::result::Result<(), X::Error> {
        self.round += 1;
        self.run_phase(PhaseKind::Move, exchange)?;
        self.run_phase(PhaseKind::Action, exchange)
    }

    /// Run a whole wave and return the end-of-wave report.
    pub fn run_wave<X: Exchange>(
        &mut self,
        tiles: &[(Coord, Tile)],
        rounds: usize,
        exchange: &mut X,
    ) -> std::result::Result<Vec<(Coord, Tile)>, X::Error> {
        self.receive_wave(tiles)?;
        for _ in 0..rounds {
            self.run_round(exchange)?;
        }
        self.run_phase(PhaseKind::Flood, exchange)?;
        self.end_wave();
        Ok(self.report())
    }

    /// Hash of the field, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.field.state_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{FloodOrder, Strike};
    use crate::partition::Board;
    use crate::topology::GridLayout;

    fn solo(n: usize, units: &[(Faction, (i32, i32))]) -> Worker {
        let layout = GridLayout::new(2, n).unwrap();
        let mut board = Board::new(n);
        for (faction, at) in units {
            board.set(Coord::from(*at), Some(*faction)).unwrap();
        }
        let mut worker = Worker::new(layout.worker(1).unwrap(), RuleConfig::default());
        let owned = *worker.owned_rect();
        worker.receive_wave(&board.field_tiles(&owned)).unwrap();
        worker
    }

    fn health_at(worker: &Worker, at: (i32, i32)) -> Option<i32> {
        worker.field().unit(Coord::from(at)).map(|unit| unit.health)
    }

    #[test]
    fn test_earth_and_fire_single_round() {
        let mut worker = solo(5, &[(Faction::Earth, (2, 2)), (Faction::Fire, (2, 3))]);
        worker.run_round(&mut Isolated).unwrap();
        assert_eq!(health_at(&worker, (2, 2)), Some(16));
        assert_eq!(health_at(&worker, (2, 3)), Some(10));
    }

    #[test]
    fn test_full_wave_report() {
        let mut worker = Worker::new(
            GridLayout::new(2, 5).unwrap().worker(1).unwrap(),
            RuleConfig::default(),
        );
        let mut board = Board::new(5);
        board.set(Coord::new(2, 2), Some(Faction::Earth)).unwrap();
        board.set(Coord::new(2, 3), Some(Faction::Fire)).unwrap();
        let tiles = board.field_tiles(worker.owned_rect());
        let report = worker.run_wave(&tiles, 1, &mut Isolated).unwrap();
        assert_eq!(report.len(), 25);
        let mut result = Board::new(5);
        result.apply_report(&report).unwrap();
        assert_eq!(result, board);
    }

    #[test]
    fn test_halo_units_never_act() {
        let layout = GridLayout::new(5, 8).unwrap();
        let mut board = Board::new(8);
        // (4, 0) belongs to worker 3; worker 1 only sees it in its halo.
        board.set(Coord::new(4, 0), Some(Faction::Fire)).unwrap();
        let mut worker = Worker::new(layout.worker(1).unwrap(), RuleConfig::default());
        let owned = *worker.owned_rect();
        worker.receive_wave(&board.field_tiles(&owned)).unwrap();
        assert_eq!(worker.region(Coord::new(4, 0)), Region::Halo);
        assert!(worker.action_phase().is_empty());
    }

    #[test]
    fn test_wounded_unit_heals_instead_of_attacking() {
        let mut worker = solo(5, &[(Faction::Fire, (1, 1)), (Faction::Earth, (1, 2))]);
        worker.field.unit_mut(Coord::new(1, 1)).unwrap().health = 5;
        let packs = worker.action_phase();
        assert!(packs.contains(&Pack::Heal {
            coord: Coord::new(1, 1)
        }));
        assert_eq!(
            packs
                .iter()
                .filter(|p| matches!(p, Pack::Attack(s) if s.from == Coord::new(1, 1)))
                .count(),
            0
        );

        worker.rules.heal_when_wounded = false;
        assert!(worker
            .action_phase()
            .iter()
            .any(|p| matches!(p, Pack::Attack(s) if s.from == Coord::new(1, 1))));
    }

    #[test]
    fn test_kill_triggers_inferno_for_every_fire() {
        let mut worker = solo(
            5,
            &[
                (Faction::Air, (2, 2)),
                (Faction::Fire, (1, 1)),
                (Faction::Fire, (3, 3)),
            ],
        );
        worker.field.unit_mut(Coord::new(2, 2)).unwrap().health = 8;
        let own = vec![
            Pack::Attack(Strike {
                from: Coord::new(1, 1),
                to: Coord::new(2, 2),
                power: 4,
            }),
            Pack::Attack(Strike {
                from: Coord::new(3, 3),
                to: Coord::new(2, 2),
                power: 4,
            }),
        ];
        worker.resolve_actions(&own, &[]).unwrap();
        assert!(worker.field().cell(Coord::new(2, 2)).is_empty());
        assert_eq!(worker.field().unit(Coord::new(1, 1)).unwrap().attack_power, 5);
        assert_eq!(worker.field().unit(Coord::new(3, 3)).unwrap().attack_power, 5);

        worker.end_wave();
        assert!(worker.field().units().all(|u| u.attack_power == 4));
    }

    #[test]
    fn test_received_attack_outside_field_is_ignored() {
        let mut worker = solo(5, &[(Faction::Earth, (0, 0))]);
        let stray = vec![vec![Pack::Attack(Strike {
            from: Coord::new(40, 40),
            to: Coord::new(41, 41),
            power: 9,
        })]];
        worker.resolve_actions(&[], &stray).unwrap();
        assert_eq!(health_at(&worker, (0, 0)), Some(18));
    }

    #[test]
    fn test_own_attack_outside_field_is_protocol_error() {
        let mut worker = solo(5, &[(Faction::Earth, (0, 0))]);
        let own = vec![Pack::Attack(Strike {
            from: Coord::new(0, 0),
            to: Coord::new(20, 20),
            power: 2,
        })];
        assert!(matches!(
            worker.resolve_actions(&own, &[]),
            Err(SimError::UnknownCoordinate { rank: 1, .. })
        ));
    }

    #[test]
    fn test_single_move_synthesizes_remote_unit() {
        let mut worker = solo(5, &[]);
        let order = MoveOrder {
            from: Coord::new(-1, 2),
            to: Coord::new(0, 2),
            health: 7,
            power: 3,
            healing_rate: 2,
        };
        worker.resolve_moves(&[], &[vec![Pack::Move(order)]]).unwrap();
        let unit = worker.field().unit(Coord::new(0, 2)).unwrap();
        assert_eq!(unit.faction, Faction::Air);
        assert_eq!((unit.health, unit.attack_power, unit.healing_rate), (7, 3, 2));
    }

    #[test]
    fn test_single_move_relocates_local_unit() {
        let mut worker = solo(5, &[(Faction::Air, (1, 1))]);
        worker.field.unit_mut(Coord::new(1, 1)).unwrap().health = 9;
        let order = MoveOrder {
            from: Coord::new(1, 1),
            to: Coord::new(1, 2),
            health: 9,
            power: 2,
            healing_rate: 2,
        };
        worker.resolve_moves(&[Pack::Move(order)], &[]).unwrap();
        assert!(worker.field().cell(Coord::new(1, 1)).is_empty());
        let unit = worker.field().unit(Coord::new(1, 2)).unwrap();
        assert_eq!(unit.coord, Coord::new(1, 2));
        assert_eq!(unit.health, 9);
    }

    #[test]
    fn test_colliding_moves_combine() {
        let mut worker = solo(5, &[(Faction::Air, (1, 1)), (Faction::Air, (1, 3))]);
        let base = MoveOrder {
            from: Coord::new(1, 1),
            to: Coord::new(1, 2),
            health: 10,
            power: 2,
            healing_rate: 2,
        };
        let other = MoveOrder {
            from: Coord::new(1, 3),
            health: 4,
            power: 5,
            ..base
        };
        worker
            .resolve_moves(&[Pack::Move(base), Pack::Move(other)], &[])
            .unwrap();
        assert!(worker.field().cell(Coord::new(1, 1)).is_empty());
        assert!(worker.field().cell(Coord::new(1, 3)).is_empty());
        let merged = worker.field().unit(Coord::new(1, 2)).unwrap();
        assert_eq!(merged.health, 10);
        assert_eq!(merged.attack_power, 7);
    }

    #[test]
    fn test_stayer_merges_with_arrival() {
        let mut worker = solo(5, &[(Faction::Air, (1, 1)), (Faction::Air, (1, 3))]);
        let stay = MoveOrder {
            from: Coord::new(1, 1),
            to: Coord::new(1, 1),
            health: 3,
            power: 2,
            healing_rate: 2,
        };
        let arrive = MoveOrder {
            from: Coord::new(1, 3),
            ..stay
        };
        worker
            .resolve_moves(&[Pack::Move(stay), Pack::Move(arrive)], &[])
            .unwrap();
        let merged = worker.field().unit(Coord::new(1, 1)).unwrap();
        assert_eq!((merged.health, merged.attack_power), (6, 4));
        assert!(worker.field().cell(Coord::new(1, 3)).is_empty());
    }

    #[test]
    fn test_flood_fills_target_once() {
        let mut worker = solo(5, &[(Faction::Water, (1, 1))]);
        let order = FloodOrder {
            from: Coord::new(1, 1),
            to: Some(Coord::new(0, 0)),
            power: 3,
        };
        let neighbor = vec![vec![Pack::Flood(FloodOrder {
            from: Coord::new(-1, -1),
            ..order
        })]];
        worker.resolve_floods(&[Pack::Flood(order)], &neighbor).unwrap();
        let flooded = worker.field().unit(Coord::new(0, 0)).unwrap();
        assert_eq!(flooded.faction, Faction::Water);
        assert_eq!(flooded.attack_power, 3);
        assert_eq!(worker.field().units().count(), 2);
    }

    #[test]
    fn test_flood_without_target_changes_nothing() {
        let mut worker = solo(5, &[(Faction::Water, (1, 1))]);
        let before = worker.state_hash();
        let pack = Pack::Flood(FloodOrder {
            from: Coord::new(1, 1),
            to: None,
            power: 3,
        });
        assert!(worker.outgoing(&[pack]).is_empty());
        worker.resolve_floods(&[pack], &[]).unwrap();
        assert_eq!(before, worker.state_hash());
    }

    #[test]
    fn test_interior_packs_are_not_sent() {
        let layout = GridLayout::new(2, 10).unwrap();
        let worker = Worker::new(layout.worker(1).unwrap(), RuleConfig::default());
        let interior = Pack::Attack(Strike {
            from: Coord::new(4, 4),
            to: Coord::new(5, 5),
            power: 2,
        });
        let boundary = Pack::Heal {
            coord: Coord::new(2, 4),
        };
        assert_eq!(worker.outgoing(&[interior, boundary]), vec![boundary]);
    }

    #[test]
    fn test_later_wave_fills_only_empty_cells() {
        let layout = GridLayout::new(2, 5).unwrap();
        let mut worker = Worker::new(layout.worker(1).unwrap(), RuleConfig::default());
        let owned = *worker.owned_rect();
        let mut first = Board::new(5);
        first.set(Coord::new(0, 0), Some(Faction::Earth)).unwrap();
        worker.receive_wave(&first.field_tiles(&owned)).unwrap();
        worker.field.unit_mut(Coord::new(0, 0)).unwrap().health = 5;

        let mut second = Board::new(5);
        second.set(Coord::new(0, 0), Some(Faction::Fire)).unwrap();
        second.set(Coord::new(4, 4), Some(Faction::Air)).unwrap();
        worker.receive_wave(&second.field_tiles(&owned)).unwrap();

        let kept = worker.field().unit(Coord::new(0, 0)).unwrap();
        assert_eq!((kept.faction, kept.health), (Faction::Earth, 5));
        assert_eq!(
            worker.field().unit(Coord::new(4, 4)).unwrap().faction,
            Faction::Air
        );
        assert_eq!(worker.waves_received(), 2);
    }

    #[test]
    fn test_later_wave_with_unknown_coordinate_fails() {
        let mut worker = solo(5, &[]);
        let stray = [(Coord::new(30, 30), Tile::Unit(Faction::Air))];
        assert!(worker.receive_wave(&stray).is_err());
    }
}
