//! # Elements Core
//!
//! Per-worker simulation core for the elemental grid battle.
//!
//! This crate contains **only** deterministic logic:
//! - No threads
//! - No IO
//! - No randomness
//!
//! A board is split into square sub-grids, one per worker. Each worker holds
//! its sub-grid plus a three-cell halo of neighboring state and advances it
//! through move, action and flood phases, trading packs with its neighbors
//! through an [`worker::Exchange`] implementation supplied by the caller.
//!
//! ## Crate Structure
//!
//! - [`coord`] - Board coordinates and offsets
//! - [`factions`] - Faction stats and attack shapes
//! - [`unit`] - Units and their pure per-faction decisions
//! - [`combat`] - Damage aggregation and mitigation
//! - [`field`] - Cell states and worker fields
//! - [`region`] - Interior / boundary / halo classification
//! - [`pack`] - Messages exchanged between workers
//! - [`topology`] - Rank layout over the board
//! - [`partition`] - Whole boards and their split into fields
//! - [`worker`] - The phase engine

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod config;
pub mod coord;
pub mod error;
pub mod factions;
pub mod field;
pub mod pack;
pub mod partition;
pub mod region;
pub mod topology;
pub mod unit;
pub mod worker;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::RuleConfig;
    pub use crate::coord::{Coord, Offset};
    pub use crate::error::{Result, SimError};
    pub use crate::factions::Faction;
    pub use crate::field::{Cell, Field, Tile};
    pub use crate::pack::{FloodOrder, MoveOrder, Pack, PhaseKind, Strike};
    pub use crate::partition::{partition, Board};
    pub use crate::region::{classify, OwnedRect, Region};
    pub use crate::topology::{GridLayout, WorkerTopology, COORDINATOR_RANK};
    pub use crate::unit::Unit;
    pub use crate::worker::{Exchange, Isolated, Worker};
}
