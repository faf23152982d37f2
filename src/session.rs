//! Session record for one joined game.
//!
//! A [`Session`] is never mutated in place by the controller: every transition
//! builds the next record from the previous one, so a published snapshot stays
//! valid for as long as a reader holds it.

use std::collections::BTreeSet;

use crate::common::Cell;
use crate::config::NUM_SHIPS;
use crate::protocol::FireResponse;
use crate::ship::{Placement, ShipType};

/// Lifecycle of a session. Moves forward only, except for a reset to `Setup`
/// when joining fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Setup,
    Waiting,
    Playing,
    Finished,
}

/// What an opponent shot did to the local fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingShot {
    pub cell: Cell,
    /// Ship that was hit, if any.
    pub hit: Option<ShipType>,
    /// Set when the hit ship has now been shot in every cell.
    pub sunk: Option<ShipType>,
    /// Every ship of the local fleet is sunk.
    pub fleet_destroyed: bool,
}

/// What a local shot did to the opponent, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingShot {
    pub cell: Cell,
    pub hit: bool,
    pub newly_sunk: Vec<String>,
    /// All opponent ship types have now been reported sunk.
    pub all_sunk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub player: String,
    pub game_key: String,
    pub phase: Phase,
    pub fleet: Vec<Placement>,
    /// Cells the opponent fired at.
    pub incoming: BTreeSet<Cell>,
    /// Local shots that hit.
    pub hits: BTreeSet<Cell>,
    /// Local shots that missed.
    pub misses: BTreeSet<Cell>,
    /// Opponent ship types reported sunk.
    pub sunk_enemy_ships: BTreeSet<String>,
    pub my_turn: bool,
    pub game_over: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session waiting on the server after a join request.
    pub fn joining(player: &str, game_key: &str, fleet: &[Placement]) -> Self {
        Self {
            player: player.to_string(),
            game_key: game_key.to_string(),
            phase: Phase::Waiting,
            fleet: fleet.to_vec(),
            ..Self::default()
        }
    }

    /// Back to setup, keeping identifiers and fleet so the user can retry.
    pub fn reset(&self) -> Self {
        Self {
            player: self.player.clone(),
            game_key: self.game_key.clone(),
            fleet: self.fleet.clone(),
            ..Self::default()
        }
    }

    pub fn start_playing(&self, my_turn: bool) -> Self {
        Self {
            phase: Phase::Playing,
            my_turn,
            ..self.clone()
        }
    }

    pub fn finish(&self) -> Self {
        Self {
            phase: Phase::Finished,
            game_over: true,
            my_turn: false,
            ..self.clone()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Whether the local player may fire now.
    pub fn can_fire(&self) -> bool {
        self.phase == Phase::Playing && self.my_turn && !self.game_over
    }

    /// Whether the local player already fired at `cell`.
    pub fn has_fired_at(&self, cell: Cell) -> bool {
        self.hits.contains(&cell) || self.misses.contains(&cell)
    }

    /// Local ships whose every cell has been shot.
    pub fn sunk_own_ships(&self) -> Vec<ShipType> {
        self.fleet
            .iter()
            .filter(|p| p.cells().iter().all(|c| self.incoming.contains(c)))
            .map(|p| p.ship)
            .collect()
    }

    /// Record an opponent shot. Hands the turn to the local player, or
    /// finishes the session once the whole fleet is sunk.
    pub fn apply_incoming_shot(&self, cell: Cell) -> (Self, IncomingShot) {
        let mut incoming = self.incoming.clone();
        incoming.insert(cell);

        let hit_ship = self.fleet.iter().find(|p| p.contains(cell));
        let sunk = hit_ship
            .filter(|p| p.cells().iter().all(|c| incoming.contains(c)))
            .map(|p| p.ship);
        let fleet_destroyed = !self.fleet.is_empty()
            && self
                .fleet
                .iter()
                .all(|p| p.cells().iter().all(|c| incoming.contains(c)));

        let next = Self {
            incoming,
            my_turn: !fleet_destroyed,
            game_over: fleet_destroyed,
            phase: if fleet_destroyed {
                Phase::Finished
            } else {
                Phase::Playing
            },
            ..self.clone()
        };
        let report = IncomingShot {
            cell,
            hit: hit_ship.map(|p| p.ship),
            sunk,
            fleet_destroyed,
        };
        (next, report)
    }

    /// Record the server's verdict on a local shot. Passes the turn to the
    /// opponent, or finishes the session once every opponent type is sunk.
    pub fn apply_fire_result(&self, cell: Cell, response: &FireResponse) -> (Self, OutgoingShot) {
        let mut hits = self.hits.clone();
        let mut misses = self.misses.clone();
        if response.hit {
            hits.insert(cell);
        } else {
            misses.insert(cell);
        }
        let mut sunk = self.sunk_enemy_ships.clone();
        let newly_sunk: Vec<String> = response
            .ships_sunk
            .iter()
            .filter(|name| sunk.insert((*name).clone()))
            .cloned()
            .collect();
        let all_sunk = sunk.len() >= NUM_SHIPS;

        let next = Self {
            hits,
            misses,
            sunk_enemy_ships: sunk,
            my_turn: false,
            game_over: all_sunk,
            phase: if all_sunk {
                Phase::Finished
            } else {
                Phase::Playing
            },
            ..self.clone()
        };
        let report = OutgoingShot {
            cell,
            hit: response.hit,
            newly_sunk,
            all_sunk,
        };
        (next, report)
    }
}
