//! Ship placement validation.
//!
//! Every check here is a pure function over placements and identifiers. The
//! session controller runs them before any network call, and placement UIs use
//! [`is_valid_addition`] to validate one ship at a time.

use std::collections::HashSet;

use rand::Rng;

use crate::common::{Cell, ValidationError};
use crate::config::{BOARD_SIZE, MIN_ID_LENGTH, NUM_SHIPS, SHIPS};
use crate::ship::{Orientation, Placement, ShipType};

/// Cells occupied by `placement`, in order from its origin.
pub fn occupied_cells(placement: &Placement) -> Vec<Cell> {
    placement.cells()
}

/// Cells a ship of `ship` type would cover at `(x, y)`, for hover previews.
pub fn placement_preview(x: i32, y: i32, ship: ShipType, orientation: Orientation) -> Vec<Cell> {
    Placement::new(ship, x, y, orientation).cells()
}

/// Check that a single ship lies entirely on the board.
pub fn validate_placement(placement: &Placement) -> Result<(), ValidationError> {
    let name = placement.ship.name();
    if placement.x < 0 || placement.y < 0 {
        return Err(ValidationError::NegativePosition(name));
    }
    let end = placement.end();
    if end.x >= BOARD_SIZE || end.y >= BOARD_SIZE {
        return Err(ValidationError::OutOfBounds(name));
    }
    Ok(())
}

/// Check a complete fleet: one ship of each type, each on the board, no two
/// overlapping. The first violation found is reported.
pub fn validate_fleet(fleet: &[Placement]) -> Result<(), ValidationError> {
    let types: HashSet<ShipType> = fleet.iter().map(|p| p.ship).collect();
    if types.len() != NUM_SHIPS {
        return Err(ValidationError::MissingShipTypes);
    }
    if fleet.len() != types.len() {
        return Err(ValidationError::DuplicateShipType);
    }
    for placement in fleet {
        validate_placement(placement)?;
    }
    for (i, a) in fleet.iter().enumerate() {
        if fleet[i + 1..].iter().any(|b| a.overlaps(b)) {
            return Err(ValidationError::Overlap);
        }
    }
    Ok(())
}

/// Whether `candidate` fits on the board without touching any of `existing`.
pub fn is_valid_addition(candidate: &Placement, existing: &[Placement]) -> bool {
    validate_placement(candidate).is_ok() && !existing.iter().any(|p| p.overlaps(candidate))
}

/// Player id and game key must both be at least three characters; the player
/// id is checked first.
pub fn validate_identifiers(player_id: &str, game_key: &str) -> Result<(), ValidationError> {
    if player_id.chars().count() < MIN_ID_LENGTH {
        return Err(ValidationError::PlayerIdTooShort);
    }
    if game_key.chars().count() < MIN_ID_LENGTH {
        return Err(ValidationError::GameKeyTooShort);
    }
    Ok(())
}

/// Check that a firing target lies on the grid.
pub fn validate_target_cell(x: i32, y: i32) -> Result<(), ValidationError> {
    let cell = Cell::new(x, y);
    if !cell.in_bounds() {
        return Err(ValidationError::TargetOutOfRange(cell));
    }
    Ok(())
}

/// Next ship type an incremental placement UI should ask for, in catalogue
/// order, or `None` once the fleet is complete.
pub fn next_ship_to_place(placed: &[Placement]) -> Option<ShipType> {
    SHIPS.get(placed.len()).copied()
}

/// Returns a complete, valid fleet with random origins and orientations.
pub fn random_fleet<R: Rng>(rng: &mut R) -> Vec<Placement> {
    let mut fleet: Vec<Placement> = Vec::with_capacity(NUM_SHIPS);
    for ship in SHIPS {
        loop {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - ship.length(), BOARD_SIZE - 1),
                Orientation::Vertical => (BOARD_SIZE - 1, BOARD_SIZE - ship.length()),
            };
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            let candidate = Placement::new(ship, x, y, orientation);
            if is_valid_addition(&candidate, &fleet) {
                fleet.push(candidate);
                break;
            }
        }
    }
    fleet
}
