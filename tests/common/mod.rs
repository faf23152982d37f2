#![allow(dead_code)]

use sinkdestroy::{Orientation, Placement, ShipType};

/// A valid fleet laid out in rows 0..=4, every ship horizontal at x = 0.
pub fn standard_fleet() -> Vec<Placement> {
    vec![
        Placement::new(ShipType::Carrier, 0, 0, Orientation::Horizontal),
        Placement::new(ShipType::Battleship, 0, 1, Orientation::Horizontal),
        Placement::new(ShipType::Destroyer, 0, 2, Orientation::Horizontal),
        Placement::new(ShipType::Submarine, 0, 3, Orientation::Horizontal),
        Placement::new(ShipType::PatrolBoat, 0, 4, Orientation::Horizontal),
    ]
}
