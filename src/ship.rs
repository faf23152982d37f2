//! Ship definitions and placement geometry.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{Cell, ValidationError};
use crate::config::SHIPS;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Wire name of the orientation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    /// Parse the wire name, `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Orientation::Horizontal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// The other orientation, for rotate controls.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five ship kinds of a fleet. Serialized under their variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipType {
    Carrier,
    Battleship,
    Destroyer,
    Submarine,
    PatrolBoat,
}

impl ShipType {
    /// Ship's name as used on the wire.
    pub const fn name(&self) -> &'static str {
        match self {
            ShipType::Carrier => "Carrier",
            ShipType::Battleship => "Battleship",
            ShipType::Destroyer => "Destroyer",
            ShipType::Submarine => "Submarine",
            ShipType::PatrolBoat => "PatrolBoat",
        }
    }

    /// Ship's length in cells.
    pub const fn length(&self) -> i32 {
        match self {
            ShipType::Carrier => 5,
            ShipType::Battleship => 4,
            ShipType::Destroyer => 3,
            ShipType::Submarine => 3,
            ShipType::PatrolBoat => 2,
        }
    }

    /// Short description shown while placing the fleet.
    pub const fn description(&self) -> &'static str {
        match self {
            ShipType::Carrier => "Aircraft Carrier (5 spaces): The largest ship in your fleet",
            ShipType::Battleship => "Battleship (4 spaces): A powerful warship",
            ShipType::Destroyer => "Destroyer (3 spaces): Fast and maneuverable",
            ShipType::Submarine => "Submarine (3 spaces): Stealthy underwater vessel",
            ShipType::PatrolBoat => "Patrol Boat (2 spaces): Small but essential",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SHIPS
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ValidationError::UnknownShipType(s.to_string()))
    }
}

/// A single ship's type, origin and orientation. Serializes to the
/// `{"ship","x","y","orientation"}` shape the server expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub ship: ShipType,
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
}

impl Placement {
    pub const fn new(ship: ShipType, x: i32, y: i32, orientation: Orientation) -> Self {
        Self {
            ship,
            x,
            y,
            orientation,
        }
    }

    /// Build a placement from untyped parts, rejecting unknown ship names and
    /// orientation strings.
    pub fn parse(ship: &str, x: i32, y: i32, orientation: &str) -> Result<Self, ValidationError> {
        let ship: ShipType = ship.parse()?;
        let orientation =
            Orientation::parse(orientation).ok_or_else(|| ValidationError::InvalidOrientation {
                ship: ship.name().to_string(),
                value: orientation.to_string(),
            })?;
        Ok(Self::new(ship, x, y, orientation))
    }

    /// Origin cell of the ship.
    pub fn origin(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    /// Cells covered by the ship, starting at the origin. Horizontal ships grow
    /// along x, vertical ones along y. Not clipped to the board; coordinates
    /// saturate at `i32::MAX`.
    pub fn cells(&self) -> Vec<Cell> {
        let len = self.ship.length();
        (0..len)
            .map(|i| match self.orientation {
                Orientation::Horizontal => Cell::new(self.x.saturating_add(i), self.y),
                Orientation::Vertical => Cell::new(self.x, self.y.saturating_add(i)),
            })
            .collect()
    }

    /// Last cell covered by the ship.
    pub fn end(&self) -> Cell {
        let last = self.ship.length() - 1;
        match self.orientation {
            Orientation::Horizontal => Cell::new(self.x.saturating_add(last), self.y),
            Orientation::Vertical => Cell::new(self.x, self.y.saturating_add(last)),
        }
    }

    /// Whether the ship covers `cell`.
    pub fn contains(&self, cell: Cell) -> bool {
        let end = self.end();
        (self.x..=end.x).contains(&cell.x) && (self.y..=end.y).contains(&cell.y)
    }

    /// Whether two ships share any cell.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.cells().iter().any(|c| other.contains(*c))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.ship, self.x, self.y, self.orientation)
    }
}

/// Parses `TYPE,X,Y,ORIENTATION`, e.g. `Carrier,0,0,horizontal`.
impl FromStr for Placement {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedPlacement(s.to_string());
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [ship, x, y, orientation] = parts.as_slice() else {
            return Err(malformed());
        };
        let x: i32 = x.parse().map_err(|_| malformed())?;
        let y: i32 = y.parse().map_err(|_| malformed())?;
        Placement::parse(ship, x, y, orientation)
    }
}
