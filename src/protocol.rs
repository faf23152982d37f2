//! JSON wire contract spoken with the game server.

use serde::{Deserialize, Serialize};

use crate::common::{ApiError, Cell};
use crate::ship::Placement;

pub const PING_PATH: &str = "ping";
pub const JOIN_PATH: &str = "game/join";
pub const FIRE_PATH: &str = "game/fire";
pub const ENEMY_FIRE_PATH: &str = "game/enemyFire";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub player: String,
    pub gamekey: String,
    pub ships: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireRequest {
    pub player: String,
    pub gamekey: String,
    pub x: i32,
    pub y: i32,
}

/// Body of the enemy-fire long-poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyFireRequest {
    pub player: String,
    pub gamekey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FireResponse {
    pub hit: bool,
    #[serde(rename = "shipsSunk", default)]
    pub ships_sunk: Vec<String>,
}

/// Reply to both join and enemy-fire. Missing coordinates mean the opponent
/// has not fired yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyFireResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default)]
    pub gameover: bool,
}

impl EnemyFireResponse {
    /// No move yet and the game is still running.
    pub fn no_move() -> Self {
        Self::default()
    }

    /// The opponent fired at `(x, y)`.
    pub fn shot(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            gameover: false,
        }
    }

    /// The server reports the game as over.
    pub fn game_over() -> Self {
        Self {
            gameover: true,
            ..Self::default()
        }
    }

    /// Target cell, present only when both coordinates are.
    pub fn cell(&self) -> Option<Cell> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Cell::new(x, y)),
            _ => None,
        }
    }

    /// Reject replies whose shot is half present or off the grid. Coordinates
    /// are ignored once the game is over.
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.gameover {
            return Ok(self);
        }
        match (self.x, self.y) {
            (None, None) => Ok(self),
            (Some(x), Some(y)) if Cell::new(x, y).in_bounds() => Ok(self),
            (Some(x), Some(y)) => Err(ApiError::Malformed(format!(
                "shot {} is outside the grid",
                Cell::new(x, y)
            ))),
            _ => Err(ApiError::Malformed(
                "shot is missing a coordinate".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub ping: Option<bool>,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}
