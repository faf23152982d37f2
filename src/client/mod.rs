//! Network side of the client: the calls a game server offers and the
//! implementations that make them.

use crate::common::ApiError;
use crate::protocol::{EnemyFireResponse, FireResponse};
use crate::ship::Placement;

/// The four remote calls of the join/fire/poll protocol.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// Health check.
    async fn ping(&self) -> Result<bool, ApiError>;

    /// Join `game_key` as `player` with the given fleet.
    async fn join(
        &self,
        player: &str,
        game_key: &str,
        ships: &[Placement],
    ) -> Result<EnemyFireResponse, ApiError>;

    /// Fire at `(x, y)` on the opponent's board.
    async fn fire(&self, player: &str, game_key: &str, x: i32, y: i32)
        -> Result<FireResponse, ApiError>;

    /// Long-poll for the opponent's next move.
    async fn enemy_fire(&self, player: &str, game_key: &str) -> Result<EnemyFireResponse, ApiError>;
}

pub mod http;
pub mod scripted;

pub use http::HttpClient;
pub use scripted::{Call, ScriptedClient};
