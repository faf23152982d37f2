use std::time::Duration;

use crate::ship::ShipType;

pub const BOARD_SIZE: i32 = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::Carrier,
    ShipType::Battleship,
    ShipType::Destroyer,
    ShipType::Submarine,
    ShipType::PatrolBoat,
];

/// Minimum length for player ids and game keys.
pub const MIN_ID_LENGTH: usize = 3;

/// Total number of ship segments in a full fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

pub const DEFAULT_HOST: &str = "brad-home.ch";
pub const DEFAULT_PORT: u16 = 50003;

/// Upper bound for a single ping/join/fire request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How long one enemy-fire long-poll may stay open before it counts as "no news".
pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Base unit for backoff and for pauses between empty polls.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(1);

/// Consecutive failures tolerated before a session is abandoned.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timeout used by the raw TCP reachability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection and timing settings for a game client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub long_poll_timeout: Duration,
    pub poll_delay: Duration,
    pub max_retries: u32,
}

impl ClientConfig {
    /// Config pointing at `host:port` with default timings.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Base URL of the game server, always ending in `/`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            long_poll_timeout: DEFAULT_LONG_POLL_TIMEOUT,
            poll_delay: DEFAULT_POLL_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Convert a ship name string to its catalogue entry. Returns `None` if the
/// name does not match any defined ship.
pub fn ship_type_by_name(name: &str) -> Option<ShipType> {
    SHIPS.iter().copied().find(|s| s.name() == name)
}
