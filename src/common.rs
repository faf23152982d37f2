//! Common types for the client: grid cells and the error kinds shared by the
//! validator, the network client and the session controller.

use core::fmt;

use crate::config::{BOARD_SIZE, MIN_ID_LENGTH, SHIPS};

/// A cell on the 10×10 grid, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies inside the board.
    pub fn in_bounds(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reasons a placement, fleet, identifier or target is rejected locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Ship name is not one of the five catalogue types.
    UnknownShipType(String),
    /// Orientation text is neither `horizontal` nor `vertical`.
    InvalidOrientation { ship: String, value: String },
    /// Placement text could not be split into type, x, y and orientation.
    MalformedPlacement(String),
    /// Fleet does not cover every ship type.
    MissingShipTypes,
    /// Fleet names the same ship type twice.
    DuplicateShipType,
    /// Origin has a negative coordinate.
    NegativePosition(&'static str),
    /// The ship runs past the last row or column.
    OutOfBounds(&'static str),
    /// Two ships share at least one cell.
    Overlap,
    PlayerIdTooShort,
    GameKeyTooShort,
    /// Target lies outside the grid.
    TargetOutOfRange(Cell),
    /// Target has already been fired upon.
    AlreadyFired(Cell),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownShipType(name) => write!(f, "Invalid ship type: {}", name),
            ValidationError::InvalidOrientation { ship, value } => {
                write!(f, "Invalid orientation for {}: {}", ship, value)
            }
            ValidationError::MalformedPlacement(text) => write!(
                f,
                "Malformed placement '{}' - expected TYPE,X,Y,ORIENTATION",
                text
            ),
            ValidationError::MissingShipTypes => {
                let names: Vec<&str> = SHIPS.iter().map(|s| s.name()).collect();
                write!(f, "Must place all ship types: {}", names.join(", "))
            }
            ValidationError::DuplicateShipType => write!(f, "Duplicate ship types are not allowed"),
            ValidationError::NegativePosition(ship) => {
                write!(f, "{} position cannot be negative", ship)
            }
            ValidationError::OutOfBounds(ship) => {
                write!(f, "{} placement exceeds board boundaries", ship)
            }
            ValidationError::Overlap => write!(f, "Ships cannot overlap"),
            ValidationError::PlayerIdTooShort => write!(
                f,
                "Player ID must be at least {} characters long",
                MIN_ID_LENGTH
            ),
            ValidationError::GameKeyTooShort => write!(
                f,
                "Game key must be at least {} characters long",
                MIN_ID_LENGTH
            ),
            ValidationError::TargetOutOfRange(cell) => write!(
                f,
                "Coordinates {} are outside the game grid (0-{})",
                cell,
                BOARD_SIZE - 1
            ),
            ValidationError::AlreadyFired(cell) => write!(f, "Already fired at {}", cell),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure kinds reported by a [`GameApi`](crate::client::GameApi) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server does not know the game.
    GameNotFound,
    /// Server rejected the game key for this player.
    InvalidGame,
    /// A game with this key is already running with other players.
    GameExists,
    NotYourTurn,
    InvalidCoordinates,
    IdTooShort,
    InvalidShips,
    /// Any other message carried by a 4xx error response.
    Server(String),
    /// A 5xx response whose message is not a known kind. Worth retrying.
    Unavailable(String),
    /// The request did not complete in time.
    Timeout,
    /// The server could not be reached or the connection dropped.
    Connection(String),
    /// A success status arrived without a body.
    EmptyResponse,
    /// The body could not be decoded.
    Malformed(String),
}

impl ApiError {
    /// Map the message of a 5xx response. Known kinds win; anything else is
    /// a transient server failure rather than a rejection.
    pub fn classify_server_failure(message: &str) -> Self {
        match Self::classify(message) {
            ApiError::Server(msg) => ApiError::Unavailable(msg),
            known => known,
        }
    }

    /// Map a server error message onto a known kind, passing unknown text through.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("not found") {
            ApiError::GameNotFound
        } else if lower.contains("invalid game") {
            ApiError::InvalidGame
        } else if lower.contains("already exists") {
            ApiError::GameExists
        } else if lower.contains("not your turn") {
            ApiError::NotYourTurn
        } else if lower.contains("invalid coordinates") {
            ApiError::InvalidCoordinates
        } else if lower.contains("too short") {
            ApiError::IdTooShort
        } else if lower.contains("invalid ship") {
            ApiError::InvalidShips
        } else {
            ApiError::Server(message.to_string())
        }
    }

    /// Errors after which the session cannot continue.
    pub fn is_session_ending(&self) -> bool {
        matches!(self, ApiError::GameNotFound | ApiError::InvalidGame)
    }

    /// Errors by which the server refuses a join request outright.
    pub fn is_join_rejection(&self) -> bool {
        matches!(
            self,
            ApiError::GameExists | ApiError::IdTooShort | ApiError::InvalidShips | ApiError::Server(_)
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::GameNotFound => write!(f, "Game not found"),
            ApiError::InvalidGame => write!(f, "Invalid game"),
            ApiError::GameExists => write!(f, "Game already exists"),
            ApiError::NotYourTurn => write!(f, "Not your turn"),
            ApiError::InvalidCoordinates => write!(f, "Invalid coordinates"),
            ApiError::IdTooShort => write!(f, "ID too short"),
            ApiError::InvalidShips => write!(f, "Invalid ship placement"),
            ApiError::Server(msg) => write!(f, "{}", msg),
            ApiError::Unavailable(msg) => write!(f, "Server unavailable: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
            ApiError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ApiError::EmptyResponse => write!(f, "Server returned empty response"),
            ApiError::Malformed(msg) => write!(f, "Failed to parse server response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Rejected locally before any network call.
    Validation(ValidationError),
    /// Fire attempted while the session is not waiting on the local player.
    NotYourTurn,
    /// The session has already finished.
    GameFinished,
    /// The server call itself failed.
    Api(ApiError),
}

impl From<ValidationError> for ControllerError {
    fn from(err: ValidationError) -> Self {
        ControllerError::Validation(err)
    }
}

impl From<ApiError> for ControllerError {
    fn from(err: ApiError) -> Self {
        ControllerError::Api(err)
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::Validation(e) => write!(f, "{}", e),
            ControllerError::NotYourTurn => write!(f, "Not your turn"),
            ControllerError::GameFinished => write!(f, "Game is over"),
            ControllerError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ControllerError {}
