//! Commonly used types and utilities for ease of import.

pub use crate::client::{GameApi, HttpClient, ScriptedClient};
pub use crate::controller::{Controller, Notice, Snapshot};
pub use crate::fleet::{random_fleet, validate_fleet, validate_identifiers};
pub use crate::{Cell, ClientConfig, ControllerError, Orientation, Phase, Placement, Session, ShipType};
