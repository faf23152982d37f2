//! Client for a two-player networked Battleship server.
//!
//! [`fleet`] validates ship placements locally, [`Controller`] drives a joined
//! game through the server's join/fire/poll protocol, and [`client`] holds the
//! network implementations of [`GameApi`].

pub mod client;
mod common;
mod config;
pub mod controller;
pub mod fleet;
mod logging;
pub mod prelude;
pub mod protocol;
mod session;
mod ship;
pub mod ui;

pub use client::{GameApi, HttpClient, ScriptedClient};
pub use common::*;
pub use config::*;
pub use controller::{Controller, Notice, Snapshot};
pub use fleet::*;
pub use logging::{init_logging, level_from, LOG_ENV};
pub use protocol::{EnemyFireResponse, FireResponse};
pub use session::*;
pub use ship::*;
