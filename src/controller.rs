//! Game session controller.
//!
//! Drives one session through join, turn determination, firing and
//! opponent polling. Two background activities exist, the join exchange and
//! the opponent poll loop; at most one of them runs at a time and starting
//! either aborts the other. All session writes go through a single mutex and
//! are tagged with the epoch of the session they belong to, so an activity
//! left over from an earlier join can never touch the current session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;
use tokio::time::{sleep, timeout};

use crate::client::GameApi;
use crate::common::{ApiError, Cell, ControllerError, ValidationError};
use crate::config::ClientConfig;
use crate::fleet::{validate_fleet, validate_identifiers, validate_target_cell};
use crate::protocol::EnemyFireResponse;
use crate::session::{IncomingShot, OutgoingShot, Phase, Session};
use crate::ship::Placement;

/// State published to the UI after every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub session: Session,
    /// One-line description of what is happening.
    pub status: String,
    /// Joined, but the opponent has not shown up yet.
    pub waiting_for_opponent: bool,
    /// Both players are in the game.
    pub opponent_connected: bool,
}

/// Transient messages for the UI, separate from the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something failed but the session goes on.
    Error(String),
    /// The session ended because of this error.
    Fatal(String),
}

/// Timing knobs taken from [`ClientConfig`].
#[derive(Debug, Clone, Copy)]
struct Timing {
    poll_delay: Duration,
    long_poll_timeout: Duration,
    max_retries: u32,
}

struct State {
    epoch: u64,
    retries: u32,
    snapshot: Snapshot,
    activity: Option<JoinHandle<()>>,
}

struct Inner {
    api: Arc<dyn GameApi>,
    timing: Timing,
    state: Mutex<State>,
    updates: watch::Sender<Snapshot>,
    notices: broadcast::Sender<Notice>,
}

/// Handle to a session controller. Clones share the same session.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

impl Controller {
    pub fn new(api: Arc<dyn GameApi>, config: &ClientConfig) -> Self {
        let (updates, _) = watch::channel(Snapshot::default());
        let (notices, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                api,
                timing: Timing {
                    poll_delay: config.poll_delay,
                    long_poll_timeout: config.long_poll_timeout,
                    max_retries: config.max_retries,
                },
                state: Mutex::new(State {
                    epoch: 0,
                    retries: 0,
                    snapshot: Snapshot::default(),
                    activity: None,
                }),
                updates,
                notices,
            }),
        }
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.updates.subscribe()
    }

    /// Receiver for error notices emitted from now on.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn session(&self) -> Session {
        self.inner.lock().snapshot.session.clone()
    }

    /// Server health check, outside the session state machine.
    pub async fn ping(&self) -> Result<bool, ApiError> {
        self.inner.api.ping().await
    }

    /// Validate identifiers and fleet, then start joining `game_key`.
    ///
    /// Returns once the join exchange has been started; progress arrives
    /// through [`subscribe`](Self::subscribe). A validation failure leaves the
    /// current session untouched and makes no network call. Must be called
    /// from within a Tokio runtime.
    pub fn join_game(
        &self,
        player: &str,
        game_key: &str,
        fleet: &[Placement],
    ) -> Result<(), ControllerError> {
        let checked = validate_identifiers(player, game_key).and_then(|()| validate_fleet(fleet));
        if let Err(e) = checked {
            info!("join rejected locally: {}", e);
            self.inner.set_status(e.to_string());
            return Err(e.into());
        }

        let mut state = self.inner.lock();
        state.epoch += 1;
        state.retries = 0;
        state.snapshot = Snapshot {
            session: Session::joining(player, game_key, fleet),
            status: "Joining game...".to_string(),
            waiting_for_opponent: true,
            opponent_connected: false,
        };
        info!("joining game {} as {}", game_key, player);
        let epoch = state.epoch;
        let inner = self.inner.clone();
        let (player, game_key, fleet) = (player.to_string(), game_key.to_string(), fleet.to_vec());
        Inner::replace_activity(
            &mut state,
            tokio::spawn(async move { inner.run_join(epoch, player, game_key, fleet).await }),
        );
        self.inner.publish(&state);
        Ok(())
    }

    /// Fire at `(x, y)` on the opponent's board.
    ///
    /// Rejected without a network call when it is not the local player's turn,
    /// the target is off the grid, or the cell was fired at before. On success
    /// the turn passes to the opponent and polling for their move starts.
    pub async fn fire(&self, x: i32, y: i32) -> Result<OutgoingShot, ControllerError> {
        let cell = Cell::new(x, y);
        let (epoch, player, game_key) = {
            let state = self.inner.lock();
            let session = &state.snapshot.session;
            if session.is_finished() {
                return Err(ControllerError::GameFinished);
            }
            if !session.can_fire() {
                drop(state);
                self.inner.set_status("Not your turn".to_string());
                return Err(ControllerError::NotYourTurn);
            }
            validate_target_cell(x, y)?;
            if session.has_fired_at(cell) {
                drop(state);
                self.inner.set_status("Already fired here".to_string());
                return Err(ValidationError::AlreadyFired(cell).into());
            }
            (state.epoch, session.player.clone(), session.game_key.clone())
        };

        self.inner
            .update(epoch, |state| state.snapshot.status = format!("Firing at {}...", cell));
        debug!("firing at {}", cell);

        match self.inner.api.fire(&player, &game_key, x, y).await {
            Ok(response) => {
                let inner = self.inner.clone();
                self.inner
                    .update(epoch, |state| {
                        state.retries = 0;
                        let (next, shot) = state.snapshot.session.apply_fire_result(cell, &response);
                        state.snapshot.session = next;
                        state.snapshot.status = outgoing_status(&shot);
                        if shot.all_sunk {
                            info!("all enemy ships sunk, game won");
                        } else {
                            Inner::replace_activity(
                                state,
                                tokio::spawn(async move { inner.run_poll(epoch).await }),
                            );
                        }
                        shot
                    })
                    .ok_or(ControllerError::GameFinished)
            }
            Err(e) => {
                if e.is_session_ending() {
                    self.inner.end_session(epoch, &e);
                } else {
                    warn!("fire at {} failed: {}", cell, e);
                    self.inner.update(epoch, |state| state.snapshot.status = e.to_string());
                    self.inner.notify(Notice::Error(e.to_string()));
                }
                Err(e.into())
            }
        }
    }

    /// Stop any background activity. The current snapshot stays readable.
    pub fn shutdown(&self) {
        let mut state = self.inner.lock();
        state.epoch += 1;
        if let Some(handle) = state.activity.take() {
            handle.abort();
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.snapshot.clone());
    }

    fn notify(&self, notice: Notice) {
        // Nobody listening is fine.
        let _ = self.notices.send(notice);
    }

    fn set_status(&self, status: String) {
        let mut state = self.lock();
        state.snapshot.status = status;
        self.publish(&state);
    }

    /// Apply `f` if the session of `epoch` is still current, then publish.
    fn update<R>(&self, epoch: u64, f: impl FnOnce(&mut State) -> R) -> Option<R> {
        let mut state = self.lock();
        if state.epoch != epoch {
            debug!("dropping update from stale session {}", epoch);
            return None;
        }
        let out = f(&mut state);
        self.publish(&state);
        Some(out)
    }

    fn replace_activity(state: &mut State, handle: JoinHandle<()>) {
        if let Some(old) = state.activity.replace(handle) {
            old.abort();
        }
    }

    fn end_session(&self, epoch: u64, err: &ApiError) {
        error!("session ended: {}", err);
        self.update(epoch, |state| {
            state.snapshot.session = state.snapshot.session.finish();
            state.snapshot.status = err.to_string();
            state.snapshot.waiting_for_opponent = false;
        });
        self.notify(Notice::Fatal(err.to_string()));
    }

    /// Count a recoverable failure. Returns `false` once the retry budget is
    /// spent, after finishing the session; otherwise sleeps the backoff and
    /// returns `true`.
    async fn backoff(&self, epoch: u64, err: &ApiError) -> bool {
        let max = self.timing.max_retries;
        let attempt = self.update(epoch, |state| {
            state.retries += 1;
            if state.retries >= max {
                state.snapshot.session = state.snapshot.session.finish();
                state.snapshot.status = format!("Connection lost after {} retries", max);
                state.snapshot.waiting_for_opponent = false;
                None
            } else {
                state.snapshot.status = format!(
                    "Connection issue, retrying... (Attempt {}/{})",
                    state.retries, max
                );
                Some(state.retries)
            }
        });
        match attempt {
            Some(Some(n)) => {
                warn!("request failed ({}), retry {}/{}", err, n, max);
                self.notify(Notice::Error(err.to_string()));
                sleep(self.timing.poll_delay * n).await;
                true
            }
            Some(None) => {
                error!("giving up after {} failures: {}", max, err);
                self.notify(Notice::Fatal(format!("Connection lost after {} retries", max)));
                false
            }
            None => false,
        }
    }

    async fn run_join(self: Arc<Self>, epoch: u64, player: String, game_key: String, fleet: Vec<Placement>) {
        let response = loop {
            match self
                .api
                .join(&player, &game_key, &fleet)
                .await
                .and_then(EnemyFireResponse::validated)
            {
                Ok(response) => break response,
                Err(e) if e.is_session_ending() => return self.end_session(epoch, &e),
                Err(e) if e.is_join_rejection() => {
                    warn!("join rejected by server: {}", e);
                    self.update(epoch, |state| {
                        state.snapshot.session = state.snapshot.session.reset();
                        state.snapshot.status = "Failed to join game. Please try again.".to_string();
                        state.snapshot.waiting_for_opponent = false;
                        state.snapshot.opponent_connected = false;
                    });
                    self.notify(Notice::Error(e.to_string()));
                    return;
                }
                Err(e) => {
                    if !self.backoff(epoch, &e).await {
                        return;
                    }
                }
            }
        };
        debug!("join response: {:?}", response);
        self.update(epoch, |state| state.retries = 0);

        if response.gameover || response.cell().is_some() {
            self.apply_first_move(epoch, &response);
            return;
        }

        self.update(epoch, |state| {
            state.snapshot.status = "Waiting for game to start...".to_string()
        });
        loop {
            match self.poll_once(&player, &game_key).await {
                Err(_) | Ok(Err(ApiError::Timeout)) => {
                    debug!("first-move poll timed out, polling again");
                }
                Ok(Ok(response)) => {
                    self.update(epoch, |state| state.retries = 0);
                    self.apply_first_move(epoch, &response);
                    return;
                }
                Ok(Err(e)) if e.is_session_ending() => return self.end_session(epoch, &e),
                Ok(Err(e)) => {
                    if !self.backoff(epoch, &e).await {
                        return;
                    }
                }
            }
        }
    }

    /// One long-poll for the opponent's move, bounded by the long-poll timeout.
    async fn poll_once(
        &self,
        player: &str,
        game_key: &str,
    ) -> Result<Result<EnemyFireResponse, ApiError>, Elapsed> {
        timeout(self.timing.long_poll_timeout, self.api.enemy_fire(player, game_key))
            .await
            .map(|reply| reply.and_then(EnemyFireResponse::validated))
    }

    /// Settle who moves first from the first response after joining.
    fn apply_first_move(&self, epoch: u64, response: &EnemyFireResponse) {
        self.update(epoch, |state| {
            state.snapshot.waiting_for_opponent = false;
            state.snapshot.opponent_connected = true;
            let session = &state.snapshot.session;
            if response.gameover {
                info!("game over before the first move");
                state.snapshot.session = session.finish();
                state.snapshot.status = "Game ended unexpectedly".to_string();
            } else if let Some(cell) = response.cell() {
                info!("opponent moved first at {}", cell);
                let (next, shot) = session.start_playing(false).apply_incoming_shot(cell);
                state.snapshot.session = next;
                state.snapshot.status = incoming_status(&shot);
            } else {
                info!("local player moves first");
                state.snapshot.session = session.start_playing(true);
                state.snapshot.status = "You go first!".to_string();
            }
        });
    }

    /// Poll for opponent moves while it is their turn.
    async fn run_poll(self: Arc<Self>, epoch: u64) {
        loop {
            let ids = self.update(epoch, |state| {
                let session = &state.snapshot.session;
                if session.phase != Phase::Playing || session.my_turn || session.game_over {
                    return None;
                }
                state.snapshot.status = "Waiting for opponent's move...".to_string();
                Some((session.player.clone(), session.game_key.clone()))
            });
            let Some(Some((player, game_key))) = ids else {
                return;
            };

            match self.poll_once(&player, &game_key).await {
                Err(_) | Ok(Err(ApiError::Timeout)) => {
                    debug!("opponent poll timed out, polling again");
                }
                Ok(Ok(response)) => {
                    let moved = self.update(epoch, |state| {
                        state.retries = 0;
                        let session = &state.snapshot.session;
                        if response.gameover {
                            info!("server reports game over");
                            state.snapshot.session = session.finish();
                            state.snapshot.status = "Game Over!".to_string();
                            true
                        } else if let Some(cell) = response.cell() {
                            let (next, shot) = session.apply_incoming_shot(cell);
                            state.snapshot.session = next;
                            state.snapshot.status = incoming_status(&shot);
                            true
                        } else {
                            false
                        }
                    });
                    match moved {
                        Some(true) => {}
                        Some(false) => sleep(self.timing.poll_delay).await,
                        None => return,
                    }
                }
                Ok(Err(e)) if e.is_session_ending() => return self.end_session(epoch, &e),
                Ok(Err(e)) => {
                    if !self.backoff(epoch, &e).await {
                        return;
                    }
                }
            }
        }
    }
}

fn incoming_status(shot: &IncomingShot) -> String {
    if shot.fleet_destroyed {
        "Game Over! All your ships have been sunk.".to_string()
    } else if let Some(ship) = shot.hit {
        format!("Enemy hit your {} at {}! Your turn.", ship, shot.cell)
    } else {
        format!("Enemy missed at {}! Your turn.", shot.cell)
    }
}

fn outgoing_status(shot: &OutgoingShot) -> String {
    if shot.all_sunk {
        "You won! All enemy ships sunk!".to_string()
    } else if !shot.newly_sunk.is_empty() {
        format!(
            "Hit and sunk {}! Waiting for opponent...",
            shot.newly_sunk.join(", ")
        )
    } else if shot.hit {
        format!("Hit at {}! Waiting for opponent...", shot.cell)
    } else {
        format!("Miss at {}! Waiting for opponent...", shot.cell)
    }
}
