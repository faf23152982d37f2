use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::GameApi;
use crate::common::ApiError;
use crate::protocol::{EnemyFireResponse, FireResponse};
use crate::ship::Placement;

/// A call observed by a [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping,
    Join { player: String, game_key: String, ships: Vec<Placement> },
    Fire {
        player: String,
        game_key: String,
        x: i32,
        y: i32,
    },
    EnemyFire,
}

/// One queued enemy-fire outcome. `Hang` keeps the poll open until the caller
/// gives up on it.
#[derive(Debug, Clone)]
enum Poll {
    Reply(Result<EnemyFireResponse, ApiError>),
    Hang,
}

#[derive(Default)]
struct Script {
    ping: VecDeque<Result<bool, ApiError>>,
    join: VecDeque<Result<EnemyFireResponse, ApiError>>,
    fire: VecDeque<Result<FireResponse, ApiError>>,
    enemy_fire: VecDeque<Poll>,
    calls: Vec<Call>,
}

/// In-process [`GameApi`] that replays queued replies and records every call.
///
/// Clones share the same script, so a test can keep a handle while the
/// controller owns another. An exhausted join or fire queue answers with a
/// connection error; an exhausted enemy-fire queue hangs like a server with
/// nothing to report.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the script from the others.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push_ping(&self, reply: Result<bool, ApiError>) -> &Self {
        self.script().ping.push_back(reply);
        self
    }

    pub fn push_join(&self, reply: Result<EnemyFireResponse, ApiError>) -> &Self {
        self.script().join.push_back(reply);
        self
    }

    pub fn push_fire(&self, reply: Result<FireResponse, ApiError>) -> &Self {
        self.script().fire.push_back(reply);
        self
    }

    pub fn push_enemy_fire(&self, reply: Result<EnemyFireResponse, ApiError>) -> &Self {
        self.script().enemy_fire.push_back(Poll::Reply(reply));
        self
    }

    /// Queue a poll that never answers.
    pub fn push_enemy_fire_hang(&self) -> &Self {
        self.script().enemy_fire.push_back(Poll::Hang);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.script().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn fire_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Fire { .. }))
    }

    pub fn enemy_fire_count(&self) -> usize {
        self.count(|c| matches!(c, Call::EnemyFire))
    }

    pub fn join_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Join { .. }))
    }
}

fn exhausted() -> ApiError {
    ApiError::Connection("no scripted response".to_string())
}

#[async_trait::async_trait]
impl GameApi for ScriptedClient {
    async fn ping(&self) -> Result<bool, ApiError> {
        let mut script = self.script();
        script.calls.push(Call::Ping);
        script.ping.pop_front().unwrap_or_else(|| Err(exhausted()))
    }

    async fn join(
        &self,
        player: &str,
        game_key: &str,
        ships: &[Placement],
    ) -> Result<EnemyFireResponse, ApiError> {
        let mut script = self.script();
        script.calls.push(Call::Join {
            player: player.to_string(),
            game_key: game_key.to_string(),
            ships: ships.to_vec(),
        });
        script.join.pop_front().unwrap_or_else(|| Err(exhausted()))
    }

    async fn fire(
        &self,
        player: &str,
        game_key: &str,
        x: i32,
        y: i32,
    ) -> Result<FireResponse, ApiError> {
        let mut script = self.script();
        script.calls.push(Call::Fire {
            player: player.to_string(),
            game_key: game_key.to_string(),
            x,
            y,
        });
        script.fire.pop_front().unwrap_or_else(|| Err(exhausted()))
    }

    async fn enemy_fire(&self, _player: &str, _game_key: &str) -> Result<EnemyFireResponse, ApiError> {
        let next = {
            let mut script = self.script();
            script.calls.push(Call::EnemyFire);
            script.enemy_fire.pop_front()
        };
        match next {
            Some(Poll::Reply(reply)) => reply,
            Some(Poll::Hang) | None => std::future::pending().await,
        }
    }
}
