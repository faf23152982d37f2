use std::time::Duration;

use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::client::GameApi;
use crate::common::ApiError;
use crate::config::{ClientConfig, PROBE_TIMEOUT};
use crate::protocol::{
    EnemyFireRequest, EnemyFireResponse, ErrorResponse, FireRequest, FireResponse, JoinRequest,
    PingResponse, ENEMY_FIRE_PATH, FIRE_PATH, JOIN_PATH, PING_PATH,
};
use crate::ship::Placement;

/// [`GameApi`] over HTTP/JSON against a real game server.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    port: u16,
    probe_timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            host: config.host.clone(),
            port: config.port,
            probe_timeout: PROBE_TIMEOUT,
        })
    }

    /// Open and close a raw TCP connection to the server.
    pub async fn probe(&self) -> Result<(), ApiError> {
        let addr = (self.host.as_str(), self.port);
        match timeout(self.probe_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(ApiError::Connection(e.to_string())),
            Err(_) => Err(ApiError::Timeout),
        }
    }

    /// One-line, human readable result of [`probe`](Self::probe).
    pub async fn connection_details(&self) -> String {
        match self.probe().await {
            Ok(()) => format!("Connected to {}:{} successfully", self.host, self.port),
            Err(e) => format!("Failed to connect to {}:{} - {}", self.host, self.port, e),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!("POST {} {}", path, serde_json::to_string(body).unwrap_or_default());
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(path, response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Connection(err.to_string())
    }
}

async fn decode<R: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<R, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    debug!("{} -> {} {}", path, status, body);
    if !status.is_success() {
        let message = parse_error(&body);
        error!("{} failed: {}", path, message);
        return Err(if status.is_server_error() {
            ApiError::classify_server_failure(&message)
        } else {
            ApiError::classify(&message)
        });
    }
    if body.trim().is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Extract the message of an error body, which is either `{"Error": "..."}` or
/// plain text.
pub fn parse_error(body: &str) -> String {
    if body.trim().is_empty() {
        return "Server returned no error details".to_string();
    }
    if !body.contains("Error") {
        return body.to_string();
    }
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error: Some(msg) }) => msg,
        Ok(ErrorResponse { error: None }) => "Unknown server error".to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait::async_trait]
impl GameApi for HttpClient {
    async fn ping(&self) -> Result<bool, ApiError> {
        debug!("GET {}", PING_PATH);
        let response = self
            .http
            .get(self.url(PING_PATH))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: PingResponse = decode(PING_PATH, response).await?;
        Ok(body.ping == Some(true))
    }

    async fn join(
        &self,
        player: &str,
        game_key: &str,
        ships: &[Placement],
    ) -> Result<EnemyFireResponse, ApiError> {
        let request = JoinRequest {
            player: player.to_string(),
            gamekey: game_key.to_string(),
            ships: ships.to_vec(),
        };
        self.post(JOIN_PATH, &request).await
    }

    async fn fire(
        &self,
        player: &str,
        game_key: &str,
        x: i32,
        y: i32,
    ) -> Result<FireResponse, ApiError> {
        let request = FireRequest {
            player: player.to_string(),
            gamekey: game_key.to_string(),
            x,
            y,
        };
        self.post(FIRE_PATH, &request).await
    }

    async fn enemy_fire(&self, player: &str, game_key: &str) -> Result<EnemyFireResponse, ApiError> {
        let request = EnemyFireRequest {
            player: player.to_string(),
            gamekey: game_key.to_string(),
        };
        self.post(ENEMY_FIRE_PATH, &request).await
    }
}
