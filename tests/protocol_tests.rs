mod common;

use common::standard_fleet;
use serde_json::json;
use sinkdestroy::client::http::parse_error;
use sinkdestroy::protocol::{EnemyFireResponse, FireRequest, FireResponse, JoinRequest, PingResponse};
use sinkdestroy::{ApiError, Cell};

#[test]
fn join_request_shape() {
    let request = JoinRequest {
        player: "alice".to_string(),
        gamekey: "game1".to_string(),
        ships: standard_fleet()[..1].to_vec(),
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "player": "alice",
            "gamekey": "game1",
            "ships": [{"ship": "Carrier", "x": 0, "y": 0, "orientation": "horizontal"}]
        })
    );
}

#[test]
fn fire_request_and_response_shape() {
    let request = FireRequest {
        player: "alice".to_string(),
        gamekey: "game1".to_string(),
        x: 3,
        y: 7,
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"player": "alice", "gamekey": "game1", "x": 3, "y": 7})
    );

    let response: FireResponse =
        serde_json::from_str(r#"{"hit": true, "shipsSunk": ["Submarine"]}"#).unwrap();
    assert!(response.hit);
    assert_eq!(response.ships_sunk, vec!["Submarine".to_string()]);

    let bare: FireResponse = serde_json::from_str(r#"{"hit": false}"#).unwrap();
    assert!(bare.ships_sunk.is_empty());
}

#[test]
fn enemy_fire_response_optional_fields() {
    let empty: EnemyFireResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, EnemyFireResponse::no_move());
    assert_eq!(empty.cell(), None);
    assert!(!empty.gameover);

    let shot: EnemyFireResponse = serde_json::from_str(r#"{"x": 3, "y": 4, "gameover": false}"#).unwrap();
    assert_eq!(shot.cell(), Some(Cell::new(3, 4)));

    let half: EnemyFireResponse = serde_json::from_str(r#"{"x": 3}"#).unwrap();
    assert_eq!(half.cell(), None);

    let over: EnemyFireResponse = serde_json::from_str(r#"{"gameover": true}"#).unwrap();
    assert_eq!(over, EnemyFireResponse::game_over());

    let ping: PingResponse = serde_json::from_str(r#"{"ping": true}"#).unwrap();
    assert_eq!(ping.ping, Some(true));
}

#[test]
fn error_bodies() {
    assert_eq!(parse_error(r#"{"Error": "Game not found"}"#), "Game not found");
    assert_eq!(parse_error(r#"{"Error": null}"#), "Unknown server error");
    assert_eq!(parse_error("plain failure"), "plain failure");
    assert_eq!(parse_error(""), "Server returned no error details");
}

#[test]
fn error_classification() {
    assert_eq!(ApiError::classify("Game not found"), ApiError::GameNotFound);
    assert_eq!(ApiError::classify("Invalid game key"), ApiError::InvalidGame);
    assert_eq!(ApiError::classify("Game already exists"), ApiError::GameExists);
    assert_eq!(ApiError::classify("It is not your turn"), ApiError::NotYourTurn);
    assert_eq!(ApiError::classify("Invalid coordinates"), ApiError::InvalidCoordinates);
    assert_eq!(ApiError::classify("Player name too short"), ApiError::IdTooShort);
    assert_eq!(ApiError::classify("Invalid ship placement"), ApiError::InvalidShips);
    assert_eq!(
        ApiError::classify("teapot"),
        ApiError::Server("teapot".to_string())
    );

    assert!(ApiError::GameNotFound.is_session_ending());
    assert!(ApiError::InvalidGame.is_session_ending());
    assert!(!ApiError::Timeout.is_session_ending());
    assert!(ApiError::GameExists.is_join_rejection());
    assert!(!ApiError::Connection("reset".to_string()).is_join_rejection());
}

#[test]
fn server_failures_are_retryable() {
    assert_eq!(
        ApiError::classify_server_failure("Internal Server Error"),
        ApiError::Unavailable("Internal Server Error".to_string())
    );
    assert_eq!(
        ApiError::classify_server_failure("Game not found"),
        ApiError::GameNotFound
    );
    assert!(!ApiError::Unavailable("busy".to_string()).is_join_rejection());
    assert!(!ApiError::Unavailable("busy".to_string()).is_session_ending());
    assert_eq!(
        ApiError::Unavailable("busy".to_string()).to_string(),
        "Server unavailable: busy"
    );
}

#[test]
fn shots_must_be_whole_and_on_the_grid() {
    assert_eq!(EnemyFireResponse::no_move().validated(), Ok(EnemyFireResponse::no_move()));
    assert_eq!(EnemyFireResponse::shot(9, 0).validated(), Ok(EnemyFireResponse::shot(9, 0)));
    assert!(matches!(
        EnemyFireResponse::shot(42, -7).validated(),
        Err(ApiError::Malformed(_))
    ));
    let half = EnemyFireResponse {
        x: Some(3),
        y: None,
        gameover: false,
    };
    assert!(matches!(half.validated(), Err(ApiError::Malformed(_))));
    let over = EnemyFireResponse {
        x: Some(99),
        y: None,
        gameover: true,
    };
    assert_eq!(over.clone().validated(), Ok(over));
}
