// Registration and login HTTP handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use pulselink_core::models::{RegisterCouple, RoomCode};

use super::{AppResult, AppState};

/// Register request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub room_code: RoomCode,
    pub user_a: String,
    pub user_b: String,
    pub letter_a: String,
    pub letter_b: String,
    pub song: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

/// Login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub room_code: RoomCode,
    pub my_name: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub letter: String,
    pub song: String,
    pub pulse_count: i64,
}

/// Register a new couple under a room code
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    state
        .couple_service
        .register(RegisterCouple {
            room_code: req.room_code,
            user_a: req.user_a,
            user_b: req.user_b,
            letter_a: req.letter_a,
            letter_b: req.letter_b,
            song: req.song,
        })
        .await?;

    Ok(Json(RegisterResponse { success: true }))
}

/// Log a participant into their room
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .couple_service
        .login(&req.room_code, &req.my_name)
        .await?;

    Ok(Json(LoginResponse {
        letter: outcome.letter,
        song: outcome.song,
        pulse_count: outcome.pulse_count,
    }))
}
