//! Chat task and raw command endpoints
//!
//! Both accept the field names used by the chat bridge (`discord_id`,
//! `message`) as aliases.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use phonebot::{CommandResponse, Params, TaskResponse};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    #[serde(default, alias = "discord_id")]
    pub identity: String,
    #[serde(default, alias = "message")]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default, alias = "discord_id")]
    pub identity: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub params: Option<Params>,
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Json(payload) = payload?;

    let response = state
        .router
        .handle(&payload.identity, &payload.text)
        .await?;
    Ok(Json(response))
}

pub async fn raw_command(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(payload) = payload?;
    let action = payload.action.unwrap_or_default();
    let params = payload.params.unwrap_or_default();

    let response = state
        .router
        .handle_command(&payload.identity, &action, params)
        .await?;
    Ok(Json(response))
}
