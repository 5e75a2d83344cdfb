//! Handler for `/login`.

use axum::extract::State;
use axum::Json;
use gatepass_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::response::LoginResponse;
use crate::state::AppState;

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login
///
/// Check a username/password pair. Returns the user's public profile; a
/// mismatch on either field is a 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::authenticate(&state.pool, &input.username, &input.password)
        .await
        .inspect_err(|_| tracing::info!(username = %input.username, "Login failed"))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        user,
    }))
}
