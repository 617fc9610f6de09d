// src/routes/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::models::{Department, StaffUser};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResp {
    pub user: StaffUser,
    /// Filter the client should apply to its queries; `null` for admins.
    pub department_scope: Option<Department>,
}

/// POST /api/v1/auth/login
///
/// The password digest never serializes, so the response is the safe view of
/// the user record.
pub async fn login(
    State(state): State<AppState>,
    Json(b): Json<LoginBody>,
) -> Result<Json<LoginResp>, (StatusCode, String)> {
    match state.directory.authenticate(&b.username, &b.password) {
        Some(user) => Ok(Json(LoginResp {
            department_scope: user.department_scope(),
            user: user.clone(),
        })),
        None => Err((
            StatusCode::UNAUTHORIZED,
            "invalid username or password".into(),
        )),
    }
}
