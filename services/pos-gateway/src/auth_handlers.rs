use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use common_auth::{AuthContext, Credential};
use common_http_errors::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::users::UserProfile;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    let (Some(username), Some(password)) = (
        req.username.filter(|u| !u.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        state.metrics.login_attempt("missing_credentials");
        return Err(ApiError::bad_request(
            "missing_credentials",
            "Username and password required",
        ));
    };

    let Some(user) = state.users.authenticate(&username, &password) else {
        warn!(%username, "login rejected");
        state.metrics.login_attempt("invalid_credentials");
        return Err(ApiError::unauthorized(
            "invalid_credentials",
            "Invalid credentials",
        ));
    };

    let token = state
        .token_codec
        .issue(&user.subject())
        .map_err(ApiError::internal)?;
    state.metrics.login_attempt("success");
    info!(user_id = user.id, %username, role = %user.role, "login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: user.profile(),
        message: "Login successful",
    }))
}

/// Tokens are stateless; logout only acknowledges.
pub async fn logout(Extension(credential): Extension<Credential>) -> Json<LogoutResponse> {
    info!(user_id = credential.id, username = %credential.username, "logout");
    Json(LogoutResponse {
        success: true,
        message: "Logged out successfully",
    })
}

/// Gate for protected routes: rejects with 401/403 via `AuthError`, otherwise
/// attaches the verified `Credential` to the request.
pub async fn require_credential(auth: AuthContext, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(auth.into_credential());
    next.run(request).await
}
