use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::user_models::{
    LoginCredentials, OtpLoginRequest, OtpVerifyRequest, UserView,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Successful login/verification payload
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
}

/// OTP issuance payload. The code itself is echoed only in demo mode.
#[derive(Debug, Serialize)]
pub struct OtpResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Password-based authentication
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(credentials) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;

    let user = state.auth_service.login(&credentials).await?;
    Ok(Json(AuthResponse { user }))
}

/// Issue an OTP for the given user/role pair
pub async fn generate_otp(
    State(state): State<AppState>,
    payload: Result<Json<OtpLoginRequest>, JsonRejection>,
) -> ApiResult<Json<OtpResponse>> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;

    let code = state.auth_service.generate_otp(&request).await?;

    Ok(Json(OtpResponse {
        message: "OTP sent successfully".to_string(),
        otp: state.security.otp_echo.then_some(code),
    }))
}

/// Verify a previously issued OTP
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<OtpVerifyRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;

    let user = state.auth_service.verify_otp(&request).await?;
    Ok(Json(AuthResponse { user }))
}
