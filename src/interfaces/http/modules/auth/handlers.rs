//! Authentication API handlers
//!
//! Thin wrappers over `AuthService`. Password hashes arrive already hashed;
//! only login and password change take a plaintext candidate.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CheckEmailRequest, CheckRefreshTokenRequest, CreateUserRequest, LoginRequest,
    ResetPasswordRequest, SaveVerificationCodeRequest, StoreRefreshTokenRequest,
    VerifyCodeRequest, VerifyCodeResponse,
};
use crate::application::AuthService;
use crate::domain::{CreateUserDto, RefreshToken, ResetPasswordDto};
use crate::interfaces::http::common::{api_error, parse_id, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserDto;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth_service: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/users",
    tag = "Authentication",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .auth_service
        .create(CreateUserDto {
            email: request.email,
            password_hash: request.password_hash,
            full_name: request.full_name,
        })
        .await
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/users/by-email/{email}",
    tag = "Authentication",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AuthHandlerState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .auth_service
        .get_by_email(&email)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials match", body = ApiResponse<UserDto>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-tokens",
    tag = "Authentication",
    request_body = StoreRefreshTokenRequest,
    responses(
        (status = 201, description = "Token stored"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_refresh_token(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<StoreRefreshTokenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    state
        .auth_service
        .store_refresh_token(RefreshToken {
            user_id: request.user_id,
            refresh_token: request.refresh_token,
            expires_in: request.expires_in,
        })
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth/refresh-tokens/users/{user_id}",
    tag = "Authentication",
    params(("user_id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "All tokens of the user removed"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_refresh_tokens(
    State(state): State<AuthHandlerState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id = parse_id(&user_id)?;
    state
        .auth_service
        .delete_refresh_token_by_user_id(user_id)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-tokens/check",
    tag = "Authentication",
    request_body = CheckRefreshTokenRequest,
    responses(
        (status = 200, description = "Token exists"),
        (status = 404, description = "Unknown token")
    )
)]
pub async fn check_refresh_token(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<CheckRefreshTokenRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service
        .check_refresh_token_exists(&request.refresh_token)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/emails/check",
    tag = "Authentication",
    request_body = CheckEmailRequest,
    responses(
        (status = 200, description = "An active user has this email"),
        (status = 404, description = "No active user has this email")
    )
)]
pub async fn check_email(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<CheckEmailRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service
        .check_email_exists(&request.email)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password/reset",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced"),
        (status = 404, description = "No active user has this email")
    )
)]
pub async fn reset_password(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service
        .reset_password(ResetPasswordDto {
            email: request.email,
            new_password_hash: request.new_password_hash,
        })
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/verification-codes",
    tag = "Authentication",
    request_body = SaveVerificationCodeRequest,
    responses(
        (status = 200, description = "Code stored, replacing any previous one"),
        (status = 503, description = "Code store unavailable")
    )
)]
pub async fn save_verification_code(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SaveVerificationCodeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service
        .save_verification_code(&request.email, &request.code)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verification-codes/verify",
    tag = "Authentication",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Verification outcome; a matching code is consumed", body = ApiResponse<VerifyCodeResponse>)
    )
)]
pub async fn verify_code(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<VerifyCodeResponse>>, ApiError> {
    let valid = state
        .auth_service
        .verify_code(&request.email, &request.code)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(VerifyCodeResponse { valid })))
}
