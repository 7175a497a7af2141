//! User management API handlers
//!
//! Thin wrappers over `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ChangePasswordRequest, ChangeUserRoleRequest, ListUsersParams, UpdateUserRequest,
    UpdatedUserDto, UserDto,
};
use crate::application::UserService;
use crate::domain::{ChangePasswordDto, ChangeUserRoleDto, GetUsersDto, UpdateUserDto, UserFilter};
use crate::interfaces::http::common::{
    api_error, non_empty, parse_id, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list, newest first", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 400, description = "Invalid page or limit"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserDto>>>, ApiError> {
    let dto = GetUsersDto {
        filter: UserFilter {
            full_name: non_empty(params.full_name),
            email: non_empty(params.email),
            user_role: non_empty(params.user_role),
        },
        pagination: PaginationParams::new(params.page, params.limit),
    };

    let page = state.user_service.get_all(dto).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from(
        page.map(UserDto::from),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.user_service.get_by_id(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UpdatedUserDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UpdatedUserDto>>, ApiError> {
    let id = parse_id(&id)?;
    let dto = UpdateUserDto {
        full_name: request.full_name,
        email: request.email,
        password_hash: request.password_hash,
    };

    let updated = state.user_service.update(id, dto).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(UpdatedUserDto::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "User deleted (repeat deletes also succeed)"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    state.user_service.delete(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/password",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password does not match"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_password(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id = parse_id(&id)?;
    state
        .user_service
        .change_password(ChangePasswordDto {
            user_id,
            current_password: request.current_password,
            new_password_hash: request.new_password_hash,
        })
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    request_body = ChangeUserRoleRequest,
    responses(
        (status = 200, description = "Role changed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_user_role(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeUserRoleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id = parse_id(&id)?;
    state
        .user_service
        .change_user_role(ChangeUserRoleDto {
            user_id,
            new_user_role: request.new_user_role,
        })
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(())))
}
