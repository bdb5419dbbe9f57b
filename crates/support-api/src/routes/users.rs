//! 사용자 관리 라우트.
//!
//! 자격증명 레코드의 수정 서피스는 디렉터리가 소유하며, 이
//! 라우트들은 관리자 역할로 게이트됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /users` - 전체 사용자 조회 (관리자)
//! - `POST /users` - 사용자 생성 (관리자)
//! - `PATCH /users/{user_name}` - 부분 수정 (관리자)
//! - `DELETE /users/{user_name}` - 비활성화, 소프트 삭제 (관리자)
//! - `GET /users/me` - 현재 인증된 사용자 조회

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use support_core::{
    is_valid_user_name, CredentialRecord, Principal, Role, UserUpdate,
};

use crate::auth::{hash_password, validate_password_strength, AdminUser, CurrentUser};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 사용자 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// 사용자 목록 (해시는 포함되지 않음)
    pub users: Vec<Principal>,
    /// 총 개수
    pub total: usize,
}

/// 사용자 생성 요청.
///
/// 새 사용자는 `user` 역할, 활성 상태로 생성됩니다. 역할 변경은
/// 이후 PATCH로 수행합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// 사용자 이름 (문자와 하이픈만, 최대 15자)
    #[validate(custom(function = "validate_user_name"))]
    pub user_name: String,
    /// 평문 비밀번호 (저장 전에 해싱됨)
    pub password: String,
    /// 연결할 직원 ID
    #[serde(default)]
    pub employee_id: i32,
}

/// 사용자 수정 요청. 생략된 필드는 유지됩니다.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// 직원 ID 변경
    #[serde(default)]
    pub employee_id: Option<i32>,
    /// 비활성 플래그 변경
    #[serde(default)]
    pub disabled: Option<bool>,
    /// 역할 변경
    #[serde(default)]
    pub role: Option<Role>,
    /// 새 평문 비밀번호 (저장 전에 해싱됨)
    #[serde(default)]
    pub password: Option<String>,
}

fn validate_user_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_user_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_user_name")
            .with_message("user_name은 문자와 하이픈만 포함해야 합니다 (최대 15자)".into()))
    }
}

/// 평문 비밀번호를 검사하고 블로킹 풀에서 해싱합니다.
async fn check_and_hash_password(password: String) -> Result<String, ApiError> {
    validate_password_strength(&password).map_err(ApiError::validation)?;

    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| ApiError::internal("비밀번호 해싱에 실패했습니다"))?
        .map_err(|_| ApiError::internal("비밀번호 해싱에 실패했습니다"))
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /users/me - 현재 인증된 사용자.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "현재 Principal", body = Principal),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}

/// GET /users - 전체 사용자 조회 (관리자 전용).
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "사용자 목록", body = UserListResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 아님", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.directory.list().await?;
    let total = users.len();

    Ok(Json(UserListResponse { users, total }))
}

/// POST /users - 사용자 생성 (관리자 전용).
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "생성된 사용자", body = Principal),
        (status = 409, description = "이미 존재하는 사용자 이름", body = ApiErrorResponse),
        (status = 422, description = "요청 본문 검증 실패", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Principal>), ApiError> {
    request.validate()?;
    let hashed_password = check_and_hash_password(request.password).await?;

    let record = CredentialRecord {
        user_name: request.user_name,
        employee_id: request.employee_id,
        disabled: false,
        hashed_password,
        role: Role::User,
    };

    let principal = state.directory.create(record).await?;
    info!(user_name = %principal.user_name, by = %admin.user_name, "User created");

    Ok((StatusCode::CREATED, Json(principal)))
}

/// PATCH /users/{user_name} - 사용자 부분 수정 (관리자 전용).
#[utoipa::path(
    patch,
    path = "/users/{user_name}",
    params(("user_name" = String, Path, description = "수정할 사용자 이름")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정된 사용자", body = Principal),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse),
        (status = 422, description = "요청 본문 검증 실패", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(user_name): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<Principal>> {
    let hashed_password = match request.password {
        Some(password) => Some(check_and_hash_password(password).await?),
        None => None,
    };

    let changes = UserUpdate {
        employee_id: request.employee_id,
        disabled: request.disabled,
        role: request.role,
        hashed_password,
    };

    let principal = state
        .directory
        .update(&user_name, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("사용자 없음: {}", user_name)))?;

    info!(user_name = %principal.user_name, by = %admin.user_name, "User updated");

    Ok(Json(principal))
}

/// DELETE /users/{user_name} - 사용자 비활성화 (관리자 전용).
///
/// 레코드는 삭제되지 않고 `disabled = true`로 표시됩니다. 이후
/// 해당 사용자의 유효한 토큰도 활성 게이트에서 거부됩니다.
#[utoipa::path(
    delete,
    path = "/users/{user_name}",
    params(("user_name" = String, Path, description = "비활성화할 사용자 이름")),
    responses(
        (status = 200, description = "비활성화된 사용자", body = Principal),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn disable_user(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(user_name): Path<String>,
) -> ApiResult<Json<Principal>> {
    let principal = state
        .directory
        .disable(&user_name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("사용자 없음: {}", user_name)))?;

    info!(user_name = %principal.user_name, by = %admin.user_name, "User disabled");

    Ok(Json(principal))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(me))
        .route("/{user_name}", patch(update_user).delete(disable_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_validation() {
        assert!(validate_user_name("leon").is_ok());
        assert!(validate_user_name("anna-maria").is_ok());

        assert!(validate_user_name("leon42").is_err());
        assert!(validate_user_name("").is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateUserRequest {
            user_name: "leon".to_string(),
            password: "Password1".to_string(),
            employee_id: 0,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateUserRequest {
            user_name: "leon 42".to_string(),
            password: "Password1".to_string(),
            employee_id: 0,
        };
        assert!(invalid.validate().is_err());
    }
}
