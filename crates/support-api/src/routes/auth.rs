//! 인증 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /login` - 사용자 이름/비밀번호로 bearer 토큰 발급

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 사용자 이름
    pub username: String,
    /// 평문 비밀번호
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// 인코딩된 bearer 토큰
    pub access_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// 토큰 수명 (초)
    pub expires_in: i64,
}

/// POST /login - 사용자 인증 및 토큰 발급.
///
/// 알 수 없는 사용자와 잘못된 비밀번호는 동일한 401 응답을
/// 반환합니다.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "인증 성공, bearer 토큰 발급", body = LoginResponse),
        (status = 401, description = "잘못된 사용자 이름 또는 비밀번호", body = ApiErrorResponse),
        (status = 503, description = "사용자 디렉터리 사용 불가", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let principal = state
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state.auth.issue_for(&principal).map_err(|e| {
        error!(error = %e, "Token issuance failed");
        AuthError::IssueFailed
    })?;

    info!(user_name = %principal.user_name, "Login succeeded");

    Ok(Json(LoginResponse {
        access_token: token.access_token,
        token_type: "bearer".to_string(),
        expires_in: state.auth.token_ttl().num_seconds(),
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}
