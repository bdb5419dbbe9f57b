//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `POST /login` - 인증 및 토큰 발급
//! - `GET /health` - 헬스 체크 (liveness)
//! - `GET /health/ready` - 상세 헬스 체크 (readiness)
//! - `GET /users/me` - 현재 사용자 조회
//! - `GET|POST /users`, `PATCH|DELETE /users/{user_name}` -
//!   사용자 관리 (관리자 전용)

pub mod auth;
pub mod health;
pub mod users;

pub use auth::{auth_router, LoginRequest, LoginResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use users::{users_router, CreateUserRequest, UpdateUserRequest, UserListResponse};

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth_router())
        .nest("/health", health_router())
        .nest("/users", users_router())
}
