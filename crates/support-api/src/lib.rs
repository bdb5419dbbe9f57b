//! REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 토큰 기반 인증 및 역할 기반 인가 코어
//! - 사용자 디렉터리 collaborator 구현 (Postgres / 인메모리)
//! - Axum 기반 REST API (로그인, 사용자 관리, 헬스 체크)
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`auth`]: 해셔, 토큰 코덱, 인증 서비스, 인가 게이트, 추출기
//! - [`directory`]: 사용자 디렉터리 구현체
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`error`]: 통합 API 에러 응답
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod directory;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use auth::{
    hash_password, require_active, require_role, verify_password, AdminUser, AuthError,
    AuthService, Claims, Clock, CurrentUser, Rejection, SystemClock, TokenCodec, TokenError,
};
pub use directory::{MemoryDirectory, PgUserDirectory};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
