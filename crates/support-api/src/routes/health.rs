//! 헬스 체크 엔드포인트.
//!
//! 로드밸런서나 오케스트레이션 시스템에서 사용됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /health` - 간단한 liveness 체크
//! - `GET /health/ready` - 의존성 상태를 포함한 readiness 체크

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 데이터베이스 연결 상태
    pub database: ComponentStatus,
    /// 사용자 디렉터리 상태
    pub directory: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,
    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 정보 포함 정상 상태.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }
}

/// GET /health - 간단한 liveness 체크.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 응답 가능")),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /health/ready - 의존성 상태를 포함한 readiness 체크.
///
/// 데이터베이스가 설정되어 있는데 응답하지 않으면 503을
/// 반환합니다. 인메모리 디렉터리 모드에서는 데이터베이스가
/// `not_configured`로 표시됩니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "서비스 준비됨", body = HealthResponse),
        (status = 503, description = "의존성 장애", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";
    let mut status_code = StatusCode::OK;

    let (database, directory) = if state.db_pool.is_some() {
        if state.is_db_healthy().await {
            (ComponentStatus::up(), ComponentStatus::up())
        } else {
            overall_status = "degraded";
            status_code = StatusCode::SERVICE_UNAVAILABLE;
            (
                ComponentStatus::down("연결 실패"),
                ComponentStatus::down("데이터베이스에 접근할 수 없습니다"),
            )
        }
    } else {
        (
            ComponentStatus::not_configured(),
            ComponentStatus::up_with_info("in-memory"),
        )
    };

    let now = chrono::Utc::now();
    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: (now - state.started_at).num_seconds(),
        timestamp: now.to_rfc3339(),
        components: ComponentHealth {
            database,
            directory,
        },
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
