//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 인증/인가 실패의 상태 코드 매핑은 [`crate::auth::middleware`]에
//! 있으며, 이 모듈은 응답 본문과 그 외 실패(검증, 디렉터리 장애,
//! 내부 에러)의 매핑을 담당합니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use support_core::SupportError;

/// API 작업을 위한 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

/// 통합 API 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "user_name은 문자만 포함해야 합니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 타임스탬프 포함 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    ///
    /// 종류와 무관하게 바이트 단위로 동일해야 하는 응답(균일한 401)에
    /// 사용합니다.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// 상태 코드가 결합된 API 에러.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP 상태 코드
    pub status: StatusCode,
    /// 응답 본문
    pub body: ApiErrorResponse,
}

impl ApiError {
    /// 422 - 요청 본문 검증 실패.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ApiErrorResponse::new("VALIDATION_ERROR", message),
        }
    }

    /// 404 - 리소스 없음.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiErrorResponse::new("NOT_FOUND", message),
        }
    }

    /// 409 - 입력 충돌 (중복 사용자 이름 등).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            body: ApiErrorResponse::new("CONFLICT", message),
        }
    }

    /// 500 - 내부 에러. 메시지에 민감한 값을 넣지 않습니다.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiErrorResponse::new("INTERNAL", message),
        }
    }

    /// 503 - 사용자 디렉터리 사용 불가.
    pub fn directory_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: ApiErrorResponse::new(
                "DIRECTORY_UNAVAILABLE",
                "사용자 디렉터리를 사용할 수 없습니다",
            ),
        }
    }
}

impl From<SupportError> for ApiError {
    fn from(err: SupportError) -> Self {
        match err {
            SupportError::Database(_) => {
                tracing::error!(error = %err, "Directory unavailable");
                Self::directory_unavailable()
            }
            SupportError::InvalidInput(message) => Self::conflict(message),
            SupportError::NotFound(message) => Self::not_found(message),
            SupportError::Config(_) | SupportError::Internal(_) => {
                tracing::error!(error = %err, "Internal error");
                Self::internal("내부 에러가 발생했습니다")
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_has_no_timestamp() {
        let body = ApiErrorResponse::simple("UNAUTHORIZED", "nope");
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("timestamp"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_support_error_mapping() {
        let err = ApiError::from(SupportError::Database("down".to_string()));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(SupportError::InvalidInput("dup".to_string()));
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = ApiError::from(SupportError::NotFound("user".to_string()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
