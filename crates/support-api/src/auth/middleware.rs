//! Axum용 인증 추출기.
//!
//! `Authorization: Bearer` 헤더에서 토큰을 꺼내 해석하고 인가
//! 게이트를 통과시킨 Principal을 핸들러에 전달합니다.
//!
//! 외부 응답 정책: 401 계열 실패는 종류와 무관하게 동일한 본문을
//! 반환하며, 내부 종류는 debug 로그로만 구분합니다. 역할 부족만
//! 403으로, 디렉터리 장애만 503으로 구분됩니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

use support_core::Role;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

use super::gate::{require_active, require_role};
use super::service::Rejection;

/// 인증 계층의 요청 거부.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization 헤더 없음
    #[error("Authorization 헤더가 없습니다")]
    MissingToken,
    /// Bearer 스킴이 아님
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidScheme,
    /// 인증/인가 거부
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// 토큰 발급 실패 (서버 측 문제)
    #[error("토큰 발급에 실패했습니다")]
    IssueFailed,
}

impl AuthError {
    fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidScheme => "invalid_scheme",
            AuthError::Rejected(rejection) => rejection.kind(),
            AuthError::IssueFailed => "issue_failed",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // 내부 종류는 로그로만 남기고 본문은 상태 코드별로 균일하다
        tracing::debug!(kind = self.kind(), "Request rejected");

        let (status, body) = match &self {
            AuthError::Rejected(Rejection::Forbidden) => (
                StatusCode::FORBIDDEN,
                ApiErrorResponse::simple("FORBIDDEN", "관리자만 접근할 수 있습니다"),
            ),
            AuthError::Rejected(Rejection::DirectoryUnavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorResponse::simple(
                    "DIRECTORY_UNAVAILABLE",
                    "사용자 디렉터리를 사용할 수 없습니다",
                ),
            ),
            AuthError::IssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorResponse::simple("INTERNAL", "내부 에러가 발생했습니다"),
            ),
            _ => (
                StatusCode::UNAUTHORIZED,
                ApiErrorResponse::simple("UNAUTHORIZED", "자격증명을 확인할 수 없습니다"),
            ),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// 인증된 활성 사용자 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
///     Json(principal)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub support_core::Principal);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidScheme)?;

        let principal = state.auth.resolve(token).await?;
        require_active(&principal)?;

        Ok(CurrentUser(principal))
    }
}

/// 관리자 권한 추출기.
///
/// [`CurrentUser`] 해석 후 역할 게이트를 추가로 적용합니다.
#[derive(Debug, Clone)]
pub struct AdminUser(pub support_core::Principal);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&principal, Role::Admin)?;
        Ok(AdminUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_core::SupportError;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidScheme, StatusCode::UNAUTHORIZED),
            (
                Rejection::InvalidCredentials.into(),
                StatusCode::UNAUTHORIZED,
            ),
            (Rejection::Expired.into(), StatusCode::UNAUTHORIZED),
            (Rejection::BadSignature.into(), StatusCode::UNAUTHORIZED),
            (Rejection::Malformed.into(), StatusCode::UNAUTHORIZED),
            (Rejection::Inactive.into(), StatusCode::UNAUTHORIZED),
            (Rejection::Forbidden.into(), StatusCode::FORBIDDEN),
            (
                Rejection::DirectoryUnavailable(SupportError::Database("down".into())).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_unauthorized_carries_www_authenticate() {
        let response = AuthError::from(Rejection::Expired).into_response();
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
