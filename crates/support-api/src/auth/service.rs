//! 인증 서비스.
//!
//! 자격증명 해셔, 토큰 코덱, 사용자 디렉터리를 조합하여 로그인
//! 시도와 토큰 해석을 처리합니다. 디렉터리 장애는 자격증명 실패로
//! 번역하지 않고 그대로 전파합니다.

use std::sync::Arc;

use tracing::{debug, warn};

use support_core::{Principal, SupportError, UserDirectory};

use super::jwt::{IssuedToken, TokenCodec, TokenError};
use super::password::verify_password;

/// 인증/인가 단계가 실패한 이유.
///
/// 내부적으로는 종류를 구분하지만, HTTP 계층은 401 계열을 모두
/// 동일한 외부 응답으로 매핑합니다.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// 알 수 없는 사용자 또는 비밀번호 불일치 (호출자에게는 구분 불가)
    #[error("잘못된 사용자 이름 또는 비밀번호")]
    InvalidCredentials,
    /// 토큰 만료
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 토큰 서명 불일치
    #[error("토큰 서명이 유효하지 않습니다")]
    BadSignature,
    /// 해석 불가능한 토큰
    #[error("토큰 형식이 잘못되었습니다")]
    Malformed,
    /// 비활성화된 계정
    #[error("비활성화된 계정입니다")]
    Inactive,
    /// 역할 부족
    #[error("이 작업을 수행할 권한이 없습니다")]
    Forbidden,
    /// 디렉터리 장애 - 자격증명 실패로 위장하지 않는다
    #[error("사용자 디렉터리를 사용할 수 없습니다")]
    DirectoryUnavailable(#[source] SupportError),
}

impl Rejection {
    /// 로그용 종류 식별자.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::InvalidCredentials => "invalid_credentials",
            Rejection::Expired => "expired",
            Rejection::BadSignature => "bad_signature",
            Rejection::Malformed => "malformed",
            Rejection::Inactive => "inactive",
            Rejection::Forbidden => "forbidden",
            Rejection::DirectoryUnavailable(_) => "directory_unavailable",
        }
    }
}

impl From<TokenError> for Rejection {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Rejection::Expired,
            TokenError::BadSignature => Rejection::BadSignature,
            TokenError::Malformed | TokenError::Encoding => Rejection::Malformed,
        }
    }
}

/// 로그인과 토큰 해석을 담당하는 서비스.
///
/// 요청 간 공유 가변 상태가 없으므로 `Arc`로 감싸 동시에 사용해도
/// 안전합니다.
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    codec: TokenCodec,
}

impl AuthService {
    /// 새 인증 서비스를 생성합니다.
    pub fn new(directory: Arc<dyn UserDirectory>, codec: TokenCodec) -> Self {
        Self { directory, codec }
    }

    /// 토큰 수명을 반환합니다.
    pub fn token_ttl(&self) -> chrono::Duration {
        self.codec.ttl()
    }

    /// 사용자 이름/비밀번호를 검증하고 Principal을 반환합니다.
    ///
    /// 사용자 없음과 비밀번호 불일치는 사용자 열거를 막기 위해
    /// 동일한 [`Rejection::InvalidCredentials`]로 합쳐집니다.
    /// 비활성 계정 검사는 여기가 아니라 인가 게이트의 몫입니다.
    pub async fn authenticate(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<Principal, Rejection> {
        let record = self
            .directory
            .find_by_user_name(user_name)
            .await
            .map_err(|e| {
                warn!(error = %e, "Directory lookup failed during login");
                Rejection::DirectoryUnavailable(e)
            })?;

        let Some(record) = record else {
            debug!("Login attempt for unknown user");
            return Err(Rejection::InvalidCredentials);
        };

        // Argon2 검증은 CPU 비용이 커서 블로킹 풀에서 수행한다
        let candidate = password.to_string();
        let stored_hash = record.hashed_password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| {
                Rejection::DirectoryUnavailable(SupportError::Internal(e.to_string()))
            })?;

        if !matches {
            debug!(user_name = %record.user_name, "Password mismatch");
            return Err(Rejection::InvalidCredentials);
        }

        Ok(Principal::from(&record))
    }

    /// Principal에 대한 토큰을 발급합니다.
    pub fn issue_for(&self, principal: &Principal) -> Result<IssuedToken, TokenError> {
        self.codec.issue(&principal.user_name, principal.role)
    }

    /// 토큰을 해석하여 현재 Principal을 반환합니다.
    ///
    /// 코덱의 실패 종류는 그대로 전파됩니다. subject 조회는 매번
    /// 새로 수행되므로 발급 이후 삭제/비활성화된 사용자가
    /// 반영됩니다.
    pub async fn resolve(&self, raw_token: &str) -> Result<Principal, Rejection> {
        let claims = self.codec.parse(raw_token)?;

        let record = self
            .directory
            .find_by_user_name(&claims.sub)
            .await
            .map_err(|e| {
                warn!(error = %e, "Directory lookup failed during token resolution");
                Rejection::DirectoryUnavailable(e)
            })?;

        // 발급 이후 삭제된 사용자
        let Some(record) = record else {
            debug!("Token subject no longer exists");
            return Err(Rejection::InvalidCredentials);
        };

        Ok(Principal::from(&record))
    }
}
