//! 토큰 코덱.
//!
//! 공유 비밀 키와 HMAC 계열 알고리즘으로 서명된 시간 제한 클레임을
//! 인코딩/디코딩합니다. 서명 검증은 디코딩된 어떤 필드를 신뢰하기
//! 전에 수행되며, 만료 검사는 주입 가능한 시계를 기준으로 서명
//! 검증 이후에 수행됩니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use support_core::{AuthConfig, Role};

/// 현재 시각 제공자.
///
/// 만료 검사를 테스트 가능하게 만들기 위한 주입 지점입니다.
/// 기본 구현은 UTC 벽시계입니다.
pub trait Clock: Send + Sync {
    /// 현재 UTC 시각을 반환합니다.
    fn now(&self) -> DateTime<Utc>;
}

/// UTC 벽시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이름
    pub sub: String,
    /// 발급 시점의 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 발급된 토큰.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// 인코딩된 JWT 문자열
    pub access_token: String,
    /// 발급 시각
    pub issued_at: DateTime<Utc>,
    /// 만료 시각 (발급 시각 + TTL)
    pub expires_at: DateTime<Utc>,
}

/// 코덱 구성 에러.
///
/// 요청 단위가 아니라 프로세스 기동 시점의 치명적 에러입니다.
#[derive(Debug, thiserror::Error)]
pub enum CodecConfigError {
    #[error("토큰 서명 비밀 키가 비어 있습니다")]
    EmptySecret,
    #[error("지원하지 않는 서명 알고리즘: {0}")]
    UnsupportedAlgorithm(String),
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// 만료 시각이 지났음 (서명은 유효할 수 있음)
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 서명 불일치
    #[error("토큰 서명이 유효하지 않습니다")]
    BadSignature,
    /// 인코딩 자체를 해석할 수 없음
    #[error("토큰 형식이 잘못되었습니다")]
    Malformed,
    /// 인코딩 실패 (발급 경로)
    #[error("토큰 인코딩 실패")]
    Encoding,
}

/// 서명된 시간 제한 토큰의 인코더/디코더.
///
/// 비밀 키는 초기화 이후 읽기 전용이며 동기화 없이 동시에 읽어도
/// 안전합니다.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// 설정에서 코덱을 생성합니다. 시계는 UTC 벽시계입니다.
    ///
    /// # Errors
    ///
    /// 비밀 키가 비어 있거나 알고리즘이 HMAC 계열이 아니면
    /// [`CodecConfigError`]를 반환합니다.
    pub fn new(config: &AuthConfig) -> Result<Self, CodecConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 주입된 시계로 코덱을 생성합니다 (테스트용).
    pub fn with_clock(
        config: &AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CodecConfigError> {
        let secret = config.secret.expose_secret();
        if secret.is_empty() {
            return Err(CodecConfigError::EmptySecret);
        }

        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| CodecConfigError::UnsupportedAlgorithm(config.algorithm.clone()))?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(CodecConfigError::UnsupportedAlgorithm(
                config.algorithm.clone(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: Duration::minutes(config.token_ttl_minutes),
            clock,
        })
    }

    /// 토큰 수명을 반환합니다.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 주어진 subject에 대한 토큰을 발급합니다.
    ///
    /// `iat = now`, `exp = now + ttl`로 설정됩니다.
    pub fn issue(&self, subject: &str, role: Role) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Encoding)?;

        Ok(IssuedToken {
            access_token,
            issued_at,
            expires_at,
        })
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 서명 검증이 먼저 수행되고, 그 다음 만료가 주입된 시계
    /// 기준으로 검사됩니다 (`now >= exp`이면 만료).
    pub fn parse(&self, raw: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // 만료는 주입된 시계로 직접 검사한다
        validation.validate_exp = false;

        let data = decode::<Claims>(raw, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
