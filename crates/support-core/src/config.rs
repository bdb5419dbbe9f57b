//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! TOML 파일에서 로드한 뒤 `SUPPORT__` 접두사 환경 변수로
//! 오버라이드합니다.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// 기본 토큰 수명 (분).
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// 데이터베이스 설정.
///
/// 연결 문자열 자체는 `DATABASE_URL` 환경 변수로 전달됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 토큰 서명 비밀 키. 비어 있으면 기동이 실패합니다.
    #[serde(default = "default_secret")]
    pub secret: SecretString,
    /// 서명 알고리즘 식별자 (HMAC 계열만 허용)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// 토큰 수명 (분)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_ttl() -> i64 {
    DEFAULT_TOKEN_TTL_MINUTES
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            algorithm: default_algorithm(),
            token_ttl_minutes: default_token_ttl(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 기본값과 환경 변수만으로 동작합니다.
    /// 환경 변수는 `SUPPORT__` 접두사와 `__` 구분자를 사용합니다
    /// (예: `SUPPORT__AUTH__SECRET`, `SUPPORT__SERVER__PORT`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("SUPPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 기본 경로(`config/default.toml`)에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
