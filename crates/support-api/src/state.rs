//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `Arc<AppState>`로 래핑되어 Axum의 State extractor를 통해
//! 핸들러에 주입됩니다. 초기화 이후 가변 상태가 없으므로 동시
//! 요청 간 동기화가 필요하지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use support_core::UserDirectory;

use crate::auth::AuthService;

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 사용자 디렉터리 (Postgres 또는 인메모리)
    pub directory: Arc<dyn UserDirectory>,

    /// 인증 서비스
    pub auth: Arc<AuthService>,

    /// 데이터베이스 연결 풀 (인메모리 모드에서는 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState를 생성합니다.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        auth: Arc<AuthService>,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            directory,
            auth,
            db_pool,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => false,
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> Arc<AppState> {
    use secrecy::SecretString;
    use support_core::AuthConfig;

    use crate::auth::TokenCodec;
    use crate::directory::MemoryDirectory;

    let directory: Arc<MemoryDirectory> = Arc::new(MemoryDirectory::new());
    let config = AuthConfig {
        secret: SecretString::from("test-secret-key-for-state-32-chars!!".to_string()),
        algorithm: "HS256".to_string(),
        token_ttl_minutes: 30,
    };
    let codec = TokenCodec::new(&config).expect("test codec config is valid");
    let auth = Arc::new(AuthService::new(directory.clone(), codec));

    Arc::new(AppState::new(directory, auth, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_without_pool_reports_unhealthy_db() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(!state.is_db_healthy().await);
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }
}
