//! Support API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. 로그인, 사용자 관리,
//! 헬스 체크 엔드포인트를 제공합니다.
//!
//! # 환경 변수
//!
//! - `CONFIG_PATH`: 설정 파일 경로 (기본값: `config/default.toml`)
//! - `DATABASE_URL`: Postgres 연결 문자열. 없으면 인메모리
//!   디렉터리로 기동합니다 (개발 전용).
//! - `SUPPORT__AUTH__SECRET` 등: `SUPPORT__` 접두사로 설정
//!   오버라이드
//! - `SUPPORT_ADMIN_PASSWORD`: 인메모리 모드에서 시드되는 admin
//!   계정의 비밀번호

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use support_api::auth::{hash_password, AuthService, TokenCodec};
use support_api::directory::{MemoryDirectory, PgUserDirectory};
use support_api::openapi::swagger_ui_router;
use support_api::routes::create_api_router;
use support_api::state::AppState;
use support_core::{init_logging, AppConfig, CredentialRecord, Role, UserDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());
    let config =
        AppConfig::load(&config_path).with_context(|| format!("설정 로드 실패: {config_path}"))?;

    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    // 빈 서명 비밀 키는 요청 단위 에러가 아니라 기동 실패다
    let codec = TokenCodec::new(&config.auth).context("인증 설정이 유효하지 않습니다")?;

    let (directory, db_pool) = create_directory(&config).await?;
    let auth = Arc::new(AuthService::new(directory.clone(), codec));
    let state = Arc::new(AppState::new(directory, auth, db_pool));

    let app = create_api_router()
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("서버 주소가 유효하지 않습니다")?;

    info!(%addr, "Support API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// 사용자 디렉터리 선택.
///
/// `DATABASE_URL`이 설정되어 있으면 Postgres 디렉터리를 사용하고
/// 연결 실패 시 기동을 중단합니다 (fail fast). 설정되어 있지
/// 않으면 개발용 인메모리 디렉터리로 내려갑니다.
async fn create_directory(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn UserDirectory>, Option<sqlx::PgPool>)> {
    match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
                .connect(&database_url)
                .await
                .context("데이터베이스 연결 실패")?;

            // 연결 확인
            sqlx::query("SELECT 1")
                .fetch_one(&pool)
                .await
                .context("데이터베이스 연결 확인 실패")?;
            info!("Connected to Postgres user directory");

            Ok((Arc::new(PgUserDirectory::new(pool.clone())), Some(pool)))
        }
        Err(_) => {
            warn!(
                "DATABASE_URL not set, falling back to in-memory user directory (development only)"
            );
            let directory = MemoryDirectory::new();
            seed_admin(&directory).await?;
            Ok((Arc::new(directory), None))
        }
    }
}

/// 인메모리 모드에서 기본 admin 계정을 시드합니다.
async fn seed_admin(directory: &MemoryDirectory) -> anyhow::Result<()> {
    let password =
        std::env::var("SUPPORT_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    warn!("Seeding in-memory directory with default 'admin' user");

    let hashed_password =
        hash_password(&password).map_err(|e| anyhow::anyhow!("admin 시드 해싱 실패: {e}"))?;

    directory
        .insert(CredentialRecord {
            user_name: "admin".to_string(),
            employee_id: 0,
            disabled: false,
            hashed_password,
            role: Role::Admin,
        })
        .await;

    Ok(())
}

/// ctrl-c 시그널을 기다립니다.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install ctrl-c handler");
        return;
    }
    info!("Shutdown signal received");
}
