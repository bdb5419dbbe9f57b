//! 인증 플로우 통합 테스트.
//!
//! 인메모리 디렉터리와 고정 시계로 로그인 → 토큰 발급 → 해석 →
//! 인가 게이트의 전체 흐름을 검증한다.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

use support_api::auth::{
    hash_password, require_active, require_role, AuthError, AuthService, Clock, Rejection,
    TokenCodec,
};
use support_api::directory::MemoryDirectory;
use support_core::{AuthConfig, CredentialRecord, Role, UserDirectory};

const SECRET: &str = "integration-test-secret-key-32-chars!";

/// 테스트용 고정 시계.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        secret: SecretString::from(SECRET.to_string()),
        algorithm: "HS256".to_string(),
        token_ttl_minutes: 30,
    }
}

fn record(user_name: &str, password: &str, role: Role) -> CredentialRecord {
    CredentialRecord {
        user_name: user_name.to_string(),
        employee_id: 0,
        disabled: false,
        hashed_password: hash_password(password).unwrap(),
        role,
    }
}

async fn seeded_directory() -> Arc<MemoryDirectory> {
    let directory = MemoryDirectory::new();
    directory
        .insert(record("leon", "correct-password-1", Role::User))
        .await;
    directory
        .insert(record("boss", "correct-password-1", Role::Admin))
        .await;
    Arc::new(directory)
}

fn service(directory: Arc<MemoryDirectory>) -> AuthService {
    AuthService::new(directory, TokenCodec::new(&auth_config()).unwrap())
}

async fn response_bytes(error: AuthError) -> (StatusCode, axum::body::Bytes) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes)
}

#[tokio::test]
async fn login_then_resolve_preserves_username() {
    let service = service(seeded_directory().await);

    let principal = service
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap();

    let resolved = service.resolve(&token.access_token).await.unwrap();
    assert_eq!(resolved.user_name, "leon");
    assert_eq!(resolved.role, Role::User);
    assert!(require_active(&resolved).is_ok());
}

#[tokio::test]
async fn resolve_is_idempotent() {
    let service = service(seeded_directory().await);

    let principal = service
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap();

    let first = service.resolve(&token.access_token).await.unwrap();
    let second = service.resolve(&token.access_token).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn wrong_password_is_indistinguishable_from_unknown_user() {
    let service = service(seeded_directory().await);

    let wrong_password = service.authenticate("leon", "wrong").await.unwrap_err();
    let unknown_user = service
        .authenticate("no-such-user", "wrong")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind(), "invalid_credentials");
    assert_eq!(unknown_user.kind(), "invalid_credentials");

    // 외부 응답은 바이트 단위로 동일하다
    let (status_a, body_a) = response_bytes(AuthError::from(wrong_password)).await;
    let (status_b, body_b) = response_bytes(AuthError::from(unknown_user)).await;
    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn expired_and_tampered_tokens_share_the_external_response() {
    // 내부 종류는 다르지만 외부 401 본문은 동일하다
    let (_, expired_body) = response_bytes(AuthError::from(Rejection::Expired)).await;
    let (_, bad_sig_body) = response_bytes(AuthError::from(Rejection::BadSignature)).await;
    let (_, malformed_body) = response_bytes(AuthError::from(Rejection::Malformed)).await;

    assert_eq!(expired_body, bad_sig_body);
    assert_eq!(expired_body, malformed_body);
}

#[tokio::test]
async fn admin_route_with_user_role_is_forbidden() {
    let service = service(seeded_directory().await);

    let principal = service
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap();
    let resolved = service.resolve(&token.access_token).await.unwrap();

    let rejection = require_role(&resolved, Role::Admin).unwrap_err();
    assert_eq!(rejection.kind(), "forbidden");

    let (status, _) = response_bytes(AuthError::from(rejection)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 관리자는 통과한다
    let admin = service
        .authenticate("boss", "correct-password-1")
        .await
        .unwrap();
    assert!(require_role(&admin, Role::Admin).is_ok());
}

#[tokio::test]
async fn token_survives_but_disabled_user_is_inactive() {
    let directory = seeded_directory().await;
    let service = service(directory.clone());

    let principal = service
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap();

    // 토큰 발급 이후 비활성화
    directory.disable("leon").await.unwrap().unwrap();

    // 토큰 자체는 유효하게 해석되지만 활성 게이트에서 거부된다
    let resolved = service.resolve(&token.access_token).await.unwrap();
    assert!(resolved.disabled);

    let rejection = require_active(&resolved).unwrap_err();
    assert_eq!(rejection.kind(), "inactive");

    let (status, _) = response_bytes(AuthError::from(rejection)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_deleted_user_is_rejected() {
    let directory = seeded_directory().await;
    let service = service(directory.clone());

    let principal = service
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap();

    directory.remove("leon").await;

    let rejection = service.resolve(&token.access_token).await.unwrap_err();
    assert_eq!(rejection.kind(), "invalid_credentials");
}

#[tokio::test]
async fn expired_token_is_rejected_even_with_valid_signature() {
    let directory = seeded_directory().await;
    let issued_at = Utc::now();

    // 발급 시계와 검증 시계를 분리한다
    let issuer = AuthService::new(
        directory.clone(),
        TokenCodec::with_clock(&auth_config(), Arc::new(FixedClock(issued_at))).unwrap(),
    );
    let principal = issuer
        .authenticate("leon", "correct-password-1")
        .await
        .unwrap();
    let token = issuer.issue_for(&principal).unwrap();

    // 만료 1초 후의 시계로 해석하면 거부된다
    let later = issued_at + Duration::minutes(30) + Duration::seconds(1);
    let resolver = AuthService::new(
        directory,
        TokenCodec::with_clock(&auth_config(), Arc::new(FixedClock(later))).unwrap(),
    );

    let rejection = resolver.resolve(&token.access_token).await.unwrap_err();
    assert_eq!(rejection.kind(), "expired");
}

#[tokio::test]
async fn tampered_signature_is_rejected_before_expiry_check() {
    let service = service(seeded_directory().await);

    let principal = service
        .authenticate("boss", "correct-password-1")
        .await
        .unwrap();
    let token = service.issue_for(&principal).unwrap().access_token;

    // 서명 세그먼트 한 바이트 변조
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut sig_bytes = signature.as_bytes().to_vec();
    sig_bytes[0] = if sig_bytes[0] == b'A' { b'B' } else { b'A' };
    let tampered = format!("{}.{}", head, String::from_utf8(sig_bytes).unwrap());

    let rejection = service.resolve(&tampered).await.unwrap_err();
    assert_eq!(rejection.kind(), "bad_signature");
}
