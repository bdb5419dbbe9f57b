//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `paths(...)` 및 `components(schemas(...))`에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use support_core::{Principal, Role};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, CreateUserRequest, HealthResponse, LoginRequest,
    LoginResponse, UpdateUserRequest, UserListResponse,
};

/// Support API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Support App API",
        version = "0.1.0",
        description = r#"
사내 지원(헬프데스크) 백엔드의 인증/사용자 관리 API입니다.

## 인증

`POST /login`에 사용자 이름과 비밀번호를 보내 bearer 토큰을 발급받고,
이후 요청에 `Authorization: Bearer <token>` 헤더를 포함하세요.
토큰은 기본 30분 후 만료됩니다.

자격증명/토큰 실패는 모두 동일한 401 응답을 반환하며,
관리자 전용 라우트는 역할이 부족하면 403을 반환합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::routes::auth::login,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::users::me,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::disable_user,
    ),
    components(schemas(
        ApiErrorResponse,
        ComponentHealth,
        ComponentStatus,
        CreateUserRequest,
        HealthResponse,
        LoginRequest,
        LoginResponse,
        Principal,
        Role,
        UpdateUserRequest,
        UserListResponse,
    )),
    tags(
        (name = "auth", description = "인증 - 로그인 및 토큰 발급"),
        (name = "users", description = "사용자 관리 - 관리자 전용"),
        (name = "health", description = "헬스 체크 - 서버 상태 확인")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_login_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/login"));
        assert!(doc.paths.paths.contains_key("/users/{user_name}"));
    }
}
