//! 인증 및 권한 부여.
//!
//! 토큰 기반 인증과 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`password`]: Argon2 자격증명 해셔
//! - [`jwt`]: 서명된 시간 제한 토큰 코덱
//! - [`service`]: 디렉터리/해셔/코덱을 조합한 인증 서비스
//! - [`gate`]: 순수 인가 게이트 (활성/역할 검사)
//! - [`middleware`]: Axum 추출기 및 상태 코드 매핑
//!
//! # 제어 흐름
//!
//! 로그인: `authenticate` → `issue_for` → 클라이언트가 토큰 보관.
//! 이후 요청: `Authorization: Bearer` → `resolve` →
//! `require_active` → (관리자 라우트) `require_role`.

pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use gate::{require_active, require_role};
pub use jwt::{Claims, Clock, CodecConfigError, IssuedToken, SystemClock, TokenCodec, TokenError};
pub use middleware::{AdminUser, AuthError, CurrentUser};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use service::{AuthService, Rejection};
