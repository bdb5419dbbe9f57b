//! 사용자 도메인 모델.
//!
//! 디렉터리에 저장되는 자격증명 레코드와, 인증을 통과한 요청에
//! 부여되는 Principal을 정의합니다. 해시된 비밀번호는
//! [`CredentialRecord`] 바깥으로 직렬화되지 않습니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 사용자 이름 최대 길이 (`users.user_name` 컬럼 제약).
pub const MAX_USER_NAME_LEN: usize = 15;

/// 사용자 역할.
///
/// 닫힌 열거형으로, 디렉터리 경계에서 검증됩니다. 자유 문자열
/// 비교는 허용되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "role", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 일반 사용자 - 자신의 정보 조회만 가능
    User,
    /// 관리자 - 사용자 관리 라우트 접근 가능
    Admin,
}

/// 역할 문자열 파싱 에러.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("알 수 없는 역할: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// 문자열에서 역할을 파싱합니다.
    pub fn parse(s: &str) -> Result<Self, RoleParseError> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }

    /// 역할의 소문자 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

/// 디렉터리에 저장된 자격증명 레코드.
///
/// 디렉터리만 이 레코드를 생성/수정하며, 인증 서비스는 읽기만
/// 합니다. `hashed_password`는 PHC 형식의 불투명 문자열로,
/// 해셔 경계 밖에서는 내용을 해석하지 않습니다.
#[derive(Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct CredentialRecord {
    /// 사용자 이름 (기본 키, 불변)
    pub user_name: String,
    /// 연결된 직원 ID
    pub employee_id: i32,
    /// 비활성 플래그 - true면 인가 게이트를 통과할 수 없음
    pub disabled: bool,
    /// PHC 형식 비밀번호 해시
    pub hashed_password: String,
    /// 사용자 역할
    pub role: Role,
}

// 해시가 로그에 노출되지 않도록 Debug를 직접 구현한다.
impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_name", &self.user_name)
            .field("employee_id", &self.employee_id)
            .field("disabled", &self.disabled)
            .field("hashed_password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// 인증된 신원.
///
/// 자격증명 레코드에서 파생되며 해시를 포함하지 않습니다.
/// 요청마다 디렉터리 조회로 새로 만들어집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Principal {
    /// 사용자 이름
    pub user_name: String,
    /// 사용자 역할
    pub role: Role,
    /// 비활성 여부
    pub disabled: bool,
}

impl From<&CredentialRecord> for Principal {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            user_name: record.user_name.clone(),
            role: record.role,
            disabled: record.disabled,
        }
    }
}

/// 디렉터리 수정 서피스에서 사용하는 부분 업데이트.
///
/// `None` 필드는 기존 값을 유지합니다. 비밀번호는 해셔를 거친
/// 해시 형태로만 전달됩니다.
#[derive(Clone, Default)]
pub struct UserUpdate {
    /// 직원 ID 변경
    pub employee_id: Option<i32>,
    /// 비활성 플래그 변경
    pub disabled: Option<bool>,
    /// 역할 변경
    pub role: Option<Role>,
    /// 새 비밀번호 해시
    pub hashed_password: Option<String>,
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("employee_id", &self.employee_id)
            .field("disabled", &self.disabled)
            .field("role", &self.role)
            .field(
                "hashed_password",
                &self.hashed_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// 사용자 이름 구문 검사.
///
/// 문자(라틴/키릴 포함)와 하이픈만 허용하며, `users.user_name`
/// 컬럼 제약에 맞춰 길이를 제한합니다.
pub fn is_valid_user_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_USER_NAME_LEN
        && name.chars().all(|c| c.is_alphabetic() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Ok(Role::Admin));
        assert_eq!(Role::parse("USER"), Ok(Role::User));
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_principal_from_record() {
        let record = CredentialRecord {
            user_name: "leon".to_string(),
            employee_id: 7,
            disabled: false,
            hashed_password: "$argon2id$...".to_string(),
            role: Role::User,
        };

        let principal = Principal::from(&record);
        assert_eq!(principal.user_name, "leon");
        assert_eq!(principal.role, Role::User);
        assert!(!principal.disabled);
    }

    #[test]
    fn test_debug_redacts_hash() {
        let record = CredentialRecord {
            user_name: "leon".to_string(),
            employee_id: 7,
            disabled: false,
            hashed_password: "$argon2id$secret".to_string(),
            role: Role::User,
        };

        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_user_name_syntax() {
        assert!(is_valid_user_name("leon"));
        assert!(is_valid_user_name("anna-maria"));
        assert!(is_valid_user_name("Пётр"));

        assert!(!is_valid_user_name(""));
        assert!(!is_valid_user_name("leon42"));
        assert!(!is_valid_user_name("leon smith"));
        assert!(!is_valid_user_name("a-very-long-user-name"));
    }
}
