//! 인가 게이트.
//!
//! 해석된 Principal에 대한 순수 정책 함수. 상태도 I/O도 없습니다.

use support_core::{Principal, Role};

use super::service::Rejection;

/// 활성 계정인지 검사합니다.
///
/// 토큰이 유효하더라도 비활성화된 Principal은 절대 통과하지
/// 못합니다.
pub fn require_active(principal: &Principal) -> Result<(), Rejection> {
    if principal.disabled {
        Err(Rejection::Inactive)
    } else {
        Ok(())
    }
}

/// 요구 역할과 정확히 일치하는지 검사합니다.
pub fn require_role(principal: &Principal, role: Role) -> Result<(), Rejection> {
    if principal.role != role {
        Err(Rejection::Forbidden)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, disabled: bool) -> Principal {
        Principal {
            user_name: "leon".to_string(),
            role,
            disabled,
        }
    }

    #[test]
    fn test_require_active() {
        assert!(require_active(&principal(Role::User, false)).is_ok());

        let err = require_active(&principal(Role::User, true)).unwrap_err();
        assert_eq!(err.kind(), "inactive");

        // 관리자라도 비활성이면 통과하지 못한다
        let err = require_active(&principal(Role::Admin, true)).unwrap_err();
        assert_eq!(err.kind(), "inactive");
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&principal(Role::Admin, false), Role::Admin).is_ok());

        let err = require_role(&principal(Role::User, false), Role::Admin).unwrap_err();
        assert_eq!(err.kind(), "forbidden");
    }

    #[test]
    fn test_gates_are_deterministic() {
        let p = principal(Role::User, false);
        for _ in 0..3 {
            assert!(require_active(&p).is_ok());
            assert!(require_role(&p, Role::User).is_ok());
        }
    }
}
