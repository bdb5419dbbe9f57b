//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 해싱 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘으로 해싱하며 솔트는 호출마다 새로 생성됩니다.
/// 같은 입력이라도 출력은 매번 다르지만 검증은 결정적입니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함),
/// 예: `"$argon2id$v=19$m=19456,t=2,p=1$..."`
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 PHC 해시와 평문 후보를 비교합니다. 해시 형식이 잘못된
/// 경우에도 에러를 내지 않고 `false`를 반환합니다 (fail closed).
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 비밀번호 강도 검증.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("비밀번호는 최소 8자 이상이어야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("비밀번호에 최소 1개의 숫자가 포함되어야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("비밀번호에 최소 1개의 영문자가 포함되어야 합니다");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "TestPassword123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash));
        assert!(!verify_password("WrongPassword123!", &hash));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        // 솔트가 다르므로 해시도 다르지만 둘 다 검증 가능
        assert_ne!(hash1, hash2);
        assert!(verify_password("Password1", &hash1));
        assert!(verify_password("Password1", &hash2));
    }

    #[test]
    fn test_malformed_hash_is_false_not_error() {
        assert!(!verify_password("password", "not-a-valid-hash"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_password_strength_validation() {
        assert!(validate_password_strength("Password1").is_ok());
        assert!(validate_password_strength("abcd1234").is_ok());

        // 너무 짧음
        assert!(validate_password_strength("Pass1").is_err());
        // 숫자 없음
        assert!(validate_password_strength("Password").is_err());
        // 영문자 없음
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("").is_err());
    }

    proptest! {
        // Argon2는 의도적으로 느리므로 케이스 수를 제한한다.
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn prop_hash_verify_roundtrip(password in "[a-zA-Z0-9가-힣]{1,16}") {
            let hash = hash_password(&password).unwrap();
            let wrong_password = format!("{}x", password);
            prop_assert!(verify_password(&password, &hash));
            prop_assert!(!verify_password(&wrong_password, &hash));
        }
    }
}
