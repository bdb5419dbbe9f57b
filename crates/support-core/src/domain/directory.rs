//! 사용자 디렉터리 collaborator 인터페이스.
//!
//! 인증 서비스는 이 트레이트를 통해서만 자격증명 레코드를 읽습니다.
//! 레코드의 생성/수정/비활성화는 디렉터리 구현체가 소유합니다.
//! 영속성 방식(SQL, 인메모리 등)은 구현체의 관심사입니다.

use async_trait::async_trait;

use crate::error::SupportError;

use super::user::{CredentialRecord, Principal, UserUpdate};

/// 사용자 이름으로 자격증명을 제공하는 디렉터리.
///
/// "없음"은 `Ok(None)`이며 에러가 아닙니다. `Err`는 디렉터리
/// 자체의 장애(연결 실패 등)를 의미하고, 호출자는 이를 자격증명
/// 실패로 번역해서는 안 됩니다.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 사용자 이름으로 레코드를 조회합니다.
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CredentialRecord>, SupportError>;

    /// 전체 사용자를 사용자 이름 순으로 나열합니다.
    async fn list(&self) -> Result<Vec<Principal>, SupportError>;

    /// 새 레코드를 생성합니다.
    ///
    /// 비밀번호는 이미 해시된 형태여야 합니다. 중복 사용자 이름은
    /// `SupportError::InvalidInput`으로 거부됩니다.
    async fn create(&self, record: CredentialRecord) -> Result<Principal, SupportError>;

    /// 레코드를 부분 수정합니다. 없는 사용자면 `Ok(None)`.
    async fn update(
        &self,
        user_name: &str,
        changes: UserUpdate,
    ) -> Result<Option<Principal>, SupportError>;

    /// 레코드를 비활성화합니다 (소프트 삭제). 없는 사용자면 `Ok(None)`.
    async fn disable(&self, user_name: &str) -> Result<Option<Principal>, SupportError>;
}
