//! 인메모리 사용자 디렉터리.
//!
//! `DATABASE_URL` 없이 기동하는 개발 모드와 테스트에서 사용합니다.
//! SQL 디렉터리 위의 캐시가 아니라 독립적인 디렉터리 구현이며,
//! 프로세스가 내려가면 내용도 사라집니다.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use support_core::{CredentialRecord, Principal, SupportError, UserDirectory, UserUpdate};

/// RwLock으로 보호되는 인메모리 디렉터리.
#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryDirectory {
    /// 빈 디렉터리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 직접 삽입합니다 (시드/테스트용).
    ///
    /// 같은 사용자 이름이 있으면 덮어씁니다.
    pub async fn insert(&self, record: CredentialRecord) {
        self.users
            .write()
            .await
            .insert(record.user_name.clone(), record);
    }

    /// 레코드를 완전히 제거합니다 (테스트용 - 발급 후 삭제 시나리오).
    pub async fn remove(&self, user_name: &str) {
        self.users.write().await.remove(user_name);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CredentialRecord>, SupportError> {
        Ok(self.users.read().await.get(user_name).cloned())
    }

    async fn list(&self) -> Result<Vec<Principal>, SupportError> {
        let users = self.users.read().await;
        let mut principals: Vec<Principal> = users.values().map(Principal::from).collect();
        principals.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        Ok(principals)
    }

    async fn create(&self, record: CredentialRecord) -> Result<Principal, SupportError> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.user_name) {
            return Err(SupportError::InvalidInput(
                "이미 존재하는 사용자 이름입니다".to_string(),
            ));
        }

        let principal = Principal::from(&record);
        users.insert(record.user_name.clone(), record);
        Ok(principal)
    }

    async fn update(
        &self,
        user_name: &str,
        changes: UserUpdate,
    ) -> Result<Option<Principal>, SupportError> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(user_name) else {
            return Ok(None);
        };

        if let Some(employee_id) = changes.employee_id {
            record.employee_id = employee_id;
        }
        if let Some(disabled) = changes.disabled {
            record.disabled = disabled;
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        if let Some(hashed_password) = changes.hashed_password {
            record.hashed_password = hashed_password;
        }

        Ok(Some(Principal::from(&*record)))
    }

    async fn disable(&self, user_name: &str) -> Result<Option<Principal>, SupportError> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(user_name) else {
            return Ok(None);
        };

        record.disabled = true;
        Ok(Some(Principal::from(&*record)))
    }
}
