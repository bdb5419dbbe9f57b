//! Postgres 사용자 디렉터리.
//!
//! `users` 테이블(user_name PK, id_employee, disabled, password,
//! role)을 감쌉니다. 모든 조회는 요청마다 새로 수행됩니다.
//! 스키마 마이그레이션은 이 크레이트의 범위 밖입니다.

use async_trait::async_trait;
use sqlx::PgPool;

use support_core::{CredentialRecord, Principal, SupportError, UserDirectory, UserUpdate};

/// `users` 테이블을 감싸는 디렉터리.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// 새 디렉터리를 생성합니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// sqlx 에러를 디렉터리 에러로 매핑합니다.
///
/// 유니크 제약 위반만 입력 에러로 구분하고 나머지는 디렉터리
/// 사용 불가 상태로 취급합니다.
fn map_db_error(err: sqlx::Error) -> SupportError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            SupportError::InvalidInput("이미 존재하는 사용자 이름입니다".to_string())
        }
        _ => SupportError::Database(err.to_string()),
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CredentialRecord>, SupportError> {
        sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT user_name, id_employee AS employee_id, disabled,
                   password AS hashed_password, role
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list(&self) -> Result<Vec<Principal>, SupportError> {
        let records = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT user_name, id_employee AS employee_id, disabled,
                   password AS hashed_password, role
            FROM users
            ORDER BY user_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(records.iter().map(Principal::from).collect())
    }

    async fn create(&self, record: CredentialRecord) -> Result<Principal, SupportError> {
        let created = sqlx::query_as::<_, CredentialRecord>(
            r#"
            INSERT INTO users (user_name, id_employee, disabled, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_name, id_employee AS employee_id, disabled,
                      password AS hashed_password, role
            "#,
        )
        .bind(&record.user_name)
        .bind(record.employee_id)
        .bind(record.disabled)
        .bind(&record.hashed_password)
        .bind(record.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Principal::from(&created))
    }

    async fn update(
        &self,
        user_name: &str,
        changes: UserUpdate,
    ) -> Result<Option<Principal>, SupportError> {
        let updated = sqlx::query_as::<_, CredentialRecord>(
            r#"
            UPDATE users
            SET id_employee = COALESCE($2, id_employee),
                disabled    = COALESCE($3, disabled),
                role        = COALESCE($4, role),
                password    = COALESCE($5, password)
            WHERE user_name = $1
            RETURNING user_name, id_employee AS employee_id, disabled,
                      password AS hashed_password, role
            "#,
        )
        .bind(user_name)
        .bind(changes.employee_id)
        .bind(changes.disabled)
        .bind(changes.role)
        .bind(changes.hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(updated.as_ref().map(Principal::from))
    }

    async fn disable(&self, user_name: &str) -> Result<Option<Principal>, SupportError> {
        let disabled = sqlx::query_as::<_, CredentialRecord>(
            r#"
            UPDATE users
            SET disabled = TRUE
            WHERE user_name = $1
            RETURNING user_name, id_employee AS employee_id, disabled,
                      password AS hashed_password, role
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(disabled.as_ref().map(Principal::from))
    }
}
