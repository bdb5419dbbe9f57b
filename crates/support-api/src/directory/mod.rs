//! 사용자 디렉터리 구현체.
//!
//! [`support_core::UserDirectory`] 트레이트의 두 구현을 제공합니다:
//!
//! - [`PgUserDirectory`]: 운영용 Postgres 구현. 요청마다 새로
//!   조회하며 프로세스 전역 캐시를 두지 않습니다.
//! - [`MemoryDirectory`]: 데이터베이스 없는 개발 모드와 테스트용
//!   인메모리 구현.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDirectory;
pub use postgres::PgUserDirectory;
