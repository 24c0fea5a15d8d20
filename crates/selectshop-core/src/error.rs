//! 서비스 공통 에러 타입.
//!
//! 인증 계층 바깥(회원가입, 상품, 저장소, 외부 검색)에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum ShopError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 중복된 사용자 이름
    #[error("중복된 사용자가 존재합니다: {0}")]
    DuplicateUsername(String),

    /// 중복된 이메일
    #[error("이미 사용 중인 이메일입니다: {0}")]
    DuplicateEmail(String),

    /// 관리자 암호 불일치
    #[error("관리자 암호가 틀려 등록이 불가능합니다")]
    AdminTokenMismatch,

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음 (소유하지 않은 레코드 포함)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 외부 검색 API 에러
    #[error("검색 에러: {0}")]
    Search(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 서비스 작업을 위한 Result 타입.
pub type ShopResult<T> = Result<T, ShopError>;

impl ShopError {
    /// 호출자 입력으로 인한 에러인지 확인합니다 (시스템 장애가 아님).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShopError::DuplicateUsername(_)
                | ShopError::DuplicateEmail(_)
                | ShopError::AdminTokenMismatch
                | ShopError::InvalidInput(_)
                | ShopError::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::InvalidInput(err.to_string())
    }
}

impl From<config::ConfigError> for ShopError {
    fn from(err: config::ConfigError) -> Self {
        ShopError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(ShopError::DuplicateUsername("kim".into()).is_client_error());
        assert!(ShopError::NotFound("product 1".into()).is_client_error());
        assert!(ShopError::AdminTokenMismatch.is_client_error());
        assert!(!ShopError::Database("connection reset".into()).is_client_error());
        assert!(!ShopError::Internal("oops".into()).is_client_error());
    }

    #[test]
    fn test_error_messages() {
        let err = ShopError::DuplicateUsername("kim".into());
        assert_eq!(err.to_string(), "중복된 사용자가 존재합니다: kim");
    }
}
