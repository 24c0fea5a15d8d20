//! # Selectshop Core
//!
//! 관심상품 서비스의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 사용자/상품 도메인 타입과 사용자 역할
//! - 설정 관리 (파일 + 환경 변수)
//! - 로깅 인프라
//! - 공통 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
