//! # Selectshop Search
//!
//! 외부 쇼핑 검색 API 클라이언트.
//!
//! 검색어로 상품 목록(제목, 링크, 이미지, 최저가)을 조회하며,
//! 관심상품 등록과 최저가 갱신 작업에서 사용됩니다.

pub mod error;
pub mod naver;

pub use error::SearchError;
pub use naver::{ItemDto, NaverShoppingClient, ShoppingSearch};
