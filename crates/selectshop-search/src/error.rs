//! 검색 클라이언트 에러.

use thiserror::Error;

/// 쇼핑 검색 에러.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx 이외의 응답
    #[error("검색 API 응답 에러 (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("응답 파싱 실패: {0}")]
    Parse(String),
}

impl From<SearchError> for selectshop_core::ShopError {
    fn from(err: SearchError) -> Self {
        selectshop_core::ShopError::Search(err.to_string())
    }
}
