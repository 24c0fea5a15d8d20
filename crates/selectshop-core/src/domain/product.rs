//! 관심상품 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 저장된 관심상품.
///
/// 정확히 한 명의 사용자(`user_id`)가 소유합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub link: String,
    /// 검색 API 기준 최저가
    pub lprice: i32,
    /// 사용자가 설정한 희망가 (생성 시 0)
    pub myprice: i32,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// 신규 상품 입력.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewProduct {
    pub title: String,
    pub image: String,
    pub link: String,
    pub lprice: i32,
}
