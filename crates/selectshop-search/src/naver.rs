//! 네이버 쇼핑 검색 API 클라이언트.
//!
//! `GET {base_url}/v1/search/shop.json?display={n}&query={q}` 를 호출하고
//! 응답의 `items[]` 를 [`ItemDto`] 목록으로 변환합니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = NaverShoppingClient::from_config(&config.naver)?;
//! let items = client.search("맥북").await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use selectshop_core::NaverConfig;

use crate::error::SearchError;

const SEARCH_PATH: &str = "/v1/search/shop.json";

/// 검색 결과 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemDto {
    /// 상품명 (강조 태그 제거됨)
    #[serde(deserialize_with = "deserialize_title")]
    pub title: String,
    pub link: String,
    pub image: String,
    /// 최저가
    #[serde(deserialize_with = "deserialize_price")]
    pub lprice: i32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<ItemDto>,
}

fn deserialize_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(strip_highlight(&raw))
}

/// 가격은 API에서 문자열(`"12000"`)로 내려오지만 숫자도 허용합니다.
fn deserialize_price<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(i64),
        Text(String),
    }

    let value = match Price::deserialize(deserializer)? {
        Price::Number(n) => n,
        Price::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0
            } else {
                trimmed.parse::<i64>().map_err(serde::de::Error::custom)?
            }
        }
    };

    i32::try_from(value).map_err(serde::de::Error::custom)
}

/// 검색어 강조 태그(`<b>`, `</b>`) 제거.
pub fn strip_highlight(title: &str) -> String {
    title.replace("<b>", "").replace("</b>", "")
}

/// 쇼핑 검색 추상화.
///
/// 테스트에서 외부 호출 없이 대체할 수 있도록 트레이트로 분리합니다.
#[async_trait]
pub trait ShoppingSearch: Send + Sync {
    /// 검색어로 상품 목록 조회.
    async fn search(&self, query: &str) -> Result<Vec<ItemDto>, SearchError>;

    /// 호출에 필요한 자격 증명이 갖춰졌는지 여부.
    fn is_configured(&self) -> bool {
        true
    }
}

/// 네이버 쇼핑 검색 클라이언트.
pub struct NaverShoppingClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: SecretString,
    display: u32,
}

impl NaverShoppingClient {
    /// 설정에서 클라이언트 생성.
    pub fn from_config(config: &NaverConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("selectshop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: SecretString::new(config.client_secret.expose_secret().into()),
            display: config.display,
        })
    }

    /// 응답 본문을 항목 목록으로 변환.
    pub fn parse_items(body: &str) -> Result<Vec<ItemDto>, SearchError> {
        let response: SearchResponse =
            serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(response.items)
    }
}

#[async_trait]
impl ShoppingSearch for NaverShoppingClient {
    async fn search(&self, query: &str) -> Result<Vec<ItemDto>, SearchError> {
        if !self.is_configured() {
            warn!("Shopping search credentials are not configured");
        }

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let display = self.display.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("display", display.as_str()), ("query", query)])
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", self.client_secret.expose_secret())
            .send()
            .await?;

        let status = response.status();
        info!(status = status.as_u16(), query, "Shopping search API responded");

        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let items = Self::parse_items(&body)?;
        debug!(count = items.len(), "Parsed search items");
        Ok(items)
    }

    fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.expose_secret().is_empty()
    }
}
