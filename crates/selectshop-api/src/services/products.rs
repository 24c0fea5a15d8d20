//! 관심상품 서비스.
//!
//! 명령적 접근 제어가 여기서 이루어집니다.
//! - 목록: ADMIN은 전체, USER는 본인 소유만 ([`ProductScope`])
//! - 희망가 수정: ID와 소유자를 한 조건으로 조회하여 "남의 상품"과 "없는 상품"을 모두 404로 처리

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use selectshop_core::{NewProduct, Product, ShopError, ShopResult};
use selectshop_search::{ItemDto, ShoppingSearch};

use crate::auth::{Principal, ProductScope};
use crate::metrics::record_price_refresh;
use crate::repository::ProductStore;

/// 희망가 수정 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMyPriceRequest {
    pub myprice: i32,
}

/// 최저가 갱신 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 관심상품 서비스.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// 호출자 소유의 관심상품 등록.
    pub async fn create(&self, principal: &Principal, product: NewProduct) -> ShopResult<Product> {
        let created = self.products.insert(principal.user_id, product).await?;
        info!(product_id = created.id, user_id = principal.user_id, "Product registered");
        Ok(created)
    }

    /// 역할에 따른 범위로 목록 조회.
    pub async fn list(&self, principal: &Principal) -> ShopResult<Vec<Product>> {
        match ProductScope::for_principal(principal) {
            ProductScope::All => self.products.find_all().await,
            ProductScope::OwnedBy(user_id) => self.products.find_all_by_user_id(user_id).await,
        }
    }

    /// 본인 소유 상품의 희망가 수정 후 상품 ID 반환.
    pub async fn update_myprice(
        &self,
        principal: &Principal,
        id: i64,
        myprice: i32,
    ) -> ShopResult<i64> {
        if myprice < 0 {
            return Err(ShopError::InvalidInput(format!("myprice must be >= 0: {myprice}")));
        }

        let product = self
            .products
            .find_by_id_and_user_id(id, principal.user_id)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("product {id}")))?;

        let updated = self.products.update_myprice(product.id, myprice).await?;
        debug!(product_id = updated.id, myprice, "My price updated");
        Ok(updated.id)
    }

    /// 검색 결과로 최저가 갱신 (소유자 무관, ID로만 조회).
    pub async fn update_by_search(&self, id: i64, item: &ItemDto) -> ShopResult<Product> {
        if self.products.find_by_id(id).await?.is_none() {
            return Err(ShopError::NotFound(format!("product {id}")));
        }
        self.products.update_lprice(id, item.lprice).await
    }

    /// 모든 상품의 최저가를 검색 결과 첫 항목으로 갱신.
    ///
    /// 개별 상품 실패는 기록만 하고 다음 상품으로 진행합니다.
    pub async fn refresh_prices(&self, search: &dyn ShoppingSearch) -> ShopResult<RefreshReport> {
        let mut report = RefreshReport::default();

        for product in self.products.find_all().await? {
            let item = match search.search(&product.title).await {
                Ok(items) => items.into_iter().next(),
                Err(e) => {
                    warn!(product_id = product.id, error = %e, "Price search failed");
                    report.failed += 1;
                    continue;
                }
            };

            let Some(item) = item else {
                report.skipped += 1;
                continue;
            };

            match self.update_by_search(product.id, &item).await {
                Ok(_) => report.updated += 1,
                Err(e) => {
                    warn!(product_id = product.id, error = %e, "Price update failed");
                    report.failed += 1;
                }
            }
        }

        record_price_refresh(report.updated, report.failed);
        info!(
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "Price refresh completed"
        );
        Ok(report)
    }
}
