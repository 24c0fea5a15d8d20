//! 관심상품 최저가 주기 갱신 태스크.
//!
//! 설정된 주기마다 모든 관심상품을 제목으로 검색하여 첫 결과의 최저가를 반영합니다.
//! CancellationToken으로 graceful shutdown을 지원합니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use selectshop_core::PriceRefreshConfig;
use selectshop_search::ShoppingSearch;

use crate::services::ProductService;

/// 최저가 갱신 태스크.
pub struct PriceRefreshTask {
    products: ProductService,
    search: Arc<dyn ShoppingSearch>,
    interval: Duration,
}

impl PriceRefreshTask {
    pub fn new(
        products: ProductService,
        search: Arc<dyn ShoppingSearch>,
        interval: Duration,
    ) -> Self {
        Self {
            products,
            search,
            interval,
        }
    }

    /// 메인 루프.
    ///
    /// 첫 갱신은 한 주기가 지난 뒤 실행됩니다.
    pub async fn run(self, shutdown: CancellationToken) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.products.refresh_prices(self.search.as_ref()).await {
                        error!(error = %e, "최저가 갱신 실패");
                    }
                }

                _ = shutdown.cancelled() => {
                    info!("PriceRefreshTask 종료");
                    break;
                }
            }
        }
    }
}

/// 설정이 켜져 있으면 갱신 태스크를 띄웁니다.
pub fn start_price_refresh_task(
    config: &PriceRefreshConfig,
    products: ProductService,
    search: Arc<dyn ShoppingSearch>,
    shutdown: CancellationToken,
) -> Option<JoinHandle<()>> {
    if !config.enabled {
        return None;
    }

    let interval = Duration::from_secs(config.interval_secs);
    info!(interval_secs = config.interval_secs, "PriceRefreshTask 시작");

    let task = PriceRefreshTask::new(products, search, interval);
    Some(tokio::spawn(task.run(shutdown)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Principal;
    use crate::repository::MemoryProductStore;
    use async_trait::async_trait;
    use selectshop_core::{NewProduct, UserRole};
    use selectshop_search::{ItemDto, SearchError};

    struct FixedPrice(i32);

    #[async_trait]
    impl ShoppingSearch for FixedPrice {
        async fn search(&self, query: &str) -> Result<Vec<ItemDto>, SearchError> {
            Ok(vec![ItemDto {
                title: query.to_string(),
                link: String::new(),
                image: String::new(),
                lprice: self.0,
            }])
        }
    }

    #[tokio::test]
    async fn test_disabled_task_not_started() {
        let service = ProductService::new(Arc::new(MemoryProductStore::new()));
        let config = PriceRefreshConfig {
            enabled: false,
            interval_secs: 60,
        };

        let handle = start_price_refresh_task(
            &config,
            service,
            Arc::new(FixedPrice(1)),
            CancellationToken::new(),
        );
        assert!(handle.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_on_tick_and_stops_on_cancel() {
        let service = ProductService::new(Arc::new(MemoryProductStore::new()));
        let owner = Principal {
            user_id: 1,
            subject: "kim01".to_string(),
            role: UserRole::User,
        };
        service
            .create(
                &owner,
                NewProduct {
                    title: "맥북".to_string(),
                    image: String::new(),
                    link: String::new(),
                    lprice: 1000,
                },
            )
            .await
            .unwrap();

        let shutdown = CancellationToken::new();
        let task = PriceRefreshTask::new(
            service.clone(),
            Arc::new(FixedPrice(800)),
            Duration::from_secs(60),
        );
        let handle = tokio::spawn(task.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(service.list(&owner).await.unwrap()[0].lprice, 800);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
