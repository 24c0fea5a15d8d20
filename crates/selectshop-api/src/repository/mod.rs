//! 저장소 계층.
//!
//! - [`UserStore`]: 자격증명 저장소 (사용자 이름/이메일 유일성은 저장소가 보장)
//! - [`ProductStore`]: 관심상품 저장소
//!
//! PostgreSQL 구현(`Pg*`)과 인메모리 구현(`Memory*`)을 제공합니다.
//! DB URL이 설정되지 않으면 서버는 인메모리 구현으로 동작합니다.

mod memory;
mod products;
mod users;

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use products::PgProductStore;
pub use users::PgUserStore;

use async_trait::async_trait;
use selectshop_core::{NewProduct, NewUser, Product, ShopError, ShopResult, User};

/// 자격증명 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> ShopResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> ShopResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> ShopResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// 사용자 삽입.
    ///
    /// 사용자 이름/이메일 중복은 `DuplicateUsername` / `DuplicateEmail`로 실패합니다.
    async fn insert(&self, user: NewUser) -> ShopResult<User>;
}

/// 관심상품 저장소.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 상품 저장 (`myprice`는 0으로 시작).
    async fn insert(&self, user_id: i64, product: NewProduct) -> ShopResult<Product>;

    async fn find_all(&self) -> ShopResult<Vec<Product>>;

    async fn find_all_by_user_id(&self, user_id: i64) -> ShopResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> ShopResult<Option<Product>>;

    /// ID와 소유자를 한 조건으로 조회.
    ///
    /// 남의 상품과 없는 상품을 구분하지 않습니다.
    async fn find_by_id_and_user_id(&self, id: i64, user_id: i64) -> ShopResult<Option<Product>>;

    async fn update_myprice(&self, id: i64, myprice: i32) -> ShopResult<Product>;

    async fn update_lprice(&self, id: i64, lprice: i32) -> ShopResult<Product>;
}

/// sqlx 에러를 서비스 에러로 변환.
pub(crate) fn db_error(err: sqlx::Error) -> ShopError {
    ShopError::Database(err.to_string())
}

/// 유일성 제약 위반이면 위반된 제약 이름 반환.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
}
