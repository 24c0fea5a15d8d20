//! 인메모리 저장소.
//!
//! DB 없이 서버를 띄우거나 테스트할 때 사용합니다.
//! 유일성 검사와 삽입은 같은 쓰기 잠금 안에서 수행됩니다.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use selectshop_core::{NewProduct, NewUser, Product, ShopError, ShopResult, User};

use super::{ProductStore, UserStore};

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// 인메모리 자격증명 저장소.
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> ShopResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> ShopResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: NewUser) -> ShopResult<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.username == user.username) {
            return Err(ShopError::DuplicateUsername(user.username));
        }
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(ShopError::DuplicateEmail(user.email));
        }

        let id = table.allocate_id();
        let record = User {
            id,
            username: user.username,
            password_digest: user.password_digest,
            email: user.email,
            role: user.role,
            created_at: Utc::now(),
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }
}

/// 인메모리 관심상품 저장소.
#[derive(Default)]
pub struct MemoryProductStore {
    table: RwLock<Table<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: i64, apply: impl FnOnce(&mut Product)) -> ShopResult<Product> {
        let mut table = self.table.write().await;
        let product = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| ShopError::NotFound(format!("product {id}")))?;

        apply(product);
        product.modified_at = Utc::now();
        Ok(product.clone())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, user_id: i64, product: NewProduct) -> ShopResult<Product> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let now = Utc::now();

        let record = Product {
            id,
            title: product.title,
            image: product.image,
            link: product.link,
            lprice: product.lprice,
            myprice: 0,
            user_id,
            created_at: now,
            modified_at: now,
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> ShopResult<Vec<Product>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_all_by_user_id(&self, user_id: i64) -> ShopResult<Vec<Product>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> ShopResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_id_and_user_id(&self, id: i64, user_id: i64) -> ShopResult<Option<Product>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn update_myprice(&self, id: i64, myprice: i32) -> ShopResult<Product> {
        self.modify(id, |p| p.myprice = myprice).await
    }

    async fn update_lprice(&self, id: i64, lprice: i32) -> ShopResult<Product> {
        self.modify(id, |p| p.lprice = lprice).await
    }
}
