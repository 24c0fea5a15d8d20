//! PostgreSQL 관심상품 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use selectshop_core::{NewProduct, Product, ShopError, ShopResult};

use super::{db_error, ProductStore};

/// `products` 테이블 행.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    image: String,
    link: String,
    lprice: i32,
    myprice: i32,
    user_id: i64,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            title: row.title,
            image: row.image,
            link: row.link,
            lprice: row.lprice,
            myprice: row.myprice,
            user_id: row.user_id,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

/// PostgreSQL 관심상품 저장소.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_column(&self, sql: &str, id: i64, value: i32) -> ShopResult<Product> {
        sqlx::query_as::<_, ProductRow>(sql)
            .bind(id)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Product::from)
            .ok_or_else(|| ShopError::NotFound(format!("product {id}")))
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, user_id: i64, product: NewProduct) -> ShopResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (title, image, link, lprice, myprice, user_id)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING *
            "#,
        )
        .bind(&product.title)
        .bind(&product.image)
        .bind(&product.link)
        .bind(product.lprice)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }

    async fn find_all(&self) -> ShopResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_all_by_user_id(&self, user_id: i64) -> ShopResult<Vec<Product>> {
        let rows =
            sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> ShopResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Product::from))
    }

    async fn find_by_id_and_user_id(&self, id: i64, user_id: i64) -> ShopResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Product::from))
    }

    async fn update_myprice(&self, id: i64, myprice: i32) -> ShopResult<Product> {
        self.update_column(
            "UPDATE products SET myprice = $2, modified_at = NOW() WHERE id = $1 RETURNING *",
            id,
            myprice,
        )
        .await
    }

    async fn update_lprice(&self, id: i64, lprice: i32) -> ShopResult<Product> {
        self.update_column(
            "UPDATE products SET lprice = $2, modified_at = NOW() WHERE id = $1 RETURNING *",
            id,
            lprice,
        )
        .await
    }
}
