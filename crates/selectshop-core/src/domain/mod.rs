//! 도메인 모델.

pub mod product;
pub mod role;
pub mod user;

pub use product::{NewProduct, Product};
pub use role::UserRole;
pub use user::{NewUser, User};
