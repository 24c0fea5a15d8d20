//! 백그라운드 태스크.

pub mod price_refresh;

pub use price_refresh::{start_price_refresh_task, PriceRefreshTask};
