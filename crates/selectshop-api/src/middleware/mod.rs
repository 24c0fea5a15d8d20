//! API 서버용 HTTP middleware.
//!
//! 보안 파이프라인은 [`crate::auth`]에 있습니다.

mod metrics;

pub use metrics::metrics_layer;
