//! 비즈니스 서비스 모듈.
//!
//! 회원가입/로그인과 관심상품 관리를 담당합니다. 라우트 핸들러는 요청을 해석한 뒤
//! 이 서비스들을 호출합니다.

pub mod products;
pub mod users;

pub use products::{ProductService, RefreshReport, UpdateMyPriceRequest};
pub use users::{SignupRequest, SignupResponse, UserService};
