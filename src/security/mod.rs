//! 요청 형성(request shaping) 구성 요소
//!
//! HTTP와 무관한 순수 로직만 담고, actix 미들웨어 래퍼는 [`crate::middlewares`]에 있습니다.
//!
//! - [`rate_limiter`] - 이름 붙은 정책별 고정 윈도우 요청 제한
//! - [`csrf`] - 이중 제출 쿠키 토큰 발급/검증
//! - [`shaping`] - 응답 캐시와 제한기를 묶은 프로세스 전역 상태

pub mod csrf;
pub mod rate_limiter;
pub mod shaping;

pub use csrf::{CSRF_EXEMPT_PATHS, CsrfGuard, IssuedToken};
pub use rate_limiter::{FixedWindowRateLimiter, RateLimitDecision, RateLimitKey, RateLimitPolicy};
pub use shaping::{RequestShaping, SweepReport};
