//! 미들웨어 모듈
//!
//! ActixWeb 요청 처리 파이프라인의 횡단 관심사(Cross-cutting concerns)를 처리합니다.
//! 판단 로직은 [`crate::security`]와 [`crate::caching`]에 있고, 여기서는 HTTP에 연결만 합니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. 인증 미들웨어 (AuthMiddleware)
//! - Bearer 헤더 또는 `token` 쿠키의 JWT 검증
//! - 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드, 역할 기반 접근 제어
//!
//! ### 2. 요청 제한 (RateLimitMiddleware)
//! - 정책별 고정 윈도우 카운터, `X-RateLimit-*` 헤더, 429 + `Retry-After`
//!
//! ### 3. 응답 캐시 (CacheMiddleware)
//! - GET 응답 캐시 (`X-Cache: HIT|MISS`), 쓰기 요청 후 패턴 무효화
//!
//! ### 4. CSRF (CsrfMiddleware)
//! - 이중 제출 쿠키 검증, 실패 시 400
//!
//! # 적용 순서
//!
//! ```rust,ignore
//! web::scope("/api")
//!     .wrap(CacheMiddleware::new(cache.clone()))       // 가장 안쪽
//!     .wrap(CsrfMiddleware::default())
//!     .wrap(RateLimitMiddleware::new(api_limiter.clone())) // 가장 바깥
//! ```
//!
//! 차단된 요청은 캐시 무효화를 일으키지 않습니다.

pub mod auth_middleware;
mod auth_inner;
pub mod cache_middleware;
pub mod csrf_middleware;
pub mod rate_limit_middleware;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
pub use cache_middleware::{CacheMiddleware, CachePolicy};
pub use csrf_middleware::CsrfMiddleware;
pub use rate_limit_middleware::RateLimitMiddleware;
