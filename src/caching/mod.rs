//! 캐싱 계층 모듈
//!
//! - [`redis`] - 리포지토리 문서 캐시와 일회용 토큰을 위한 Redis 클라이언트
//! - [`response_cache`] - GET 응답을 보관하는 프로세스 로컬 TTL 캐시
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! CACHE_TTL_SECONDS=300             # 응답 캐시 TTL
//! ```

pub mod redis;
pub mod response_cache;

pub use response_cache::{CacheKey, CachedResponse, FillTicket, ResponseCache};
