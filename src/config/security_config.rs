//! # Security Configuration Module
//!
//! JWT, 요청 형성(request shaping) 미들웨어와 관련된 설정입니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! # JWT
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_HOURS="24"
//!
//! # actix-governor 버스트 가드 (전역)
//! export RATE_LIMIT_PER_SECOND="100"
//! export RATE_LIMIT_BURST_SIZE="200"
//!
//! # 응답 캐시
//! export CACHE_TTL_SECONDS="300"
//! export CACHE_SWEEP_INTERVAL_SECONDS="60"
//! ```
//!
//! CSRF 쿠키/헤더 이름은 클라이언트와 약속된 고정 상수입니다. ([`CsrfConfig`])

use std::env;
use std::time::Duration;

use super::Environment;

/// JWT 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명 비밀키 (HS256)
    ///
    /// 환경 변수가 없으면 개발용 기본값을 사용하며 경고 로그를 남깁니다.
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        })
    }

    /// 액세스 토큰 만료 시간(시간 단위). 기본값: 24
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(24)
    }
}

/// `actix-governor` 기반 전역 버스트 가드 설정
///
/// 도메인별 고정 윈도우 정책([`crate::security::RateLimitPolicy`]) 앞에서
/// 초당 폭주만 걸러내는 바깥 방어선입니다.
pub struct BurstGuardConfig;

impl BurstGuardConfig {
    pub fn per_second() -> u64 {
        env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|value| *value > 0)
            .unwrap_or(100)
    }

    pub fn burst_size() -> u32 {
        env::var("RATE_LIMIT_BURST_SIZE")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|value| *value > 0)
            .unwrap_or(200)
    }
}

/// 응답 캐시 설정
pub struct CacheConfig;

impl CacheConfig {
    /// 캐시 항목의 기본 TTL. 기본값: 300초
    pub fn ttl() -> Duration {
        let seconds = env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(300);
        Duration::from_secs(seconds)
    }

    /// 만료 항목 정리 주기. 0이면 백그라운드 정리를 하지 않습니다.
    pub fn sweep_interval() -> Option<Duration> {
        let seconds: u64 = env::var("CACHE_SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(60);

        (seconds > 0).then(|| Duration::from_secs(seconds))
    }
}

/// CSRF 이중 제출 쿠키 설정
pub struct CsrfConfig;

impl CsrfConfig {
    /// 토큰을 담는 httpOnly 쿠키 이름
    pub const COOKIE_NAME: &'static str = "__csrf_token__";

    /// 클라이언트가 토큰을 되돌려 보내는 요청 헤더 이름
    pub const HEADER_NAME: &'static str = "x-csrf-token";

    /// 쿠키 유효 기간 (24시간)
    pub const MAX_AGE_HOURS: i64 = 24;

    /// 프로덕션에서만 `Secure` 속성을 붙입니다.
    pub fn secure_cookie() -> bool {
        Environment::current().is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_constants() {
        assert_eq!(CsrfConfig::COOKIE_NAME, "__csrf_token__");
        assert_eq!(CsrfConfig::HEADER_NAME, "x-csrf-token");
        assert_eq!(CsrfConfig::MAX_AGE_HOURS, 24);
    }

    #[test]
    fn test_cache_defaults() {
        if env::var("CACHE_TTL_SECONDS").is_err() {
            assert_eq!(CacheConfig::ttl(), Duration::from_secs(300));
        }
        if env::var("CACHE_SWEEP_INTERVAL_SECONDS").is_err() {
            assert_eq!(CacheConfig::sweep_interval(), Some(Duration::from_secs(60)));
        }
    }

    #[test]
    fn test_burst_guard_defaults() {
        if env::var("RATE_LIMIT_PER_SECOND").is_err() {
            assert_eq!(BurstGuardConfig::per_second(), 100);
        }
        if env::var("RATE_LIMIT_BURST_SIZE").is_err() {
            assert_eq!(BurstGuardConfig::burst_size(), 200);
        }
    }

    #[test]
    fn test_jwt_expiration_default() {
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 24);
        }
    }
}
