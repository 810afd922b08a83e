//! # 고정 윈도우 요청 제한기
//!
//! 키마다 `{count, reset_at}` 버킷을 두고 윈도우 안의 요청 수를 셉니다.
//!
//! - `now >= reset_at`이면 카운터를 1로, `reset_at = now + window`로 재설정
//! - 아니면 카운터 증가 (차단된 요청도 이 한 번의 증가는 반영됨)
//! - `count <= max_requests`일 때만 허용
//!
//! 버킷 맵은 하나의 `Mutex` 아래에서 갱신되므로 같은 키에 대한 동시 증가가 유실되지 않습니다.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

/// 버킷 키를 요청에서 만드는 방식
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitKey {
    /// 클라이언트 주소
    ClientAddress,
    /// 클라이언트 주소 + 요청 경로 (`{ip}-{path}`)
    AddressAndPath,
    /// 클라이언트 주소 + 고정 접미사 (`{ip}-{suffix}`)
    AddressWithSuffix(&'static str),
}

/// 이름이 붙은 요청 제한 정책
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub window: TimeDelta,
    pub max_requests: u32,
    pub message: &'static str,
    pub key: RateLimitKey,
}

impl RateLimitPolicy {
    /// 일반 API: 60초당 100회, 클라이언트 주소 기준
    pub fn general_api() -> Self {
        Self {
            name: "api",
            window: TimeDelta::seconds(60),
            max_requests: 100,
            message: "Too many requests from this IP, please try again later.",
            key: RateLimitKey::ClientAddress,
        }
    }

    /// 회원가입/로그인: 15분당 5회, 주소 + 경로 기준
    pub fn auth() -> Self {
        Self {
            name: "auth",
            window: TimeDelta::minutes(15),
            max_requests: 5,
            message: "Too many login/registration attempts, please try again after 15 minutes.",
            key: RateLimitKey::AddressAndPath,
        }
    }

    /// 비밀번호 재설정: 60분당 3회, 주소 + `password-reset` 기준
    pub fn password_reset() -> Self {
        Self {
            name: "password-reset",
            window: TimeDelta::minutes(60),
            max_requests: 3,
            message: "Too many password reset requests, please try again later.",
            key: RateLimitKey::AddressWithSuffix("password-reset"),
        }
    }

    pub fn bucket_key(&self, client_address: &str, path: &str) -> String {
        match self.key {
            RateLimitKey::ClientAddress => client_address.to_string(),
            RateLimitKey::AddressAndPath => format!("{}-{}", client_address, path),
            RateLimitKey::AddressWithSuffix(suffix) => format!("{}-{}", client_address, suffix),
        }
    }
}

/// 한 번의 `check` 결과
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    /// 윈도우가 끝날 때까지 남은 초 (올림, 최소 1)
    pub retry_after_secs: u64,
}

#[derive(Debug)]
struct Bucket {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// 정책 하나에 대응하는 프로세스 로컬 제한기
pub struct FixedWindowRateLimiter {
    policy: RateLimitPolicy,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Utc::now())
    }

    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket { count: 0, reset_at: now });

        if now >= bucket.reset_at {
            bucket.count = 1;
            bucket.reset_at = now + self.policy.window;
        } else {
            bucket.count = bucket.count.saturating_add(1);
        }

        let millis_left = (bucket.reset_at - now).num_milliseconds().max(0) as u64;

        RateLimitDecision {
            allowed: bucket.count <= self.policy.max_requests,
            limit: self.policy.max_requests,
            remaining: self.policy.max_requests.saturating_sub(bucket.count),
            reset_at: bucket.reset_at,
            retry_after_secs: millis_left.div_ceil(1000).max(1),
        }
    }

    /// 윈도우가 끝난 버킷을 제거하고 제거한 개수를 반환합니다.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let before = buckets.len();
        buckets.retain(|_, bucket| now < bucket.reset_at);
        before - buckets.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: i64) -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(RateLimitPolicy {
            name: "test",
            window: TimeDelta::seconds(window_secs),
            max_requests,
            message: "slow down",
            key: RateLimitKey::ClientAddress,
        })
    }

    #[test]
    fn test_exactly_max_requests_are_allowed() {
        let limiter = limiter(5, 60);
        let now = Utc::now();

        for attempt in 1..=5 {
            let decision = limiter.check_at("10.0.0.1", now);
            assert!(decision.allowed, "attempt {} should pass", attempt);
            assert_eq!(decision.remaining, 5 - attempt);
        }

        let denied = limiter.check_at("10.0.0.1", now + TimeDelta::seconds(1));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_secs, 59);
    }

    #[test]
    fn test_window_reset_allows_again() {
        let limiter = limiter(2, 60);
        let start = Utc::now();

        limiter.check_at("k", start);
        limiter.check_at("k", start);
        assert!(!limiter.check_at("k", start).allowed);

        let after = limiter.check_at("k", start + TimeDelta::seconds(60));
        assert!(after.allowed);
        assert_eq!(after.remaining, 1);
        assert_eq!(after.reset_at, start + TimeDelta::seconds(120));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, 60);
        let now = Utc::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let limiter = limiter(1, 60);
        let start = Utc::now();
        limiter.check_at("k", start);

        let decision = limiter.check_at("k", start + TimeDelta::milliseconds(59_999));
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after_secs, 1);
    }

    #[test]
    fn test_policy_bucket_keys() {
        assert_eq!(RateLimitPolicy::general_api().bucket_key("1.2.3.4", "/api/trips"), "1.2.3.4");
        assert_eq!(
            RateLimitPolicy::auth().bucket_key("1.2.3.4", "/api/auth/login"),
            "1.2.3.4-/api/auth/login"
        );
        assert_eq!(
            RateLimitPolicy::password_reset().bucket_key("1.2.3.4", "/api/auth/forgot-password"),
            "1.2.3.4-password-reset"
        );
    }

    #[test]
    fn test_named_policy_limits() {
        assert_eq!(RateLimitPolicy::general_api().max_requests, 100);
        assert_eq!(RateLimitPolicy::auth().window, TimeDelta::minutes(15));
        assert_eq!(RateLimitPolicy::password_reset().max_requests, 3);
    }

    #[test]
    fn test_purge_expired_buckets() {
        let limiter = limiter(3, 60);
        let now = Utc::now();
        limiter.check_at("old", now - TimeDelta::seconds(120));
        limiter.check_at("fresh", now);

        assert_eq!(limiter.purge_expired_at(now), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
