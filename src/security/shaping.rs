//! 프로세스 전역 요청 형성 상태
//!
//! 응답 캐시와 정책별 요청 제한기를 한곳에 묶습니다. `main`에서 한 번 만들고
//! 워커마다 `Arc`를 복제해 미들웨어에 넘깁니다. 시작 시 비어 있고 프로세스 종료 외의 정리는 없습니다.

use std::sync::Arc;
use std::time::Duration;

use crate::caching::ResponseCache;
use crate::security::{FixedWindowRateLimiter, RateLimitPolicy};

#[derive(Clone)]
pub struct RequestShaping {
    pub cache: Arc<ResponseCache>,
    pub api_limiter: Arc<FixedWindowRateLimiter>,
    pub auth_limiter: Arc<FixedWindowRateLimiter>,
    pub password_reset_limiter: Arc<FixedWindowRateLimiter>,
}

/// 한 번의 정리 결과
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub cache_entries: usize,
    pub rate_limit_buckets: usize,
}

impl RequestShaping {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(ResponseCache::new(cache_ttl)),
            api_limiter: Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy::general_api())),
            auth_limiter: Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy::auth())),
            password_reset_limiter: Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy::password_reset())),
        }
    }

    fn limiters(&self) -> [&FixedWindowRateLimiter; 3] {
        [self.api_limiter.as_ref(), self.auth_limiter.as_ref(), self.password_reset_limiter.as_ref()]
    }

    /// 만료된 캐시 항목과 윈도우가 끝난 버킷을 제거합니다.
    pub fn sweep(&self) -> SweepReport {
        SweepReport {
            cache_entries: self.cache.purge_expired(),
            rate_limit_buckets: self.limiters().iter().map(|limiter| limiter.purge_expired()).sum(),
        }
    }

    /// `interval`마다 [`sweep`](Self::sweep)을 실행하는 백그라운드 태스크
    pub fn spawn_sweeper(&self, interval: Duration) {
        let shaping = self.clone();

        actix_web::rt::spawn(async move {
            let mut ticker = actix_web::rt::time::interval(interval);
            // 첫 tick은 즉시 완료됨
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let report = shaping.sweep();
                if report != SweepReport::default() {
                    log::debug!(
                        "🧹 요청 형성 상태 정리: 캐시 {}개, 제한 버킷 {}개",
                        report.cache_entries, report.rate_limit_buckets
                    );
                }
            }
        });
    }
}
