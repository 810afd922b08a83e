//! # HTTP 응답 캐시
//!
//! GET 응답을 프로세스 메모리에 TTL과 함께 보관합니다.
//!
//! ## 키 생성
//!
//! `METHOD:path?정렬된_쿼리` 형태의 정규 문자열(canonical key)을 만든 뒤 SHA-256 다이제스트를
//! 맵 키로 사용합니다. 쿼리 파라미터는 `key=value` 쌍 단위로 사전순 정렬하므로
//! `?a=1&b=2`와 `?b=2&a=1`은 같은 항목을 가리킵니다.
//!
//! 각 항목은 정규 문자열을 함께 보관하고, [`ResponseCache::invalidate`]는 이 정규 문자열에
//! 대해 부분 문자열 매칭을 수행합니다. (`"/api/trips"` → 모든 여행 목록/상세 응답)
//!
//! ## 만료
//!
//! `now - stored_at < ttl`인 동안만 유효합니다. 만료된 항목은 조회 시점에 제거되고,
//! [`ResponseCache::purge_expired`]로 주기적으로 정리할 수도 있습니다.
//!
//! ## 세대(generation)
//!
//! 무효화가 일어날 때마다 세대 번호가 올라갑니다. 응답 생성을 시작할 때 받은
//! [`FillTicket`]의 세대가 저장 시점의 세대와 다르면 그 응답은 버려집니다.
//! 쓰기 요청 이전에 계산된 응답이 쓰기 이후에 캐시에 들어가는 일을 막습니다.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use actix_web::web::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};

/// 캐시에 보관되는 응답 스냅샷
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// 요청에서 파생된 캐시 키
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    digest: String,
    canonical: String,
}

impl CacheKey {
    /// `query`는 `?` 없는 원본 쿼리 문자열입니다. (`"page=2&limit=10"`)
    pub fn new(method: &str, path: &str, query: &str) -> Self {
        let mut pairs: Vec<&str> = query.split('&').filter(|pair| !pair.is_empty()).collect();
        pairs.sort_unstable();

        let canonical = format!("{}:{}?{}", method.to_ascii_uppercase(), path, pairs.join("&"));
        let digest = format!("{:x}", Sha256::digest(canonical.as_bytes()));

        Self { digest, canonical }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

struct CacheEntry {
    canonical: String,
    response: CachedResponse,
    stored_at: DateTime<Utc>,
    ttl: TimeDelta,
}

impl CacheEntry {
    fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at < self.ttl
    }
}

/// 응답 생성을 시작할 때 발급되는 저장 권한
///
/// [`ResponseCache::complete_fill`]에 넘겨야 저장됩니다.
#[derive(Debug)]
pub struct FillTicket {
    key: CacheKey,
    generation: u64,
}

impl FillTicket {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

/// 프로세스 전역 응답 캐시
///
/// `main`에서 한 번 만들어 `Arc`로 미들웨어와 관리자 핸들러에 공유합니다.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    generation: AtomicU64,
    default_ttl: TimeDelta,
}

impl ResponseCache {
    pub fn new(default_ttl: std::time::Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            default_ttl: TimeDelta::from_std(default_ttl).unwrap_or(TimeDelta::seconds(300)),
        }
    }

    pub fn default_ttl(&self) -> TimeDelta {
        self.default_ttl
    }

    pub fn lookup(&self, method: &str, path: &str, query: &str) -> Option<CachedResponse> {
        self.lookup_at(&CacheKey::new(method, path, query), Utc::now())
    }

    /// 유효한 항목이 있으면 복사본을 반환하고, 만료된 항목은 이 자리에서 제거합니다.
    pub fn lookup_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<CachedResponse> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(key.digest()) {
                None => return None,
                Some(entry) if entry.is_fresh_at(now) => return Some(entry.response.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        // 읽기 락을 놓은 사이 다시 채워졌을 수 있음
        if entries.get(key.digest()).is_some_and(|entry| !entry.is_fresh_at(now)) {
            entries.remove(key.digest());
        }
        None
    }

    /// 세대 검사 없이 바로 저장합니다. `ttl`이 없으면 기본 TTL을 사용합니다.
    pub fn store(
        &self,
        method: &str,
        path: &str,
        query: &str,
        response: CachedResponse,
        ttl: Option<std::time::Duration>,
    ) {
        let ttl = ttl
            .and_then(|ttl| TimeDelta::from_std(ttl).ok())
            .unwrap_or(self.default_ttl);
        let key = CacheKey::new(method, path, query);

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Self::insert_entry(&mut entries, key, response, Utc::now(), ttl);
    }

    fn insert_entry(
        entries: &mut HashMap<String, CacheEntry>,
        key: CacheKey,
        response: CachedResponse,
        stored_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) {
        let CacheKey { digest, canonical } = key;
        entries.insert(digest, CacheEntry { canonical, response, stored_at, ttl });
    }

    /// 응답 생성을 시작하기 직전에 호출합니다.
    pub fn begin_fill(&self, key: CacheKey) -> FillTicket {
        FillTicket {
            key,
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    pub fn complete_fill(&self, ticket: FillTicket, response: CachedResponse) -> bool {
        self.complete_fill_at(ticket, response, Utc::now())
    }

    /// 발급 이후 무효화가 없었을 때만 저장하고 `true`를 반환합니다.
    pub fn complete_fill_at(&self, ticket: FillTicket, response: CachedResponse, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        // 무효화도 쓰기 락 안에서 세대를 올리므로 이 비교는 무효화와 직렬화됨
        if self.generation.load(Ordering::Acquire) != ticket.generation {
            log::debug!("🗑️ 무효화 이전에 시작된 응답 폐기: {}", ticket.key.canonical());
            return false;
        }

        Self::insert_entry(&mut entries, ticket.key, response, now, self.default_ttl);
        true
    }

    /// 정규 키에 `pattern`이 포함된 항목을 모두 제거하고 제거한 개수를 반환합니다.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::AcqRel);

        let before = entries.len();
        entries.retain(|_, entry| !entry.canonical.contains(pattern));
        let removed = before - entries.len();

        if removed > 0 {
            log::debug!("🧹 캐시 무효화 '{}': {}개 제거", pattern, removed);
        }
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
        log::info!("🧹 응답 캐시 전체 삭제");
    }

    /// 만료 여부와 관계없이 현재 보관 중인 항목 수
    pub fn size(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh_at(now));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn payload(body: &'static str) -> CachedResponse {
        CachedResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    fn store_at(cache: &ResponseCache, key: &CacheKey, body: &'static str, now: DateTime<Utc>) {
        let ticket = cache.begin_fill(key.clone());
        assert!(cache.complete_fill_at(ticket, payload(body), now));
    }

    #[test]
    fn test_store_then_lookup_returns_identical_payload() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.store("GET", "/api/trips", "page=1", payload(r#"{"data":[1]}"#), None);

        assert_eq!(cache.lookup("GET", "/api/trips", "page=1"), Some(payload(r#"{"data":[1]}"#)));
        assert_eq!(cache.lookup("GET", "/api/trips", "page=2"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        let key = CacheKey::new("GET", "/api/trips", "");
        let stored_at = Utc::now();
        store_at(&cache, &key, "trips", stored_at);

        assert!(cache.lookup_at(&key, stored_at + TimeDelta::seconds(299)).is_some());
        assert!(cache.lookup_at(&key, stored_at + TimeDelta::seconds(300)).is_none());
        // 만료 항목은 조회 시 제거됨
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_key_ignores_query_parameter_order() {
        let first = CacheKey::new("GET", "/api/trips", "a=1&b=2");
        let second = CacheKey::new("get", "/api/trips", "b=2&a=1");

        assert_eq!(first, second);
        assert_eq!(first.canonical(), "GET:/api/trips?a=1&b=2");
        assert_eq!(first.digest().len(), 64);
    }

    #[test]
    fn test_invalidate_matches_canonical_substring() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.store("GET", "/api/trips", "", payload("list"), None);
        cache.store("GET", "/api/trips/abc", "", payload("detail"), None);
        cache.store("GET", "/api/reviews", "", payload("reviews"), None);

        assert_eq!(cache.invalidate("/api/trips"), 2);
        assert_eq!(cache.size(), 1);
        assert!(cache.lookup("GET", "/api/reviews", "").is_some());
    }

    #[test]
    fn test_fill_started_before_invalidation_is_discarded() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        let ticket = cache.begin_fill(CacheKey::new("GET", "/api/trips/abc", ""));

        cache.invalidate("/api/bookings");

        assert!(!cache.complete_fill(ticket, payload("stale")));
        assert!(cache.lookup("GET", "/api/trips/abc", "").is_none());
    }

    #[test]
    fn test_purge_and_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let now = Utc::now();
        store_at(&cache, &CacheKey::new("GET", "/old", ""), "old", now - TimeDelta::seconds(120));
        store_at(&cache, &CacheKey::new("GET", "/new", ""), "new", now);

        assert_eq!(cache.purge_expired_at(now), 1);
        assert_eq!(cache.size(), 1);

        cache.clear();
        assert_eq!(cache.size(), 0);
    }
}
