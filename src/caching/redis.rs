//! # Redis 캐시 클라이언트
//!
//! 리포지토리 계층의 문서 캐시(여행 문서 등)와 비밀번호 재설정 토큰 저장소로 사용됩니다.
//! 값은 JSON으로 직렬화되며, 멀티플렉싱 연결 하나로 동시 요청을 처리합니다.
//!
//! HTTP 응답 캐시는 여기가 아니라 프로세스 로컬 [`super::response_cache::ResponseCache`]가 담당합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::RedisConfig;

/// Redis 캐시 클라이언트 래퍼
///
/// ```rust,ignore
/// let redis = RedisClient::new().await?;
/// redis.set_with_expiry("trip:6650...", &trip, 600).await?;
/// let cached: Option<Trip> = redis.get("trip:6650...").await?;
/// ```
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn serialization_error(context: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, e.to_string()))
}

impl RedisClient {
    /// `REDIS_URL`로 연결하고 PING으로 서버 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::open(RedisConfig::url())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    /// JSON으로 저장된 값을 조회합니다. 키가 없으면 `Ok(None)`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| serialization_error("Deserialization failed", e)))
            .transpose()
    }

    /// TTL 없이 저장합니다. 기존 값은 덮어씁니다.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serialization_error("Serialization failed", e))?;
        conn.set(key, json).await
    }

    /// 만료 시간(초)과 함께 저장합니다.
    ///
    /// | 용도 | TTL |
    /// |------|-----|
    /// | 여행 문서 | 600 |
    /// | 비밀번호 재설정 토큰 | 600 |
    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: usize) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serialization_error("Serialization failed", e))?;
        conn.set_ex(key, json, seconds as u64).await
    }

    /// 값을 읽는 동시에 삭제합니다. (`GETDEL`)
    ///
    /// 일회용 토큰 소비에 사용되며, 동시에 두 요청이 같은 키를 읽어도 한 쪽만 값을 받습니다.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get_del(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| serialization_error("Deserialization failed", e)))
            .transpose()
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// 패턴과 일치하는 키 목록 (`KEYS`). 컬렉션 캐시 무효화에만 사용합니다.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}
