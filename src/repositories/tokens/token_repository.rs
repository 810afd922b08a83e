use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use sha2::{Digest, Sha256};
use singleton_macro::repository;
use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::users::User;

/// 비밀번호 재설정 토큰 관리를 위한 Repository
///
/// Redis를 사용하여 다음 기능을 제공합니다:
/// - 재설정 토큰 저장 (원문이 아닌 SHA-256 다이제스트를 키로)
/// - 토큰 만료 시간 자동 관리 (TTL)
/// - 토큰 일회성 소비
#[repository(name = "token", collection = "tokens")]
pub struct TokenRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

/// 재설정 토큰에 묶인 최소 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetTokenInfo {
    /// 사용자 ID
    pub user_id: String,
    /// 발급 당시 이메일 (캐시 무효화용)
    pub email: String,
    /// 발급 일시 (Unix timestamp)
    pub issued_at: i64,
    /// 만료 시간 (Unix timestamp)
    pub expires_at: i64,
}

/// 원문 토큰 → 16진수 SHA-256 다이제스트
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn reset_key(token: &str) -> String {
    format!("password_reset:{}", hash_token(token))
}

impl TokenRepository {
    /// 재설정 토큰 저장
    ///
    /// TTL이 0이면 저장하지 않고 에러를 반환합니다.
    pub async fn store_reset_token(&self, token: &str, user: &User, ttl_seconds: u64) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Err(AppError::InternalError("TTL cannot be zero".to_string()));
        }

        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        let now = Utc::now().timestamp();
        let info = PasswordResetTokenInfo {
            user_id: user_id.clone(),
            email: user.email.clone(),
            issued_at: now,
            expires_at: now + ttl_seconds as i64,
        };

        self.redis
            .set_with_expiry(&reset_key(token), &info, ttl_seconds as usize)
            .await?;

        log::info!("🔑 비밀번호 재설정 토큰 저장 - user_id: {}, ttl: {}초", user_id, ttl_seconds);
        Ok(())
    }

    /// 재설정 토큰 소비
    ///
    /// 토큰은 읽는 즉시 삭제되므로 같은 토큰으로 두 번 성공할 수 없습니다.
    /// 없거나 만료되었으면 `Ok(None)`.
    pub async fn consume_reset_token(&self, token: &str) -> AppResult<Option<PasswordResetTokenInfo>> {
        let info = self.redis.take::<PasswordResetTokenInfo>(&reset_key(token)).await?;

        Ok(info.filter(|info| info.expires_at > Utc::now().timestamp()))
    }
}
