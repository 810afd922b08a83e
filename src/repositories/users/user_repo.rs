//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 캐싱을 지원합니다.
//!
//! ## 특징
//!
//! - **하이브리드 스토리지**: MongoDB + Redis 캐싱
//! - **자동 의존성 주입**: 싱글톤 매크로를 통한 DI
//! - **데이터 무결성**: 이메일 유니크 인덱스

use std::sync::Arc;
use mongodb::{bson::{doc, oid::ObjectId, DateTime}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::errors::{AppError, AppResult},
    core::registry::Repository,
    db::Database,
    domain::entities::users::User,
};
use singleton_macro::repository;

/// 사용자 데이터 액세스 리포지토리
///
/// ## 캐싱 전략
///
/// ### L1 Cache (Redis)
/// - **TTL**: 10분 (600초)
/// - **키 패턴**:
///   - 개별 사용자: `user:{user_id}`
///   - 이메일 조회: `user:email:{email}`
///
/// ### L2 Storage (MongoDB)
/// - **컬렉션명**: `users`
/// - **인덱스**: email(unique), createdAt(desc)
///
/// ## 에러 처리
///
/// - **DatabaseError**: MongoDB 연결 오류, 쿼리 실행 오류
/// - **ValidationError**: 잘못된 ObjectId 형식
/// - **ConflictError**: 이메일 중복
///
/// ```rust,ignore
/// let repo = UserRepository::instance();
///
/// let created = repo.create(User::new_local(name, email, hash)).await?;
/// let found = repo.find_by_email("john@example.com").await?;
/// ```
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결 (자동 주입)
    db: Arc<Database>,

    /// Redis 캐시 클라이언트 (자동 주입)
    redis: Arc<RedisClient>,
}

fn email_cache_key(email: &str) -> String {
    format!("user:email:{}", email)
}

impl UserRepository {
    /// 이메일 주소로 사용자 조회
    ///
    /// 이메일은 소문자로 정규화한 뒤 조회합니다.
    ///
    /// # 캐싱 정책
    ///
    /// - **캐시 키**: `user:email:{email}`
    /// - **TTL**: 600초 (10분)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let cache_key = email_cache_key(&email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "email": &email })
            .await?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, 600)
                .await;
        }

        Ok(user)
    }

    /// ID로 사용자 조회
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 ID의 사용자가 없는 경우
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, 600)
                .await;
        }

        Ok(user)
    }

    /// 새 사용자 생성
    ///
    /// 같은 이메일이 이미 있으면 `ConflictError`를 반환합니다.
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("User already exists with this email".to_string()));
        }

        let result = self.collection::<User>()
            .insert_one(&user)
            .await?;

        user.id = Some(
            result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::DatabaseError("삽입된 사용자 id가 ObjectId가 아닙니다".to_string()))?,
        );

        let _ = self.invalidate_collection_cache(None).await;

        Ok(user)
    }

    /// 비밀번호 해시 교체
    ///
    /// ID 캐시와 이메일 캐시를 모두 무효화합니다.
    pub async fn update_password(&self, user: &User, password_hash: &str) -> AppResult<()> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        self.collection::<User>()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": { "passwordHash": password_hash, "updatedAt": DateTime::now() } },
            )
            .await?;

        let _ = self.invalidate_cache(&object_id.to_hex()).await;
        let _ = self.redis.del(&email_cache_key(&user.email)).await;

        Ok(())
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 1. **이메일 유니크 인덱스**: 중복 이메일 방지 및 로그인 조회 최적화
    /// 2. **생성일 인덱스**: 최근 가입자 정렬
    pub async fn create_indexes(&self) -> AppResult<()> {
        let collection = self.collection::<User>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, created_at_index])
            .await?;

        Ok(())
    }
}
