//! # 사용자/인증 서비스 구현
//!
//! 회원가입, 로그인 검증, 비밀번호 재설정 흐름을 담당합니다.
//!
//! ```text
//! register ──► bcrypt hash ──► UserRepository::create ──► 환영 메일 (fire-and-forget)
//! login    ──► find_by_email ──► bcrypt verify
//! forgot   ──► 무작위 토큰 ──► Redis(password_reset:{sha256}, 600s) ──► 재설정 메일 (fire-and-forget)
//! reset    ──► Redis GETDEL ──► bcrypt hash ──► update_password
//! ```
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 환경별 cost (`PasswordConfig`)
//! - **계정 존재 여부 비노출**: 로그인 실패 메시지 통일, 비밀번호 재설정 요청은 항상 성공 응답
//! - **토큰 해시 저장**: 재설정 토큰 원문은 저장하지 않음

use std::sync::Arc;
use bcrypt::hash;
use singleton_macro::service;
use crate::{
    config::{PasswordConfig, ServerConfig},
    core::errors::{AppError, ErrorContext},
    domain::{
        dto::users::{RegisterRequest, UserResponse},
        entities::users::User,
    },
    repositories::{tokens::TokenRepository, users::UserRepository},
    services::notifications::{MailMessage, MailService},
    utils::random::random_url_safe_token,
};

/// 재설정 토큰 유효 시간 (10분)
const RESET_TOKEN_TTL_SECONDS: u64 = 600;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    token_repo: Arc<TokenRepository>,
    mail_service: Arc<MailService>,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, PasswordConfig::bcrypt_cost())
        .context("비밀번호 해싱 실패")
}

impl UserService {
    /// 회원가입
    ///
    /// 이메일 중복 시 `ConflictError`(409). 환영 메일 실패는 가입을 실패시키지 않습니다.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let hash_start = std::time::Instant::now();
        let password_hash = hash_password(&request.password)?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());

        let user = User::new_local(request.name, request.email, password_hash);
        let created_user = self.user_repo.create(user).await?;

        log::info!("👤 새 사용자 가입: {}", created_user.email);
        self.mail_service
            .send_in_background(MailMessage::welcome(&created_user.email, &created_user.name));

        Ok(created_user)
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        let user = self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// 이메일/비밀번호 검증
    ///
    /// 계정이 없거나 비밀번호가 틀리면 같은 메시지의 `AuthenticationError`를 반환합니다.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let verify_start = std::time::Instant::now();
        let is_valid = bcrypt::verify(password, &user.password_hash)
            .context("비밀번호 검증 실패")?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !is_valid {
            log::warn!("⚠️ 로그인 실패: {}", email);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// 비밀번호 재설정 요청
    ///
    /// 가입되지 않은 이메일이어도 `Ok(())`를 반환합니다.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            log::info!("비밀번호 재설정 요청 - 가입되지 않은 이메일: {}", email);
            return Ok(());
        };

        let token = random_url_safe_token();
        self.token_repo
            .store_reset_token(&token, &user, RESET_TOKEN_TTL_SECONDS)
            .await?;

        self.mail_service.send_in_background(MailMessage::password_reset(
            &user.email,
            &token,
            &ServerConfig::frontend_url(),
        ));

        Ok(())
    }

    /// 재설정 토큰 소비 + 새 비밀번호 저장
    ///
    /// 토큰은 성공/실패와 무관하게 한 번 읽히면 사라집니다.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<User, AppError> {
        let info = self.token_repo
            .consume_reset_token(token)
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid or expired reset token".to_string()))?;

        let user = self.user_repo
            .find_by_id(&info.user_id)
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid or expired reset token".to_string()))?;

        let password_hash = hash_password(new_password)?;
        self.user_repo.update_password(&user, &password_hash).await?;

        log::info!("🔑 비밀번호 재설정 완료: {}", user.email);
        Ok(User { password_hash, ..user })
    }
}
