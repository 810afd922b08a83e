//! # 메일 발송 서비스
//!
//! 가입 환영 메일과 비밀번호 재설정 메일을 [`Mailer`] 구현으로 전달합니다.
//! 실제 메일 제공자 연동은 범위 밖이며, 기본 구현 [`LogMailer`]는 발송 내용을 로그로만 남깁니다.
//!
//! 모든 발송은 fire-and-forget입니다. 실패는 `error` 로그로 남고 호출한 흐름(가입,
//! 비밀번호 재설정 요청)을 실패시키지 않습니다.

use async_trait::async_trait;
use singleton_macro::service;

use crate::core::errors::AppResult;

const BRAND: &str = "Continental Travels & Tours";

#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl MailMessage {
    pub fn welcome(email: &str, name: &str) -> Self {
        Self {
            to: email.to_string(),
            subject: format!("Welcome to {}", BRAND),
            html: format!(
                "<h2>Welcome to {brand}!</h2>\
                 <p>Hi {name},</p>\
                 <p>Thank you for registering with us. You can now explore our travel packages and book your next adventure.</p>\
                 <p>Best regards,<br>{brand} Team</p>",
                brand = BRAND,
                name = name,
            ),
        }
    }

    /// 재설정 링크: `{frontend_url}/auth/reset-password?token={token}`
    pub fn password_reset(email: &str, token: &str, frontend_url: &str) -> Self {
        let reset_url = format!("{}/auth/reset-password?token={}", frontend_url.trim_end_matches('/'), token);

        Self {
            to: email.to_string(),
            subject: format!("Password Reset Request - {}", BRAND),
            html: format!(
                "<h2>Password Reset Request</h2>\
                 <p>You have requested to reset your password. Open the link below to reset it:</p>\
                 <p><a href=\"{url}\">{url}</a></p>\
                 <p>This link will expire in 10 minutes.</p>\
                 <p>If you did not request this, please ignore this email.</p>",
                url = reset_url,
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}

/// 발송 내용을 로그로만 남기는 메일러
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        log::info!("📧 메일 발송 (로그 전용) - to: {}, subject: {}", message.to, message.subject);
        log::debug!("📧 본문: {}", message.html);
        Ok(())
    }
}

/// 발송을 시도하고 실패는 로그로만 남깁니다. 성공 여부를 반환합니다.
pub async fn deliver_best_effort<M>(mailer: &M, message: &MailMessage) -> bool
where
    M: Mailer + ?Sized,
{
    match mailer.send(message).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("❌ 메일 발송 실패 - to: {}, subject: {}: {}", message.to, message.subject, e);
            false
        }
    }
}

#[service(name = "mail")]
pub struct MailService {
    // 외부 의존성 없음
}

impl MailService {
    /// 백그라운드 태스크로 발송합니다. 호출자는 결과를 기다리지 않습니다.
    pub fn send_in_background(&self, message: MailMessage) {
        actix_web::rt::spawn(async move {
            deliver_best_effort(&LogMailer, &message).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &MailMessage) -> AppResult<()> {
            Err(AppError::ExternalServiceError("smtp unavailable".to_string()))
        }
    }

    #[test]
    fn test_password_reset_message_contains_link() {
        let message = MailMessage::password_reset("kim@example.com", "abc123", "http://localhost:3000/");

        assert_eq!(message.to, "kim@example.com");
        assert!(message.subject.starts_with("Password Reset Request"));
        assert!(message.html.contains("http://localhost:3000/auth/reset-password?token=abc123"));
    }

    #[test]
    fn test_welcome_message_greets_user() {
        let message = MailMessage::welcome("lee@example.com", "Lee");
        assert!(message.html.contains("Hi Lee,"));
    }

    #[actix_web::test]
    async fn test_delivery_failure_is_swallowed() {
        let message = MailMessage::welcome("lee@example.com", "Lee");

        assert!(!deliver_best_effort(&FailingMailer, &message).await);
        assert!(deliver_best_effort(&LogMailer, &message).await);
    }
}
