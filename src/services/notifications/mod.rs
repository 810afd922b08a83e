//! 알림/메일 서비스 모듈
//!
//! 두 서비스 모두 주 흐름을 실패시키지 않는 fire-and-forget 협력자입니다.

pub mod mail_service;
pub mod notification_service;

pub use mail_service::{LogMailer, MailMessage, MailService, Mailer};
pub use notification_service::NotificationService;
