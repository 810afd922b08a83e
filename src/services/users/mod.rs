//! 사용자 관리 서비스 모듈
//!
//! 회원가입, 로그인 검증, 비밀번호 재설정을 담당합니다.
//!
//! # Security
//!
//! - bcrypt 비밀번호 해싱
//! - 이메일 중복 방지
//! - 일회용 재설정 토큰 (Redis, 10분)
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user_service = UserService::instance();
//! let user = user_service.verify_password("kim@example.com", "secret1").await?;
//! ```

pub mod user_service;

pub use user_service::UserService;
