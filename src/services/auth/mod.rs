//! 인증 서비스 모듈
//!
//! JWT 기반 토큰 인증을 담당합니다.
//!
//! # Security
//!
//! - HMAC-SHA256 토큰 서명
//! - 토큰 만료 시간 관리
//! - 역할(`user`, `admin`) 클레임
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::TokenService;
//!
//! let token_service = TokenService::instance();
//! let token = token_service.generate_access_token(&user)?;
//! let claims = token_service.verify_token(&token)?;
//! ```

pub mod token_service;

pub use token_service::*;
