//! # Domain Models
//!
//! 저장되지 않는 요청 범위 모델입니다.
//!
//! - [`auth`] - 인증된 사용자 컨텍스트, 인증 모드/역할 요구사항
//! - [`token`] - JWT 클레임

pub mod auth;
pub mod token;
