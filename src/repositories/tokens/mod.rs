//! 일회용 토큰 리포지토리 모듈
//!
//! 비밀번호 재설정 토큰을 Redis에 보관합니다.
//!
//! # Features
//!
//! - **해시 저장**: 원문 토큰 대신 SHA-256 다이제스트를 키로 사용
//! - **TTL 자동 관리**: Redis TTL을 통한 자동 만료 처리
//! - **일회성 소비**: `GETDEL`로 읽는 즉시 삭제
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::repositories::tokens::TokenRepository;
//!
//! let token_repo = TokenRepository::instance();
//! token_repo.store_reset_token(&raw_token, &user, 600).await?;
//! let info = token_repo.consume_reset_token(&raw_token).await?;
//! ```

pub mod token_repository;

pub use token_repository::*;
