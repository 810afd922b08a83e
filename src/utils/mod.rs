//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리, 입력 정화(serde 헬퍼 포함)
//! - [`random`] - CSRF/비밀번호 재설정용 무작위 토큰
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::sanitize_text;
//!
//! let safe = sanitize_text("  <b>Window seat</b> ");
//! ```

pub mod random;
pub mod string_utils;
