//! # Configuration Module
//!
//! 환경 변수 기반 설정값을 중앙에서 관리합니다.
//! 모든 설정은 정적 접근자를 가진 단위 구조체로 표현하며, 기본값은 개발 환경 기준입니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, MongoDB, Redis, 예약 트랜잭션 설정
//! - [`security_config`] - JWT, 버스트 가드, 응답 캐시, CSRF 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{Environment, ServerConfig, CacheConfig};
//!
//! let env = Environment::current();
//! let bind = (ServerConfig::host(), ServerConfig::port());
//! let ttl = CacheConfig::ttl();
//! ```
//!
//! ## 환경 파일
//!
//! `PROFILE` 환경 변수에 따라 `main`에서 읽어들입니다.
//!
//! | PROFILE | 파일 |
//! |---------|------|
//! | `dev` | `.env.dev` |
//! | `prod` | `.env.prod` |
//! | 그 외 | `.env` |

pub mod data_config;
pub mod security_config;

pub use data_config::*;
pub use security_config::*;
