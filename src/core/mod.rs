//! # Core Framework Module
//!
//! 백엔드 전역에서 공유하는 프레임워크 기능입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입별 싱글톤 인스턴스 보관 및 지연 생성
//! - **Service / Repository**: `singleton_macro`가 구현하는 공통 트레이트
//! - `inventory` 기반 등록 정보 수집
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 모든 계층이 공유하는 에러 타입
//! - HTTP 상태 코드 자동 매핑 (`actix_web::ResponseError`)
//! - **ErrorContext**: 외부 에러에 문맥 추가
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use singleton_macro::service;
//! use crate::core::errors::AppResult;
//!
//! #[service(name = "trip")]
//! pub struct TripService {
//!     trip_repo: Arc<TripRepository>,
//! }
//!
//! // 어디서든 같은 인스턴스
//! let trips = TripService::instance().list_active().await?;
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
