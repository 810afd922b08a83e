//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB 문서 (User, Trip, Booking, Notification)
//! ├── dto       - API 요청/응답 계약
//! └── models    - 요청 범위 모델 (인증 컨텍스트, JWT 클레임)
//! ```
//!
//! 엔티티는 저장 형식을, DTO는 API 형식을 책임집니다. 두 형식이 다를 때
//! (`ObjectId` → hex 문자열, bson 날짜 → RFC 3339) 변환은 `From` 구현으로 표현합니다.

pub mod dto;
pub mod entities;
pub mod models;
