//! JWT 토큰 관리 서비스 구현
//!
//! HS256으로 서명되는 단일 액세스 토큰을 발급하고 검증합니다.
//! 토큰은 `Authorization: Bearer` 헤더 또는 `token` 쿠키로 전달됩니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    core::errors::{AppError, ErrorContext},
    domain::entities::users::User,
    domain::models::token::TokenClaims,
};

/// 인증 쿠키 이름
pub const AUTH_COOKIE_NAME: &str = "token";

#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 사용자 ID와 역할을 담은 액세스 토큰 생성
    ///
    /// 만료 시간은 `JWT_EXPIRATION_HOURS`(기본 24시간)입니다.
    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(JwtConfig::expiration_hours());

        let claims = TokenClaims {
            sub: user.id_string().ok_or_else(|| {
                AppError::InternalError("사용자 ID가 없습니다".to_string())
            })?,
            role: user.role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode_claims(&claims, &JwtConfig::secret())
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_claims(token, &JwtConfig::secret())
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))
    }
}

fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String, AppError> {
    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), claims, &encoding_key)
        .context("JWT 토큰 생성 실패")
}

fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    decode::<TokenClaims>(token, &decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            }
            _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
        })
}
