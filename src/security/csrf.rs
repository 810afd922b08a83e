//! # CSRF 가드 (이중 제출 쿠키)
//!
//! 서버가 발급한 무작위 토큰을 httpOnly 쿠키와 응답 본문으로 동시에 내려주고,
//! 상태를 바꾸는 요청에서는 쿠키 값과 `x-csrf-token` 헤더 값이 바이트 단위로 같은지 확인합니다.
//!
//! 검증을 건너뛰는 경우:
//! - 안전한 메서드 (GET, HEAD, OPTIONS)
//! - 공개 쓰기 엔드포인트 허용 목록 (회원가입, 로그인, 비밀번호 재설정 요청/확정, 이메일 인증)

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};

use crate::config::CsrfConfig;
use crate::core::errors::AppError;
use crate::utils::random::random_url_safe_token;

/// 토큰 없이 호출할 수 있는 공개 쓰기 엔드포인트 (접두어 매칭)
pub const CSRF_EXEMPT_PATHS: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
    "/api/auth/verify-email",
];

/// 발급 결과. `is_new`이면 쿠키를 새로 설정해야 합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub is_new: bool,
}

#[derive(Debug, Clone)]
pub struct CsrfGuard {
    exempt_paths: Vec<String>,
    secure_cookie: bool,
}

impl Default for CsrfGuard {
    fn default() -> Self {
        Self::new(CSRF_EXEMPT_PATHS.iter().map(|p| p.to_string()).collect(), CsrfConfig::secure_cookie())
    }
}

impl CsrfGuard {
    pub fn new(exempt_paths: Vec<String>, secure_cookie: bool) -> Self {
        Self { exempt_paths, secure_cookie }
    }

    /// 32바이트 난수를 URL-safe base64로 인코딩한 새 토큰
    pub fn generate_token() -> String {
        random_url_safe_token()
    }

    /// 기존 토큰이 있으면 그대로, 없으면 새로 만듭니다.
    pub fn issue(&self, existing: Option<&str>) -> IssuedToken {
        match existing.filter(|token| !token.is_empty()) {
            Some(token) => IssuedToken { token: token.to_string(), is_new: false },
            None => IssuedToken { token: Self::generate_token(), is_new: true },
        }
    }

    /// `SameSite=Strict`, httpOnly, 24시간 쿠키
    pub fn cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build(CsrfConfig::COOKIE_NAME, token.to_string())
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Strict)
            .max_age(CookieDuration::hours(CsrfConfig::MAX_AGE_HOURS))
            .finish()
    }

    pub fn requires_verification(&self, method: &str, path: &str) -> bool {
        let safe_method = matches!(method.to_ascii_uppercase().as_str(), "GET" | "HEAD" | "OPTIONS");
        let exempt = self.exempt_paths.iter().any(|prefix| path.starts_with(prefix.as_str()));
        !safe_method && !exempt
    }

    pub fn verify(
        &self,
        cookie_token: Option<&str>,
        header_token: Option<&str>,
        method: &str,
        path: &str,
    ) -> Result<(), AppError> {
        if !self.requires_verification(method, path) {
            return Ok(());
        }

        let cookie_token = cookie_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::CsrfError("CSRF token not found in cookie".to_string()))?;

        let header_token = header_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::CsrfError("CSRF token not found in request header".to_string()))?;

        if cookie_token.as_bytes() != header_token.as_bytes() {
            return Err(AppError::CsrfError("Invalid CSRF token".to_string()));
        }

        Ok(())
    }
}
