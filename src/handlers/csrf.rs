//! CSRF 토큰 발급 핸들러

use actix_web::{get, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::config::CsrfConfig;
use crate::security::CsrfGuard;

/// `GET /api/csrf-token`
///
/// 쿠키에 토큰이 있으면 그대로 돌려주고, 없으면 새로 만들어 쿠키에 설정합니다.
/// 클라이언트는 받은 값을 `x-csrf-token` 헤더로 보내야 합니다.
#[get("/csrf-token")]
pub async fn issue_csrf_token(req: HttpRequest, guard: web::Data<CsrfGuard>) -> HttpResponse {
    let existing = req.cookie(CsrfConfig::COOKIE_NAME).map(|cookie| cookie.value().to_string());
    let issued = guard.issue(existing.as_deref());

    let mut response = HttpResponse::Ok();
    if issued.is_new {
        log::debug!("🛡️ 새 CSRF 토큰 발급");
        response.cookie(guard.cookie(&issued.token));
    }

    response.json(json!({
        "success": true,
        "csrfToken": issued.token
    }))
}
