//! 고정 윈도우 요청 제한 미들웨어
//!
//! [`FixedWindowRateLimiter`] 하나를 감싸 스코프 단위로 적용합니다.
//! 허용/차단 여부와 관계없이 `X-RateLimit-*` 헤더를 붙이고,
//! 차단 시 429와 `Retry-After`를 반환합니다.
//!
//! 버킷 키의 클라이언트 주소는 소켓 피어 IP입니다. 프록시 헤더는 `TRUST_PROXY`가 켜졌을 때만 봅니다.
//!
//! ```rust,ignore
//! let auth_limiter = Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy::auth()));
//!
//! web::scope("/api/auth")
//!     .wrap(RateLimitMiddleware::new(auth_limiter.clone()))
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{Error, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::config::ServerConfig;
use crate::core::AppError;
use crate::security::{FixedWindowRateLimiter, RateLimitDecision};

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

pub struct RateLimitMiddleware {
    limiter: Arc<FixedWindowRateLimiter>,
    trust_proxy: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<FixedWindowRateLimiter>) -> Self {
        Self {
            limiter,
            trust_proxy: ServerConfig::trust_proxy(),
        }
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_proxy: self.trust_proxy,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<FixedWindowRateLimiter>,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let trust_proxy = self.trust_proxy;

        Box::pin(async move {
            let client_address = client_address(&req, trust_proxy);
            let policy = limiter.policy();
            let key = policy.bucket_key(&client_address, req.path());
            let decision = limiter.check(&key);

            if !decision.allowed {
                log::warn!(
                    "🚦 요청 제한 초과 [{}]: key={}, {}초 후 재시도",
                    policy.name, key, decision.retry_after_secs
                );

                let err = AppError::RateLimitExceeded {
                    message: policy.message.to_string(),
                    retry_after_secs: decision.retry_after_secs,
                };
                let mut response = err.error_response();
                apply_headers(response.headers_mut(), &decision);

                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            apply_headers(res.headers_mut(), &decision);
            Ok(res.map_into_left_body())
        })
    }
}

/// 버킷 키에 쓰는 클라이언트 주소
///
/// 클라이언트가 임의로 채울 수 있는 프록시 헤더는 `trust_proxy`일 때만 인정합니다.
fn client_address(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        let info = req.connection_info();
        // 프록시 헤더가 없으면 realip는 `ip:port` 형태의 peer 주소와 같음
        if let Some(forwarded) = info.realip_remote_addr().filter(|real| Some(*real) != info.peer_addr()) {
            return forwarded.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let values = [
        (HEADER_LIMIT, decision.limit.to_string()),
        (HEADER_REMAINING, decision.remaining.to_string()),
        (HEADER_RESET, decision.reset_at.timestamp().to_string()),
    ];

    for (name, value) in values {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App, HttpResponse};
    use chrono::TimeDelta;

    use crate::security::{RateLimitKey, RateLimitPolicy};

    fn limiter(max_requests: u32, key: RateLimitKey) -> Arc<FixedWindowRateLimiter> {
        Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy {
            name: "test",
            window: TimeDelta::seconds(60),
            max_requests,
            message: "Too many requests, slow down.",
            key,
        }))
    }

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_blocks_after_max_requests() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(2, RateLimitKey::ClientAddress)))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        for remaining in ["1", "0"] {
            let req = test::TestRequest::get()
                .uri("/api/trips")
                .peer_addr("10.0.0.1:5000".parse().unwrap())
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.headers().get(HEADER_REMAINING).unwrap(), remaining);
            assert_eq!(res.headers().get(HEADER_LIMIT).unwrap(), "2");
        }

        let req = test::TestRequest::get()
            .uri("/api/trips")
            .peer_addr("10.0.0.1:5000".parse().unwrap())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        let retry_after: u64 = res
            .headers()
            .get(header::RETRY_AFTER)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(retry_after >= 1);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Too many requests, slow down.");
    }

    #[actix_web::test]
    async fn test_clients_are_counted_separately() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::ClientAddress)))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        for addr in ["10.0.0.1:1", "10.0.0.2:1"] {
            let req = test::TestRequest::get()
                .uri("/api/trips")
                .peer_addr(addr.parse().unwrap())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_address_and_path_policy_separates_endpoints() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::AddressAndPath)))
                .route("/api/auth/login", web::post().to(ok))
                .route("/api/auth/register", web::post().to(ok)),
        )
        .await;

        let login = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.0.0.1:1".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, login).await.status(), StatusCode::OK);

        let register = test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr("10.0.0.1:1".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, register).await.status(), StatusCode::OK);

        let login_again = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.0.0.1:1".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, login_again).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_rotating_forwarded_for_shares_the_peer_bucket() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::ClientAddress)).with_trust_proxy(false))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        let mut statuses = Vec::new();
        for i in 0..5 {
            let req = test::TestRequest::get()
                .uri("/api/trips")
                .peer_addr("10.0.0.1:40000".parse().unwrap())
                .insert_header(("x-forwarded-for", format!("1.2.3.{}", i)))
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }

        assert_eq!(statuses[0], StatusCode::OK);
        assert!(statuses[1..].iter().all(|status| *status == StatusCode::TOO_MANY_REQUESTS));
    }

    #[actix_web::test]
    async fn test_peer_port_does_not_split_buckets() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::ClientAddress)).with_trust_proxy(false))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        let first = test::TestRequest::get().uri("/api/trips").peer_addr("10.0.0.1:1".parse().unwrap()).to_request();
        assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

        let second = test::TestRequest::get().uri("/api/trips").peer_addr("10.0.0.1:2".parse().unwrap()).to_request();
        assert_eq!(test::call_service(&app, second).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_trusted_proxy_keys_on_forwarded_client() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::ClientAddress)).with_trust_proxy(true))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        for client in ["203.0.113.7", "203.0.113.8"] {
            let req = test::TestRequest::get()
                .uri("/api/trips")
                .peer_addr("10.0.0.254:1".parse().unwrap())
                .insert_header(("x-forwarded-for", client))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_trusted_proxy_without_forwarding_header_uses_peer_ip() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter(1, RateLimitKey::ClientAddress)).with_trust_proxy(true))
                .route("/api/trips", web::get().to(ok)),
        )
        .await;

        let first = test::TestRequest::get().uri("/api/trips").peer_addr("10.0.0.9:1".parse().unwrap()).to_request();
        assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

        let second = test::TestRequest::get().uri("/api/trips").peer_addr("10.0.0.9:2".parse().unwrap()).to_request();
        assert_eq!(test::call_service(&app, second).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
