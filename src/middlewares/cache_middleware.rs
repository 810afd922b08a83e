//! 응답 캐시 미들웨어
//!
//! - `GET` 요청 중 제외 경로가 아닌 것만 캐시합니다. 응답에는 `X-Cache: HIT|MISS`가 붙습니다.
//! - 200 응답만 저장하며, 저장은 [`ResponseCache::begin_fill`]로 받은 티켓을 통해서만 합니다.
//! - 상태를 바꾸는 요청(`POST`, `PUT`, `PATCH`, `DELETE`)은 핸들러가 끝난 뒤
//!   설정된 패턴으로 캐시를 무효화합니다. 핸들러 실행 중 시작된 응답 저장은 세대 검사로 버려집니다.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::{self, BoxBody, EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::http::{Method, StatusCode};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::caching::{CacheKey, CachedResponse, ResponseCache};

pub const HEADER_CACHE: &str = "x-cache";

/// 사용자별 응답이거나 쿠키를 내려주는 경로 (부분 문자열 매칭)
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &["/api/bookings", "/api/auth", "/api/admin", "/api/csrf-token"];

/// 쓰기 요청 이후 비울 리소스 패턴. 예약은 여행의 잔여 좌석을 바꾸므로 함께 비웁니다.
pub const DEFAULT_INVALIDATION_PATTERNS: &[&str] = &["/api/trips", "/api/bookings"];

#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub excluded_paths: Vec<String>,
    pub invalidation_patterns: Vec<String>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
            invalidation_patterns: DEFAULT_INVALIDATION_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CachePolicy {
    pub fn is_cacheable(&self, method: &Method, path: &str) -> bool {
        *method == Method::GET && !self.excluded_paths.iter().any(|excluded| path.contains(excluded.as_str()))
    }

    pub fn is_write(method: &Method) -> bool {
        matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }
}

pub struct CacheMiddleware {
    cache: Arc<ResponseCache>,
    policy: Rc<CachePolicy>,
}

impl CacheMiddleware {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self::with_policy(cache, CachePolicy::default())
    }

    pub fn with_policy(cache: Arc<ResponseCache>, policy: CachePolicy) -> Self {
        Self { cache, policy: Rc::new(policy) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CacheMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Transform = CacheMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CacheMiddlewareService {
            service: Rc::new(service),
            cache: self.cache.clone(),
            policy: self.policy.clone(),
        }))
    }
}

pub struct CacheMiddlewareService<S> {
    service: Rc<S>,
    cache: Arc<ResponseCache>,
    policy: Rc<CachePolicy>,
}

impl<S, B> Service<ServiceRequest> for CacheMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let cache = self.cache.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let method = req.method().clone();

            if CachePolicy::is_write(&method) {
                let res = service.call(req).await;
                for pattern in &policy.invalidation_patterns {
                    cache.invalidate(pattern);
                }
                return res.map(|res| res.map_into_left_body());
            }

            if !policy.is_cacheable(&method, req.path()) {
                return service.call(req).await.map(|res| res.map_into_left_body());
            }

            let key = CacheKey::new(method.as_str(), req.path(), req.query_string());

            if let Some(hit) = cache.lookup_at(&key, chrono::Utc::now()) {
                log::debug!("💾 캐시 HIT: {}", key.canonical());
                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, replay(hit)).map_into_right_body());
            }

            log::debug!("💾 캐시 MISS: {}", key.canonical());
            let ticket = cache.begin_fill(key);
            let mut res = service.call(req).await?;

            if res.status() != StatusCode::OK {
                mark(res.headers_mut(), "MISS");
                return Ok(res.map_into_left_body());
            }

            let content_type = res
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            let (req, response) = res.into_parts();
            let (mut response, payload) = response.into_parts();
            let bytes = body::to_bytes(payload).await.map_err(|e| {
                let cause: Box<dyn std::error::Error> = e.into();
                actix_web::error::ErrorInternalServerError(cause.to_string())
            })?;

            cache.complete_fill(
                ticket,
                CachedResponse {
                    status: StatusCode::OK.as_u16(),
                    content_type,
                    body: bytes.clone(),
                },
            );

            mark(response.headers_mut(), "MISS");
            let response = response.set_body(bytes).map_into_boxed_body();
            Ok(ServiceResponse::new(req, response).map_into_right_body())
        })
    }
}

fn mark(headers: &mut header::HeaderMap, value: &'static str) {
    headers.insert(HeaderName::from_static(HEADER_CACHE), HeaderValue::from_static(value));
}

fn replay(hit: CachedResponse) -> HttpResponse {
    let status = StatusCode::from_u16(hit.status).unwrap_or(StatusCode::OK);
    let mut builder = HttpResponse::build(status);
    builder.insert_header((HEADER_CACHE, "HIT"));
    if let Some(content_type) = hit.content_type {
        builder.insert_header((header::CONTENT_TYPE, content_type));
    }
    builder.body(hit.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::{test, web, App};
    use futures_util::future::join;
    use tokio::sync::Notify;

    fn counting_app_data() -> web::Data<AtomicUsize> {
        web::Data::new(AtomicUsize::new(0))
    }

    async fn list_trips(calls: web::Data<AtomicUsize>) -> HttpResponse {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        HttpResponse::Ok().json(serde_json::json!({ "success": true, "call": n }))
    }

    async fn my_bookings(calls: web::Data<AtomicUsize>) -> HttpResponse {
        calls.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().json(serde_json::json!({ "success": true }))
    }

    async fn missing() -> HttpResponse {
        HttpResponse::NotFound().finish()
    }

    async fn create_booking() -> HttpResponse {
        HttpResponse::Created().finish()
    }

    macro_rules! app {
        ($cache:expr, $calls:expr) => {
            test::init_service(
                App::new()
                    .app_data($calls.clone())
                    .wrap(CacheMiddleware::new($cache.clone()))
                    .route("/api/trips", web::get().to(list_trips))
                    .route("/api/trips/missing", web::get().to(missing))
                    .route("/api/bookings/user/my-bookings", web::get().to(my_bookings))
                    .route("/api/bookings", web::post().to(create_booking)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_second_get_is_served_from_cache() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300)));
        let calls = counting_app_data();
        let app = app!(cache, calls);

        let first = test::call_service(&app, test::TestRequest::get().uri("/api/trips?b=2&a=1").to_request()).await;
        assert_eq!(first.headers().get(HEADER_CACHE).unwrap(), "MISS");
        let first_body = test::read_body(first).await;

        let second = test::call_service(&app, test::TestRequest::get().uri("/api/trips?a=1&b=2").to_request()).await;
        assert_eq!(second.headers().get(HEADER_CACHE).unwrap(), "HIT");
        assert_eq!(
            second.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(test::read_body(second).await, first_body);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_excluded_paths_and_errors_are_not_stored() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300)));
        let calls = counting_app_data();
        let app = app!(cache, calls);

        for _ in 0..2 {
            let res = test::call_service(
                &app,
                test::TestRequest::get().uri("/api/bookings/user/my-bookings").to_request(),
            )
            .await;
            assert!(res.headers().get(HEADER_CACHE).is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let not_found = test::call_service(&app, test::TestRequest::get().uri("/api/trips/missing").to_request()).await;
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(cache.size(), 0);
    }

    #[actix_web::test]
    async fn test_write_invalidates_cached_trips() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300)));
        let calls = counting_app_data();
        let app = app!(cache, calls);

        test::call_service(&app, test::TestRequest::get().uri("/api/trips").to_request()).await;
        assert_eq!(cache.size(), 1);

        let write = test::call_service(&app, test::TestRequest::post().uri("/api/bookings").to_request()).await;
        assert_eq!(write.status(), StatusCode::CREATED);
        assert_eq!(cache.size(), 0);

        let after = test::call_service(&app, test::TestRequest::get().uri("/api/trips").to_request()).await;
        assert_eq!(after.headers().get(HEADER_CACHE).unwrap(), "MISS");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    async fn trip_detail(seats: web::Data<AtomicUsize>, gate: web::Data<Notify>) -> HttpResponse {
        let current = seats.load(Ordering::SeqCst);
        gate.notified().await;
        HttpResponse::Ok().json(serde_json::json!({ "currentParticipants": current }))
    }

    async fn book_seat(seats: web::Data<AtomicUsize>) -> HttpResponse {
        seats.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Created().finish()
    }

    #[actix_web::test]
    async fn test_read_overtaken_by_booking_is_not_cached() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300)));
        let seats = counting_app_data();
        let gate = web::Data::new(Notify::new());
        let app = test::init_service(
            App::new()
                .app_data(seats.clone())
                .app_data(gate.clone())
                .wrap(CacheMiddleware::new(cache.clone()))
                .route("/api/trips/kyoto", web::get().to(trip_detail))
                .route("/api/bookings", web::post().to(book_seat)),
        )
        .await;

        // 조회가 좌석 수를 읽은 뒤 멈춘 사이에 예약이 커밋됨
        let read = test::call_service(&app, test::TestRequest::get().uri("/api/trips/kyoto").to_request());
        let write = async {
            let res = test::call_service(&app, test::TestRequest::post().uri("/api/bookings").to_request()).await;
            gate.notify_one();
            res
        };
        let (stale, written) = join(read, write).await;

        assert_eq!(written.status(), StatusCode::CREATED);
        let stale: serde_json::Value = test::read_body_json(stale).await;
        assert_eq!(stale["currentParticipants"], 0);
        assert_eq!(cache.size(), 0);

        gate.notify_one();
        let fresh = test::call_service(&app, test::TestRequest::get().uri("/api/trips/kyoto").to_request()).await;
        assert_eq!(fresh.headers().get(HEADER_CACHE).unwrap(), "MISS");
        let fresh: serde_json::Value = test::read_body_json(fresh).await;
        assert_eq!(fresh["currentParticipants"], 1);
    }
}
