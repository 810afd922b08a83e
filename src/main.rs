//! 여행사 예약 백엔드 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! MongoDB, Redis 연결을 설정하고 요청 형성 상태(응답 캐시, 요청 제한기)를 만든 뒤
//! 예약/여행/인증 REST API를 제공합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use travel_agency_backend::caching::redis::RedisClient;
use travel_agency_backend::config::{BurstGuardConfig, CacheConfig, CsrfConfig, ServerConfig};
use travel_agency_backend::core::registry::ServiceLocator;
use travel_agency_backend::db::Database;
use travel_agency_backend::repositories::{
    bookings::BookingRepository, notifications::NotificationRepository, trips::TripRepository,
    users::UserRepository,
};
use travel_agency_backend::routes::configure_all_routes;
use travel_agency_backend::security::RequestShaping;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 여행사 예약 서비스 시작중...");

    // 데이터 스토어 초기화
    let (database, redis_client) = initialize_data_stores().await?;

    // ServiceLocator에 핵심 서비스 등록
    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    // 모든 서비스 초기화
    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    ensure_indexes().await;

    // 요청 형성 상태는 프로세스당 하나
    let shaping = RequestShaping::new(CacheConfig::ttl());
    match CacheConfig::sweep_interval() {
        Some(interval) => {
            shaping.spawn_sweeper(interval);
            info!("🧹 만료 항목 정리 주기: {}초", interval.as_secs());
        }
        None => warn!("⚠️ 만료 항목 백그라운드 정리가 비활성화되었습니다"),
    }

    // HTTP 서버 시작
    start_http_server(shaping).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 전역 버스트 가드(Governor), CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
/// 정책별 요청 제한, CSRF, 응답 캐시는 `/api` 스코프에서 [`configure_all_routes`]가 배치합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패, Governor 설정 오류 또는 서버 실행 오류
async fn start_http_server(shaping: RequestShaping) -> io::Result<()> {
    let host = ServerConfig::host();
    let port = ServerConfig::port();

    info!("🌐 서버가 http://{}:{} 에서 실행중입니다", host, port);
    info!("📍 Health check: http://{}:{}/health", host, port);
    info!("📍 API: http://{}:{}/api", host, port);

    let per_second = BurstGuardConfig::per_second();
    let burst_size = BurstGuardConfig::burst_size();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!("🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개", per_second, burst_size);

    HttpServer::new(move || {
        // CORS 설정
        let cors = configure_cors();

        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))

            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())

            // 라우트 설정
            .configure(|cfg| configure_all_routes(cfg, &shaping))
    })
        .bind((host.as_str(), port))?
        .workers(ServerConfig::workers())
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// # 예약 서비스만 debug
/// RUST_LOG=travel_agency_backend::services::bookings=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// 연결에 실패하면 `io::Error`로 변환해 서버 시작을 중단합니다.
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// 컬렉션 인덱스를 생성합니다. 실패는 기록만 하고 시작을 계속합니다.
async fn ensure_indexes() {
    if let Err(e) = UserRepository::instance().create_indexes().await {
        error!("❌ users 인덱스 생성 실패: {}", e);
    }
    if let Err(e) = TripRepository::instance().create_indexes().await {
        error!("❌ trips 인덱스 생성 실패: {}", e);
    }
    if let Err(e) = BookingRepository::instance().create_indexes().await {
        error!("❌ bookings 인덱스 생성 실패: {}", e);
    }
    if let Err(e) = NotificationRepository::instance().create_indexes().await {
        error!("❌ notifications 인덱스 생성 실패: {}", e);
    }
}

/// CORS 설정을 구성합니다
///
/// `CORS_ORIGIN`(기본값 `http://localhost:3000`) 하나만 허용하고,
/// CSRF 토큰 헤더와 쿠키 전송을 허용합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin(&ServerConfig::cors_origin())
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static(CsrfConfig::HEADER_NAME),
        ])
        .expose_headers(vec![
            HeaderName::from_static("x-cache"),
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
            header::RETRY_AFTER,
        ])
        // 자격 증명(쿠키 등) 지원
        .supports_credentials()
        .max_age(3600)
}
