//! 요청 형성 관리자 핸들러 (`/api/admin`, 관리자 전용)

use actix_web::{delete, get, web, HttpResponse};
use serde_json::json;

use crate::caching::ResponseCache;

#[get("/cache/stats")]
pub async fn cache_stats(cache: web::Data<ResponseCache>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "size": cache.size(),
            "ttlSeconds": cache.default_ttl().num_seconds()
        }
    }))
}

#[delete("/cache")]
pub async fn clear_cache(cache: web::Data<ResponseCache>) -> HttpResponse {
    cache.clear();

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Cache cleared successfully"
    }))
}
