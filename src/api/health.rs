use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "refrel-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{app_state, read_json, test_app};
    use crate::store::MemoryUserStore;
    use actix_web::test;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_service() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(res.status().is_success());

        let body: HealthResponse = read_json(res).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "refrel-service");
    }
}
