pub mod health;
pub mod leaderboard;
pub mod metrics;
pub mod swagger;
pub mod users;

use crate::store::UserStore;
use crate::utils::AppError;
use actix_cors::Cors;
use actix_web::{http::header, web};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared by every handler through `web::Data`
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub demo_mode: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, demo_mode: bool) -> Self {
        Self { store, demo_mode }
    }
}

/// Malformed JSON bodies answer with the same `{ "error": ... }` shape as
/// every other client error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into())
}

/// Browser access is limited to the one configured frontend origin.
pub fn cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .supports_credentials()
        .max_age(3600)
}

/// Registers every route; shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", swagger::ApiDoc::openapi()),
        )
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api")
                .route("/user", web::get().to(users::get_default_user))
                .route("/user", web::post().to(users::create_user))
                .route("/user/{code}", web::get().to(users::get_user))
                .route("/user/{code}/donate", web::put().to(users::donate))
                .route("/users", web::get().to(users::list_users))
                .route("/leaderboard", web::get().to(leaderboard::get_leaderboard)),
        );
}
