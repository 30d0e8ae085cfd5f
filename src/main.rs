use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use refrel_service::{
    api::{self, AppState},
    config::Config,
    database,
    middleware,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Refrel Service...");
    log::info!("📊 Database: {}", config.redacted_mongodb_uri());
    if config.demo_mode {
        log::info!("🎭 Demo mode ON: empty results fall back to sample data");
    }

    let db = database::MongoDB::new(&config.mongodb_uri)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Unreachable database is not fatal, requests will report it
    match db.ping().await {
        Ok(()) => {
            log::info!("✅ MongoDB connected successfully");
            if let Err(e) = db.ensure_indexes().await {
                log::error!("❌ Index setup failed: {}", e);
            }
        }
        Err(e) => log::error!("❌ MongoDB connection error: {}", e),
    }

    let state = web::Data::new(AppState::new(Arc::new(db.user_store()), config.demo_mode));

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    let frontend_url = config.frontend_url.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(api::cors(&frontend_url))
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
