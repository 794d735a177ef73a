//! Youth Hub API server.
//!
//! Loads the profile's `.env` file, connects MongoDB and Redis, bootstraps
//! the singleton registry, prepares indexes and default achievements, then
//! serves the REST API with rate limiting, CORS and request logging.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpRequest, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use youth_hub_backend::caching::redis::RedisClient;
use youth_hub_backend::config::{CorsConfig, Environment, RateLimitConfig, ServerConfig};
use youth_hub_backend::core::errors::AppError;
use youth_hub_backend::core::registry::ServiceLocator;
use youth_hub_backend::db::Database;
use youth_hub_backend::repositories::community::comment_repo::CommentRepository;
use youth_hub_backend::repositories::community::event_repo::EventRepository;
use youth_hub_backend::repositories::community::post_repo::PostRepository;
use youth_hub_backend::repositories::content::content_repo::ContentRepository;
use youth_hub_backend::repositories::opportunities::application_repo::ApplicationRepository;
use youth_hub_backend::repositories::opportunities::opportunity_repo::OpportunityRepository;
use youth_hub_backend::repositories::programs::program_repo::ProgramRepository;
use youth_hub_backend::repositories::programs::review_repo::ReviewRepository;
use youth_hub_backend::repositories::progress::achievement_repo::AchievementRepository;
use youth_hub_backend::repositories::progress::user_progress_repo::UserProgressRepository;
use youth_hub_backend::repositories::users::user_repo::UserRepository;
use youth_hub_backend::routes::configure_all_routes;
use youth_hub_backend::services::progress::achievement_service::AchievementService;
use youth_hub_backend::utils::display_terminal::print_startup_banner;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Starting Youth Hub API...");

    let (database, redis_client) = initialize_data_stores().await;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .expect("service registry bootstrap failed");

    if let Err(err) = create_indexes().await {
        error!("❌ Index creation failed: {}", err);
        return Err(std::io::Error::other(err.to_string()));
    }

    match AchievementService::instance().seed_defaults().await {
        Ok(0) => info!("🏅 Achievements already present, seeding skipped"),
        Ok(count) => info!("🏅 Seeded {} default achievements", count),
        Err(err) => warn!("⚠️ Default achievements not seeded: {}", err),
    }

    start_http_server().await
}

async fn start_http_server() -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();
    let environment = Environment::current();

    let rate_limit = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("invalid rate limit configuration"))?;

    info!(
        "🛡️ Rate limiting: {} req/s, burst {}",
        rate_limit.per_second, rate_limit.burst_size
    );

    print_startup_banner(&bind_address, environment.as_str());

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(web::JsonConfig::default().limit(1 << 20).error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// `PROFILE=dev` → `.env.dev`, `PROFILE=prod` → `.env.prod`, otherwise `.env`
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ".env.prod"),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ".env.dev"),
        _ => dotenv().map(|_| ".env"),
    };

    // Logger is not up yet
    match loaded {
        Ok(file) => println!("profile '{}': loaded {}", profile, file),
        Err(err) => eprintln!("profile '{}': no env file loaded ({})", profile, err),
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

async fn initialize_data_stores() -> (Arc<Database>, Arc<RedisClient>) {
    info!("📡 Connecting data stores...");

    let database = Arc::new(Database::new().await.expect("MongoDB connection failed"));
    let redis_client = Arc::new(RedisClient::new().await.expect("Redis connection failed"));

    info!("✅ MongoDB and Redis connected");
    (database, redis_client)
}

/// Unique and query indexes for every collection
async fn create_indexes() -> Result<(), AppError> {
    UserRepository::instance().create_indexes().await?;
    ProgramRepository::instance().create_indexes().await?;
    ReviewRepository::instance().create_indexes().await?;
    OpportunityRepository::instance().create_indexes().await?;
    ApplicationRepository::instance().create_indexes().await?;
    EventRepository::instance().create_indexes().await?;
    PostRepository::instance().create_indexes().await?;
    CommentRepository::instance().create_indexes().await?;
    AchievementRepository::instance().create_indexes().await?;
    UserProgressRepository::instance().create_indexes().await?;
    ContentRepository::instance().create_indexes().await?;

    info!("🗂️ Indexes ready");
    Ok(())
}

fn configure_cors() -> Cors {
    let cors = CorsConfig::allowed_origins()
        .into_iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(&origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "حجم البيانات المرسلة كبير جداً".to_string()
        }
        JsonPayloadError::ContentType => "يجب إرسال البيانات بصيغة JSON".to_string(),
        other => format!("بيانات غير صالحة: {}", other),
    };
    AppError::ValidationError(message).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("معاملات الاستعلام غير صالحة: {}", err)).into()
}

fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_id().into()
}
