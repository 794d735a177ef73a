//! # API routes
//!
//! Every resource lives under `/api/<resource>`. Handlers declare their own
//! authentication with the `wrap` attribute; the dashboard and admin scopes
//! are protected as a whole here.
//!
//! | Scope | Access |
//! |-------|--------|
//! | `/api/auth` | public, `GET /me` authenticated |
//! | `/api/users` | `/me*` authenticated, `/{id}` public |
//! | `/api/programs`, `/api/opportunities`, `/api/events`, `/api/posts`, `/api/reviews` | public reads, role-gated writes |
//! | `/api/applications` | authenticated |
//! | `/api/dashboard` | authenticated |
//! | `/api/admin` | admin |
//! | `/api/content` | public |
//!
//! Literal segments (`/me`, `/page/{page}`, `/opportunity/{id}`) are
//! registered before the `/{id}` resources of the same scope.

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::core::registry::ServiceLocator;
use crate::db::Database;
use crate::domain::entities::user::UserRole;
use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_program_routes)
            .configure(configure_opportunity_routes)
            .configure(configure_application_routes)
            .configure(configure_event_routes)
            .configure(configure_post_routes)
            .configure(configure_review_routes)
            .configure(configure_dashboard_routes)
            .configure(configure_admin_routes)
            .configure(configure_content_routes),
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::me),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(handlers::users::get_me)
            .service(handlers::users::update_me)
            .service(handlers::users::change_password)
            .service(handlers::users::get_public_profile),
    );
}

fn configure_program_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/programs")
            .service(handlers::programs::list_programs)
            .service(handlers::programs::create_program)
            .service(handlers::programs::enroll)
            .service(handlers::programs::participants)
            .service(handlers::programs::get_program)
            .service(handlers::programs::update_program)
            .service(handlers::programs::delete_program),
    );
}

fn configure_opportunity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/opportunities")
            .service(handlers::opportunities::list_opportunities)
            .service(handlers::opportunities::create_opportunity)
            .service(handlers::opportunities::apply)
            .service(handlers::opportunities::get_opportunity)
            .service(handlers::opportunities::update_opportunity)
            .service(handlers::opportunities::delete_opportunity),
    );
}

fn configure_application_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/applications")
            .service(handlers::applications::apply)
            .service(handlers::applications::my_applications)
            .service(handlers::applications::for_opportunity)
            .service(handlers::applications::update_status)
            .service(handlers::applications::withdraw)
            .service(handlers::applications::get_application),
    );
}

fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .service(handlers::events::list_events)
            .service(handlers::events::create_event)
            .service(handlers::events::register)
            .service(handlers::events::unregister)
            .service(handlers::events::get_event)
            .service(handlers::events::update_event)
            .service(handlers::events::delete_event),
    );
}

fn configure_post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(handlers::posts::list_posts)
            .service(handlers::posts::create_post)
            .service(handlers::posts::list_comments)
            .service(handlers::posts::create_comment)
            .service(handlers::posts::update_comment)
            .service(handlers::posts::delete_comment)
            .service(handlers::posts::like_comment)
            .service(handlers::posts::dislike_comment)
            .service(handlers::posts::publish_post)
            .service(handlers::posts::like_post)
            .service(handlers::posts::dislike_post)
            .service(handlers::posts::get_post)
            .service(handlers::posts::update_post)
            .service(handlers::posts::delete_post),
    );
}

fn configure_review_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .service(handlers::reviews::program_reviews)
            .service(handlers::reviews::create_review)
            .service(handlers::reviews::like_review)
            .service(handlers::reviews::dislike_review)
            .service(handlers::reviews::update_review)
            .service(handlers::reviews::delete_review),
    );
}

fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .wrap(AuthMiddleware::required())
            .service(handlers::dashboard::dashboard)
            .service(handlers::dashboard::get_progress)
            .service(handlers::dashboard::update_progress)
            .service(handlers::dashboard::enroll)
            .service(handlers::dashboard::select_opportunity)
            .service(handlers::dashboard::unselect_opportunity)
            .service(handlers::dashboard::achievements)
            .service(handlers::dashboard::recommendations),
    );
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
            .service(handlers::admin::stats)
            .service(handlers::admin::list_users)
            .service(handlers::admin::update_user_role)
            .service(handlers::admin::update_user_status)
            .service(handlers::admin::list_achievements)
            .service(handlers::admin::create_achievement)
            .service(handlers::admin::update_achievement)
            .service(handlers::admin::delete_achievement)
            .service(handlers::admin::list_content)
            .service(handlers::admin::create_content)
            .service(handlers::admin::update_content)
            .service(handlers::admin::delete_content),
    );
}

fn configure_content_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/content")
            .service(handlers::content::get_page)
            .service(handlers::content::get_by_key),
    );
}

/// Liveness plus a MongoDB round trip; 503 when the database is unreachable
#[get("/health")]
async fn health_check() -> HttpResponse {
    let database = ServiceLocator::get::<Database>();
    let timestamp = chrono::Utc::now().to_rfc3339();

    match database.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": timestamp,
            "database": "connected",
        })),
        Err(err) => {
            log::error!("health check: database ping failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "status": "unhealthy",
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": timestamp,
                "database": "disconnected",
            }))
        }
    }
}
