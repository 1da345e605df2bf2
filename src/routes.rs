//! Centralized route configuration for the studyhive API.
//!
//! This module provides a shared function to configure all application routes,
//! allowing both the main server and test servers to use the same routing setup.

use crate::handlers::{main_handlers, qa_handlers, reply_handlers, user_handlers};
use crate::middleware::AuthenticationMiddleware;
use actix_web::web;

/// Configures all application routes under `/api`.
///
/// The authentication middleware wraps the whole scope; it lets the health
/// check and the register/login endpoints through without a token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let api_scope = web::scope("/api")
        .wrap(AuthenticationMiddleware)
        // Public endpoints (no auth required)
        .route("/health", web::get().to(main_handlers::health_check))
        .route("/auth/register", web::post().to(user_handlers::register))
        .route("/auth/login", web::post().to(user_handlers::login))
        .route("/auth/me", web::get().to(user_handlers::me))
        // Q&A browse/search endpoints
        .route("/stats", web::get().to(qa_handlers::get_stats))
        .route("/search", web::get().to(qa_handlers::search_qa))
        .route("/all", web::get().to(qa_handlers::get_all_qa))
        .route("/categories", web::get().to(qa_handlers::get_categories))
        .route("/qa", web::post().to(qa_handlers::add_qa))
        // AI answer endpoints
        .route("/ai/ask", web::post().to(qa_handlers::ask_ai))
        .route("/ai/save", web::post().to(qa_handlers::save_ai_qa))
        .route(
            "/category-tools/{category}",
            web::get().to(qa_handlers::get_category_tools),
        )
        // Reply endpoints
        .route("/replies", web::post().to(reply_handlers::add_reply))
        .route(
            "/replies/{qa_id}",
            web::get().to(reply_handlers::get_replies),
        )
        .route(
            "/replies/{id}/helpful",
            web::post().to(reply_handlers::toggle_helpful),
        )
        .route(
            "/replies/{id}",
            web::put().to(reply_handlers::update_reply),
        )
        .route(
            "/replies/{id}",
            web::delete().to(reply_handlers::delete_reply),
        );

    cfg.service(api_scope);
}
