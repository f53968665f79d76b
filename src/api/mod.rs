mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        // Notes
        .route("/notes", get(handlers::list_notes))
        .route("/notes", post(handlers::create_note))
        .route("/notes/{id}", put(handlers::update_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        // Timer
        .route("/timer", get(handlers::get_timer))
        .route("/timer/start", post(handlers::start_timer))
        .route("/timer/pause", post(handlers::pause_timer))
        .route("/timer/reset", post(handlers::reset_timer))
        .route("/timer/skip", post(handlers::skip_timer))
        .route("/timer/settings", put(handlers::update_timer_settings))
        // Chat
        .route("/chat", get(handlers::get_transcript))
        .route("/chat", post(handlers::send_message))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
