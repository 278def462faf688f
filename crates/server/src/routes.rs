use axum::{
    routing::{get, post},
    Json, Router,
};
use axum::middleware;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod auth;
pub mod places;
pub mod users;

use crate::routes::auth::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, token-gated place
/// mutations, user signup/login, and static serving of stored uploads.
pub fn build_router(state: ServerState, cors: CorsLayer, uploads_dir: &str) -> Router {
    // Public place reads
    let public_places = Router::new()
        .route("/places/:place_id", get(places::get_by_id))
        .route("/places/user/:user_id", get(places::list_by_user));

    // Mutating place routes sit behind the bearer-token gate
    let protected_places = Router::new()
        .route("/places", post(places::create))
        .route(
            "/places/:place_id",
            axum::routing::patch(places::update).delete(places::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    // User routes are public; signup/login issue the tokens the gate checks
    let user_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login));

    // Compose
    Router::new()
        .route("/health", get(health))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(public_places)
        .merge(protected_places)
        .merge(user_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
