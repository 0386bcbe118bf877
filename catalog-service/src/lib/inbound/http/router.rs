use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_user::delete_user;
use super::handlers::favorites::add_favorite;
use super::handlers::favorites::list_favorites;
use super::handlers::favorites::remove_favorite;
use super::handlers::get_director::get_director;
use super::handlers::get_genre::get_genre;
use super::handlers::get_movie::get_movie;
use super::handlers::get_user::get_user;
use super::handlers::list_movies::list_movies;
use super::handlers::login::login;
use super::handlers::register_user::register_user;
use super::handlers::search_movies::search_movies;
use super::handlers::search_movies::search_titles;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::movie::ports::MovieServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub movie_service: Arc<dyn MovieServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    movie_service: Arc<dyn MovieServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        movie_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/users", post(register_user));

    let protected_routes = Router::new()
        .route("/api/movies", get(list_movies))
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/titles", get(search_titles))
        .route("/api/movies/:title", get(get_movie))
        .route("/api/genres/:name", get(get_genre))
        .route("/api/directors/:name", get(get_director))
        .route(
            "/api/users/:username",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/:username/favorites", get(list_favorites))
        .route(
            "/api/users/:username/favorites/:movie_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
