pub mod destination;
pub mod public;
pub mod trip;
pub mod user;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Result<Router, AppError> {
    let origin = state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|_| {
            AppError::Config(format!(
                "invalid allowed origin: {}",
                state.config.allowed_origin
            ))
        })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(Router::new()
        .merge(public::router())
        .nest("/trips", trip::router())
        .nest("/destinations", destination::router())
        .nest("/user", user::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
