use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};
use serde_json::json;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::destination::{DestinationForm, NewDestination},
    models::trip::parse_uuid,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id/trips", get(trips))
}

async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let destinations = state.store.list_destinations().await?;
    if destinations.is_empty() {
        return Err(AppError::EmptyList("destinations"));
    }
    Ok(Json(json!({ "data": destinations })))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Form(form): Form<DestinationForm>,
) -> Result<impl IntoResponse, AppError> {
    let destination = NewDestination::from_form(&form)?;
    state.store.create_destination(&destination).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": destination.id.to_string(),
            "message": "destination has been added",
        })),
    ))
}

async fn trips(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "destination id")?;
    let trips = state.store.trips_by_destination(&id).await?;
    if trips.is_empty() {
        return Err(AppError::EmptyList("trips"));
    }
    Ok(Json(json!({ "data": trips })))
}
