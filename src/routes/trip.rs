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
    models::trip::{parse_uuid, NewTrip, TripChanges, TripForm},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.store.list_trips().await?;
    if trips.is_empty() {
        return Err(AppError::EmptyList("trips"));
    }
    Ok(Json(json!({ "data": trips })))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "trip id")?;
    let trip = state.store.get_trip(&id).await?;
    Ok(Json(json!({ "data": trip })))
}

async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Form(form): Form<TripForm>,
) -> Result<impl IntoResponse, AppError> {
    let trip = NewTrip::from_form(&form)?;
    state.store.create_trip(&trip).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": trip.id.to_string(),
            "message": "trip has been added",
        })),
    ))
}

async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<TripForm>,
) -> Result<impl IntoResponse, AppError> {
    let changes = TripChanges::from_form(&form)?;
    if changes.is_empty() {
        return Err(AppError::MissingFields);
    }
    let id = parse_uuid(&id, "trip id")?;
    state.store.update_trip(&id, &changes).await?;
    Ok(Json(json!({
        "id": id.to_string(),
        "message": "trip has been updated",
    })))
}

async fn remove(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_uuid(&id, "trip id")?;
    state.store.delete_trip(&id).await?;
    Ok(Json(json!({
        "id": id.to_string(),
        "message": "trip has been deleted",
    })))
}
