use axum::{extract::State, response::IntoResponse, routing::get, Form, Json, Router};
use serde_json::json;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::user::{UserChanges, UserForm},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(about).put(update))
}

async fn about(AuthUser(claims): AuthUser) -> String {
    format!("Welcome {}\n{}", claims.name, claims.email)
}

/// Applies the profile change under the address the presented token
/// carries, then answers with a token for the new identity. Privilege
/// flags and the expiry ride along untouched.
async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Form(form): Form<UserForm>,
) -> Result<impl IntoResponse, AppError> {
    let changes = UserChanges::from_form(&form);
    if changes.is_empty() {
        return Err(AppError::MissingFields);
    }
    state.store.update_user(&claims.email, &changes).await?;
    let token = state.jwt.sign(&claims.refreshed(&changes))?;
    Ok(Json(json!({ "jwt": token })))
}
