use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use crate::{
    auth::{self, Claims},
    error::AppError,
    models::submitted,
    models::user::{LoginForm, NewUser, RegisterForm},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn ping() -> &'static str {
    "pong"
}

async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = NewUser::from_form(&form)?;
    if state.store.find_user(&new_user.email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }
    let password_hash = auth::hash_password(&new_user.password)?;
    state.store.create_user(&new_user, &password_hash).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "user has been created" })),
    ))
}

/// Wrong address and wrong password read the same from outside, so a
/// caller cannot probe which addresses are registered.
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (submitted(&form.email), submitted(&form.password))
    else {
        return Err(AppError::MissingFields);
    };
    let Some(user) = state.store.find_user(&email.to_lowercase()).await? else {
        return Err(AppError::Unauthorized);
    };
    if !auth::verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }
    let token = state.jwt.sign(&Claims::issue(&user))?;
    Ok(Json(json!({ "jwt": token })))
}
