use crate::{auth::JwtKeys, config::AppConfig, services::store::Store};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Self {
        let jwt = JwtKeys::new(&config.jwt_secret);
        Self { config, store, jwt }
    }
}
