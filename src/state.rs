use crate::{config::Config, media::MediaClient};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub media: MediaClient,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let media = MediaClient::new(config.media.clone());
        Self {
            pool,
            config,
            media,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for MediaClient {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}
