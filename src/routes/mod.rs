use axum::Router;

use crate::Config;

mod forecasts;
mod health;
mod tomorrow;

// ---

pub fn router(config: Config) -> Router {
    // ---
    Router::new()
        .merge(forecasts::router())
        .merge(tomorrow::router())
        .merge(health::router())
        .with_state(config)
}
