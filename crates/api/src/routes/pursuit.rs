use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/pursuits", post(handlers::pursuit::create_pursuit))
        .route("/api/pursuits/:id", get(handlers::pursuit::get_pursuit))
        .route(
            "/api/pursuits/:id/verify",
            post(handlers::pursuit::verify_password),
        )
}
