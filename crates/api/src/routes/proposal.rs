use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/pursuits/:id/proposals",
            put(handlers::proposal::submit_proposal),
        )
        .route(
            "/api/pursuits/:id/proposals",
            get(handlers::proposal::get_proposals),
        )
}
