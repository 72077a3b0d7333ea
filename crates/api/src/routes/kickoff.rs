use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/pursuits/:id/kickoff/ranking",
            get(handlers::kickoff::get_ranking),
        )
        .route(
            "/api/pursuits/:id/kickoff",
            post(handlers::kickoff::schedule_kickoff),
        )
}
