//! Enrollment Session API 模块

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::start))
        .route("/{id}", get(handler::get_by_id).delete(handler::discard))
        .route("/{id}/details", post(handler::submit_details))
        .route("/{id}/method", post(handler::choose_method))
        .route("/{id}/transferred", post(handler::confirm_transferred))
        .route("/{id}/back", post(handler::back))
        .route("/{id}/proof", post(handler::attach_proof))
        .route("/{id}/submit", post(handler::submit_proof))
        .route("/{id}/restart", post(handler::restart))
}
