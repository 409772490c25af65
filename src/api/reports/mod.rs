mod handlers;

use axum::{routing::get, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route(
        "/:activity_id/report",
        get(handlers::view_report).post(handlers::submit_report),
    )
}

#[cfg(test)]
mod tests;
