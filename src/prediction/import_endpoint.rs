//! Defines the endpoint the external prediction service pushes snapshots to.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, timezone::current_local_date};

use super::core::save_snapshot;

/// The state needed to import a prediction snapshot.
#[derive(Debug, Clone)]
pub struct ImportPredictionsState {
    /// The database connection for storing the snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ImportPredictionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that replaces the stored prediction snapshot.
///
/// The endpoint is called by a machine, not by htmx, so it answers with plain
/// status codes. The body must be a JSON array; individual elements are not
/// validated here because the page skips unreadable points at render time.
pub async fn import_predictions_endpoint(
    State(state): State<ImportPredictionsState>,
    body: String,
) -> Response {
    if let Err(error) = serde_json::from_str::<Vec<serde_json::Value>>(&body) {
        tracing::warn!("rejected prediction snapshot: {error}");
        return (
            StatusCode::BAD_REQUEST,
            "the snapshot must be a JSON array of prediction points",
        )
            .into_response();
    }

    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get local date: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match save_snapshot(&body, today, &connection) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::error!("could not save prediction snapshot: {error}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
