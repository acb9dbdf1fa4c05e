//! Router for the days API

use std::sync::Arc;

use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::countdown::{self, Lookup, NO_CANDIDATES_MESSAGE, NONE_QUALIFYING_MESSAGE};

type SharedState = Arc<AppState>;

async fn days_handler(
    State(state): State<SharedState>,
) -> Result<Json<public::DaysResponse>, ApiError> {
    let today = state.clock.today(state.config.timezone);
    let lookup = countdown::lookup(state.source.as_ref(), &state.config, today).await?;

    match lookup {
        Lookup::Found(resp) => Ok(Json(resp)),
        Lookup::NoCandidates => Err(ApiError::NotFound(NO_CANDIDATES_MESSAGE.to_string())),
        Lookup::NoneQualifying => Err(ApiError::NotFound(NONE_QUALIFYING_MESSAGE.to_string())),
    }
}

/// Create the days router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(days_handler))
}
