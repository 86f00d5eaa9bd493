use crate::{error::Error, state::AppState};
use axum::{Json, Router, extract::State, routing::get};
use libcenote::{
    grid::{Grid, GridLine},
    map::{MapHost, MapSurface},
};
use tracing::debug;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/overlay", get(overlay))
        .route("/grid", get(grid))
}

/// Mounts a fresh map host for every request, so each page load starts from an empty surface
/// and reflects the current contents of the survey files.
async fn overlay(State(state): State<AppState>) -> Result<Json<MapSurface>, Error> {
    let mut host = MapHost::new(state.config.map.clone(), state.config.tiles.clone())?;
    host.mount(&state.fetcher, &state.config.survey).await?;
    let surface = host.into_surface();
    debug!(markers = surface.markers.len(), "Serving overlay");
    Ok(Json(surface))
}

async fn grid() -> Json<Vec<GridLine>> {
    Json(Grid::yucatan().lines())
}
