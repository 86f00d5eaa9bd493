use crate::{api_url, state::AppState};
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use libcenote::map::MapOptions;
use minijinja::context;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// The map page. Markers are not part of the page itself; the browser mounts the map and then
/// requests the overlay.
async fn index(State(state): State<AppState>) -> impl IntoResponse {
    state.render_template(
        "map.html.j2",
        context!(
            view => &state.config.map,
            options => MapOptions::bounded(),
            tiles => &state.config.tiles,
            overlay_url => api_url("/overlay"),
        ),
    )
}
