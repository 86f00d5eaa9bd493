//! The map view and the host that drives the load, join and render pipeline for it
use crate::{
    error::{Error, Result},
    grid::{Bounds, Grid, GridLine, YUCATAN_BOUNDS},
    loader::{Fetch, SurveyTables, load_survey},
    marker::{Marker, MarkerRenderer},
    record::Coordinate,
    survey::SurveyConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const MIN_ZOOM: u8 = 8;
pub const MAX_BOUNDS_VISCOSITY: f64 = 1.0;

const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
const DEFAULT_TILE_ATTRIBUTION: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, Tiles style by <a href="https://www.hotosm.org/" target="_blank">Humanitarian OpenStreetMap Team</a> hosted by <a href="https://openstreetmap.fr/" target="_blank">OpenStreetMap France</a>"#;

const ICON_BASE_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images";

fn default_center() -> Coordinate {
    Coordinate::new(20.0, -89.0)
}

fn default_zoom() -> u8 {
    5
}

fn default_height() -> String {
    "94vh".to_string()
}

fn default_width() -> String {
    "100%".to_string()
}

/// The externally configurable part of the map: where it is centered and how big it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapView {
    #[serde(default = "default_center")]
    pub center: Coordinate,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// A CSS length
    #[serde(default = "default_height")]
    pub height: String,
    /// A CSS length
    #[serde(default = "default_width")]
    pub width: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            height: default_height(),
            width: default_width(),
        }
    }
}

/// The base map tile service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// Leaflet map options. The map is display-only: every pan and zoom interaction is disabled and
/// the viewport can't be moved outside of its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub max_bounds: Option<[[f64; 2]; 2]>,
    pub max_bounds_viscosity: f64,
    pub min_zoom: u8,
    pub scroll_wheel_zoom: bool,
    pub zoom_control: bool,
    pub dragging: bool,
    pub double_click_zoom: bool,
    pub touch_zoom: bool,
    pub attribution_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            max_bounds: None,
            max_bounds_viscosity: MAX_BOUNDS_VISCOSITY,
            min_zoom: MIN_ZOOM,
            scroll_wheel_zoom: false,
            zoom_control: false,
            dragging: false,
            double_click_zoom: false,
            touch_zoom: false,
            attribution_control: false,
        }
    }
}

impl MapOptions {
    /// Options with the survey region already set as the bounds
    pub fn bounded() -> Self {
        Self {
            max_bounds: Some(YUCATAN_BOUNDS.corners()),
            ..Self::default()
        }
    }
}

/// Image URLs for Leaflet's default marker icon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultIcons {
    pub icon_retina_url: String,
    pub icon_url: String,
    pub shadow_url: String,
}

impl Default for DefaultIcons {
    fn default() -> Self {
        Self {
            icon_retina_url: format!("{ICON_BASE_URL}/marker-icon-2x.png"),
            icon_url: format!("{ICON_BASE_URL}/marker-icon.png"),
            shadow_url: format!("{ICON_BASE_URL}/marker-shadow.png"),
        }
    }
}

/// Everything that has been drawn on a map. Markers and grid lines are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSurface {
    pub view: MapView,
    pub options: MapOptions,
    pub tiles: TileLayer,
    pub icons: Option<DefaultIcons>,
    pub markers: Vec<Marker>,
    pub grid: Vec<GridLine>,
}

impl MapSurface {
    pub fn new(view: MapView, tiles: TileLayer) -> Self {
        Self {
            view,
            options: MapOptions::default(),
            tiles,
            icons: None,
            markers: Vec::new(),
            grid: Vec::new(),
        }
    }

    pub fn set_max_bounds(&mut self, bounds: Bounds) {
        self.options.max_bounds = Some(bounds.corners());
    }

    /// Configures the default icon images. Only the first call has any effect.
    pub fn init_icons(&mut self, icons: DefaultIcons) {
        if self.icons.is_some() {
            warn!("Default icons are already initialized");
            return;
        }
        self.icons = Some(icons);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn draw_grid(&mut self, grid: &Grid) {
        self.grid.extend(grid.lines());
    }
}

/// Lifecycle of a [MapHost]. There is no way back to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Unmounted,
    Loading,
    Rendered,
}

/// Owns a map surface and fills it exactly once: bounds and icons are set up, the survey tables
/// are loaded, one marker is rendered per observation and finally the grid is drawn.
#[derive(Debug)]
pub struct MapHost {
    state: HostState,
    surface: MapSurface,
    renderer: MarkerRenderer,
}

impl MapHost {
    pub fn new(view: MapView, tiles: TileLayer) -> Result<Self> {
        Ok(Self {
            state: HostState::Unmounted,
            surface: MapSurface::new(view, tiles),
            renderer: MarkerRenderer::new()?,
        })
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn into_surface(self) -> MapSurface {
        self.surface
    }

    /// Runs the whole pipeline against `survey`. A host can only be mounted once.
    pub async fn mount<F>(&mut self, fetcher: &F, survey: &SurveyConfig) -> Result<&MapSurface>
    where
        F: Fetch + ?Sized,
    {
        if self.state != HostState::Unmounted {
            return Err(Error::AlreadyMounted);
        }
        self.state = HostState::Loading;
        self.surface.set_max_bounds(YUCATAN_BOUNDS);
        self.surface.init_icons(DefaultIcons::default());
        debug!("Map host mounted, loading survey");

        let tables = load_survey(fetcher, survey).await?;
        self.render(&tables)?;
        Ok(&self.surface)
    }

    fn render(&mut self, tables: &SurveyTables) -> Result<()> {
        for observation in tables.observations() {
            let marker = self.renderer.render(&observation)?;
            self.surface.add_marker(marker);
        }
        self.surface.draw_grid(&Grid::yucatan());
        self.state = HostState::Rendered;
        info!(
            markers = self.surface.markers.len(),
            grid_lines = self.surface.grid.len(),
            "Map rendered"
        );
        Ok(())
    }
}
