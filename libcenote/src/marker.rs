//! Turning observations into styled circle markers with a popup summary
use crate::{
    error::Result,
    observation::{Observation, Tier},
    record::Coordinate,
};
use minijinja::{Environment, context};
use serde::Serialize;

pub const MARKER_RADIUS: f64 = 5.0;
pub const MARKER_FILL_OPACITY: f64 = 0.6;

/// Decimal places shown for popup coordinates
pub const COORDINATE_DECIMALS: u32 = 5;

pub const NO_SPECIES: &str = "No hay especies para esta coordenada";
pub const NO_CENOTES: &str = "No hay cenotes para esta coordenada";

const POPUP_TEMPLATE_NAME: &str = "popup.html";
const POPUP_TEMPLATE: &str = r#"<strong>Coordenadas:</strong> {{ coordinates }}<br>
{%- if species %}<strong>Especies:</strong> {{ species|join(", ") }}<br>
{%- else %}{{ no_species }}<br>
{%- endif %}
{%- if cenotes %}<strong>Cenotes:</strong> {{ cenotes|join(", ") }}<br>
{%- else %}{{ no_cenotes }}<br>
{%- endif %}"#;

/// Leaflet path options for a circle marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

impl CircleStyle {
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            radius: MARKER_RADIUS,
            color: tier.color(),
            fill_color: tier.color(),
            fill_opacity: MARKER_FILL_OPACITY,
        }
    }
}

/// A point drawn on the map for one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub score: usize,
    pub tier: Tier,
    pub style: CircleStyle,
    /// HTML shown when the marker is clicked
    pub popup: String,
}

/// Builds markers for observations. Holds the compiled popup template so it can be reused for
/// every marker of a render pass.
#[derive(Debug)]
pub struct MarkerRenderer {
    env: Environment<'static>,
}

impl MarkerRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(POPUP_TEMPLATE_NAME, POPUP_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Renders the popup text for an observation. Species and fish names are listed together;
    /// observation names are HTML-escaped.
    pub fn popup(&self, observation: &Observation) -> Result<String> {
        let species: Vec<&String> = observation
            .species
            .iter()
            .chain(observation.fishes.iter())
            .collect();
        let coordinates = format!(
            "{}, {}",
            to_fixed(observation.coordinate.latitude, COORDINATE_DECIMALS),
            to_fixed(observation.coordinate.longitude, COORDINATE_DECIMALS)
        );
        Ok(self.env.get_template(POPUP_TEMPLATE_NAME)?.render(context!(
            coordinates => coordinates,
            species => species,
            cenotes => &observation.cenotes,
            no_species => NO_SPECIES,
            no_cenotes => NO_CENOTES,
        ))?)
    }

    pub fn render(&self, observation: &Observation) -> Result<Marker> {
        let tier = observation.tier();
        Ok(Marker {
            coordinate: observation.coordinate,
            score: observation.score,
            tier,
            style: CircleStyle::for_tier(tier),
            popup: self.popup(observation)?,
        })
    }
}

/// Formats `value` with a fixed number of decimals the way browsers print numbers: an exact
/// halfway value rounds away from zero and negative zero has no sign.
///
/// A value lies exactly halfway between two outputs only when it is an odd multiple of
/// `2^-(decimals + 1)`. Those are detected exactly and rounded with integer arithmetic; every
/// other value is left to the standard formatter, which rounds the exact binary value correctly.
fn to_fixed(value: f64, decimals: u32) -> String {
    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    // multiplying by a power of two is exact
    let scaled = magnitude * 2f64.powi(decimals as i32 + 1);
    let is_tie = scaled < 2f64.powi(f64::MANTISSA_DIGITS as i32)
        && scaled.fract() == 0.0
        && scaled % 2.0 == 1.0;
    if !is_tie {
        return format!("{sign}{magnitude:.prec$}", prec = decimals as usize);
    }
    let units = (scaled as u128 * 5u128.pow(decimals) + 1) / 2;
    if decimals == 0 {
        return format!("{sign}{units}");
    }
    let unit = 10u128.pow(decimals);
    format!(
        "{sign}{}.{:0width$}",
        units / unit,
        units % unit,
        width = decimals as usize
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    fn observation(species: &[&str], cenotes: &[&str], fishes: &[&str]) -> Observation {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Observation::new(
            Coordinate::new(20.0, -89.0),
            owned(species),
            owned(cenotes),
            owned(fishes),
        )
    }

    #[test]
    fn test_marker_style() {
        let renderer = MarkerRenderer::new().expect("Failed to create renderer");
        let marker = renderer
            .render(&observation(&["bird"], &["wellA"], &[]))
            .expect("Failed to render marker");
        assert_eq!(marker.tier, Tier::Orange);
        assert_eq!(
            marker.style,
            CircleStyle {
                radius: 5.0,
                color: "orange",
                fill_color: "orange",
                fill_opacity: 0.6,
            }
        );
        let json = serde_json::to_value(&marker.style).unwrap();
        assert_eq!(json["fillColor"], "orange");
        assert_eq!(json["fillOpacity"], 0.6);
    }

    #[test]
    fn test_popup_with_matches() {
        let renderer = MarkerRenderer::new().expect("Failed to create renderer");
        let popup = renderer
            .popup(&observation(&["bird"], &["wellA", "wellB"], &["tetra"]))
            .expect("Failed to render popup");
        assert!(popup.contains("20.00000, -89.00000"));
        assert!(popup.contains("<strong>Especies:</strong> bird, tetra<br>"));
        assert!(popup.contains("<strong>Cenotes:</strong> wellA, wellB<br>"));
        assert!(!popup.contains(NO_SPECIES));
        assert!(!popup.contains(NO_CENOTES));
    }

    #[test]
    fn test_popup_fallbacks() {
        let renderer = MarkerRenderer::new().expect("Failed to create renderer");
        let popup = renderer
            .popup(&observation(&[], &[], &[]))
            .expect("Failed to render popup");
        assert!(popup.contains(NO_SPECIES));
        assert!(popup.contains(NO_CENOTES));
        assert!(!popup.contains("Especies:"));

        // fish alone is enough to list species
        let popup = renderer
            .popup(&observation(&[], &[], &["tetra"]))
            .expect("Failed to render popup");
        assert!(popup.contains("<strong>Especies:</strong> tetra"));
        assert!(popup.contains(NO_CENOTES));
    }

    #[test]
    fn test_popup_rounds_halfway_coordinates_up() {
        let renderer = MarkerRenderer::new().expect("Failed to create renderer");
        let popup = renderer
            .popup(&Observation::new(
                Coordinate::new(20.015625, -88.984375),
                vec![],
                vec![],
                vec![],
            ))
            .expect("Failed to render popup");
        assert!(popup.contains("20.01563, -88.98438"));
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(20.015625, 5), "20.01563");
        assert_eq!(to_fixed(-88.984375, 5), "-88.98438");
        assert_eq!(to_fixed(-0.0, 5), "0.00000");
        assert_eq!(to_fixed(20.0, 5), "20.00000");
        assert_eq!(to_fixed(21.123454, 5), "21.12345");
        assert_eq!(to_fixed(21.123456, 5), "21.12346");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
    }

    #[test]
    fn test_popup_escapes_names() {
        let renderer = MarkerRenderer::new().expect("Failed to create renderer");
        let popup = renderer
            .popup(&observation(&["<b>bird</b>"], &[], &[]))
            .expect("Failed to render popup");
        assert!(popup.contains("&lt;b&gt;bird"));
        assert!(!popup.contains("<b>"));
    }
}
