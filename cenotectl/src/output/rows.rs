use libcenote::{
    grid::GridLine,
    observation::{Observation, Tier},
};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct ObservationRow {
    latitude: f64,
    longitude: f64,
    tier: Tier,
    score: usize,
    species: String,
    cenotes: String,
    fishes: String,
}

impl ObservationRow {
    pub(crate) fn new(observation: &Observation) -> Self {
        Self {
            latitude: observation.coordinate.latitude,
            longitude: observation.coordinate.longitude,
            tier: observation.tier(),
            score: observation.score,
            species: observation.species.join(", "),
            cenotes: observation.cenotes.join(", "),
            fishes: observation.fishes.join(", "),
        }
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct TierRow {
    tier: Tier,
    observations: usize,
}

impl TierRow {
    /// One row per tier, best tier first, including tiers without any observations
    pub(crate) fn summarize(observations: &[Observation]) -> Vec<Self> {
        use strum::IntoEnumIterator;
        Tier::iter()
            .rev()
            .map(|tier| Self {
                tier,
                observations: observations.iter().filter(|o| o.tier() == tier).count(),
            })
            .collect()
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct GridLineRow {
    from_latitude: f64,
    from_longitude: f64,
    to_latitude: f64,
    to_longitude: f64,
}

impl GridLineRow {
    pub(crate) fn new(line: &GridLine) -> Self {
        Self {
            from_latitude: line.from.latitude,
            from_longitude: line.from.longitude,
            to_latitude: line.to.latitude,
            to_longitude: line.to.longitude,
        }
    }
}
