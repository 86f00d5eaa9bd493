//! Scoring joined rows and classifying them into color tiers
use crate::{join::Joined, loader::SurveyTables, record::Coordinate};
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Discrete color classification of an observation's score
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gray,
    Red,
    Orange,
    Yellow,
    YellowGreen,
    Green,
}

impl Tier {
    pub fn from_score(score: usize) -> Self {
        match score {
            0 => Tier::Gray,
            1 => Tier::Red,
            2 => Tier::Orange,
            3 => Tier::Yellow,
            4 => Tier::YellowGreen,
            _ => Tier::Green,
        }
    }

    /// The CSS color name used to draw this tier
    pub fn color(&self) -> &'static str {
        self.into()
    }
}

/// Everything known about a single surveyed coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub coordinate: Coordinate,
    pub species: Vec<String>,
    pub cenotes: Vec<String>,
    pub fishes: Vec<String>,
    pub score: usize,
}

impl Observation {
    pub fn new(
        coordinate: Coordinate,
        species: Vec<String>,
        cenotes: Vec<String>,
        fishes: Vec<String>,
    ) -> Self {
        let score = species.len() + cenotes.len() + fishes.len();
        Self {
            coordinate,
            species,
            cenotes,
            fishes,
            score,
        }
    }

    /// Collects the set flags of each joined row using the schemas of `tables`
    pub fn from_joined(joined: &Joined<'_>, tables: &SurveyTables) -> Self {
        Self::new(
            joined.coordinate,
            tables.species.schema.flags(joined.species),
            joined
                .cenote
                .map(|r| tables.cenotes.schema.flags(r))
                .unwrap_or_default(),
            joined
                .fish
                .map(|r| tables.fish.schema.flags(r))
                .unwrap_or_default(),
        )
    }

    pub fn tier(&self) -> Tier {
        Tier::from_score(self.score)
    }
}

impl SurveyTables {
    /// One observation for each species row with a parsable coordinate, in file order
    pub fn observations(&self) -> Vec<Observation> {
        crate::join::join(self)
            .iter()
            .map(|joined| Observation::from_joined(joined, self))
            .collect()
    }
}
