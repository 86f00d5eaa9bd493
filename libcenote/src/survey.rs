//! Configuration describing where a survey's tables live and which columns they declare
use crate::{
    error::{Error, Result},
    loader::Locator,
    record::is_reserved_column,
    table::{TableKind, TableSchema},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::debug;

/// One source table of a survey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// A URL or a filesystem path
    pub location: String,
    /// Category flag columns, in the order they should be listed
    #[serde(default)]
    pub categories: Vec<String>,
}

/// The full set of sources for a survey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyConfig {
    /// Directory that relative source locations are resolved against
    #[serde(default)]
    pub datadir: Option<PathBuf>,
    pub species: SourceConfig,
    pub cenotes: SourceConfig,
    pub fish: SourceConfig,
}

impl SurveyConfig {
    /// Parses and validates a survey from a YAML document
    pub fn from_yaml(text: &str) -> Result<Self> {
        let survey: Self = serde_yaml::from_str(text)?;
        survey.validate()?;
        Ok(survey)
    }

    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(?path, "Loading survey configuration");
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        for kind in TableKind::iter() {
            let source = self.source(kind);
            if source.location.trim().is_empty() {
                return Err(Error::Config(format!("the {kind} source has no location")));
            }
            if let Some(reserved) = source
                .categories
                .iter()
                .find(|c| is_reserved_column(c))
            {
                return Err(Error::Config(format!(
                    "'{reserved}' is a coordinate column and can't be a {kind} category"
                )));
            }
            let mut seen: Vec<&String> = Vec::new();
            for category in &source.categories {
                if seen.contains(&category) {
                    return Err(Error::Config(format!(
                        "{kind} category '{category}' is declared more than once"
                    )));
                }
                seen.push(category);
            }
        }
        Ok(())
    }

    pub fn source(&self, kind: TableKind) -> &SourceConfig {
        match kind {
            TableKind::Species => &self.species,
            TableKind::Cenotes => &self.cenotes,
            TableKind::Fish => &self.fish,
        }
    }

    pub fn locator(&self, kind: TableKind) -> Locator {
        Locator::parse(&self.source(kind).location, self.datadir.as_deref())
    }

    pub fn schema(&self, kind: TableKind) -> TableSchema {
        TableSchema::new(kind, self.source(kind).categories.iter().cloned())
    }
}
