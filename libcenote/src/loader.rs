//! Fetching survey tables from files or over the network
use crate::{
    error::{Error, Result},
    survey::SurveyConfig,
    table::{Table, TableKind, TableSchema},
};
use async_trait::async_trait;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Where the text of a table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Url(String),
    Path(PathBuf),
}

impl Locator {
    /// Interprets `location` as a URL if it has an http(s) scheme and as a filesystem path
    /// otherwise. Relative paths are resolved against `datadir` when one is given.
    pub fn parse(location: &str, datadir: Option<&Path>) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Url(location.to_string());
        }
        let path = Path::new(location);
        match datadir {
            Some(dir) if path.is_relative() => Self::Path(dir.join(path)),
            _ => Self::Path(path.to_path_buf()),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Url(url) => write!(f, "{url}"),
            Locator::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Something that can retrieve the raw text behind a [Locator]
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, locator: &Locator) -> Result<String>;
}

/// Fetches URLs over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<String> {
        let Locator::Url(url) = locator else {
            return Err(Error::UnsupportedLocator(locator.to_string()));
        };
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

/// Reads paths from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetch for FileFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<String> {
        let Locator::Path(path) = locator else {
            return Err(Error::UnsupportedLocator(locator.to_string()));
        };
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

/// Dispatches to [HttpFetcher] or [FileFetcher] depending on the kind of locator
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

#[async_trait]
impl Fetch for DefaultFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<String> {
        match locator {
            Locator::Url(_) => self.http.fetch(locator).await,
            Locator::Path(_) => self.file.fetch(locator).await,
        }
    }
}

/// Fetches and parses a single table.
///
/// A table that can't be fetched is treated as empty so that the rest of the survey can still
/// be shown. A header that doesn't match `schema` is an error.
pub async fn load_table<F>(fetcher: &F, locator: &Locator, schema: TableSchema) -> Result<Table>
where
    F: Fetch + ?Sized,
{
    debug!(%locator, table = %schema.kind, "Loading table");
    match fetcher.fetch(locator).await {
        Ok(text) => Table::parse(&text, schema),
        Err(e) => {
            warn!(%locator, table = %schema.kind, "Failed to fetch table, treating it as empty: {e}");
            Ok(Table::empty(schema))
        }
    }
}

/// The three tables of a survey
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTables {
    pub species: Table,
    pub cenotes: Table,
    pub fish: Table,
}

impl SurveyTables {
    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Species => &self.species,
            TableKind::Cenotes => &self.cenotes,
            TableKind::Fish => &self.fish,
        }
    }
}

/// Loads the species, cenotes and fish tables of a survey, one after the other
pub async fn load_survey<F>(fetcher: &F, survey: &SurveyConfig) -> Result<SurveyTables>
where
    F: Fetch + ?Sized,
{
    let species = load_table(
        fetcher,
        &survey.locator(TableKind::Species),
        survey.schema(TableKind::Species),
    )
    .await?;
    let cenotes = load_table(
        fetcher,
        &survey.locator(TableKind::Cenotes),
        survey.schema(TableKind::Cenotes),
    )
    .await?;
    let fish = load_table(
        fetcher,
        &survey.locator(TableKind::Fish),
        survey.schema(TableKind::Fish),
    )
    .await?;
    info!(
        species = species.len(),
        cenotes = cenotes.len(),
        fish = fish.len(),
        "Loaded survey tables"
    );
    Ok(SurveyTables {
        species,
        cenotes,
        fish,
    })
}
