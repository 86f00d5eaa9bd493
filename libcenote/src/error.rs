//! Objects related to reporting errors from this library
use crate::table::TableKind;

/// A list of error types that can occur within this library
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("the {table} table is missing the required column '{column}'")]
    SchemaMismatch { table: TableKind, column: String },

    #[error("unable to fetch '{0}' with this fetcher")]
    UnsupportedLocator(String),

    #[error(transparent)]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("the map host has already been mounted")]
    AlreadyMounted,
}

/// A convenience type alias for a [Result] with [Error] as its error type
pub type Result<T, E = Error> = std::result::Result<T, E>;
