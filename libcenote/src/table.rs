//! Source tables and the schemas they are validated against
use crate::{
    error::{Error, Result},
    record::{LATITUDE, LONGITUDE, Record, is_reserved_column},
};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use tracing::{debug, warn};

/// The three kinds of survey table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Species,
    Cenotes,
    Fish,
}

/// The columns a table is expected to contain. Besides the two coordinate columns, a schema
/// declares the ordered list of category flag columns that contribute to an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub kind: TableKind,
    categories: Vec<String>,
}

impl TableSchema {
    /// Duplicate category names are only kept once, at their first position
    pub fn new<I, S>(kind: TableKind, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for category in categories.into_iter().map(Into::into) {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Self {
            kind,
            categories: unique,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Checks that a header row contains both coordinate columns and every declared category
    pub fn validate_header(&self, header: &StringRecord) -> Result<()> {
        let required = [LATITUDE, LONGITUDE]
            .into_iter()
            .chain(self.categories.iter().map(String::as_str));
        for column in required {
            if !header.iter().any(|h| h == column) {
                return Err(Error::SchemaMismatch {
                    table: self.kind,
                    column: column.to_string(),
                });
            }
        }
        for extra in header
            .iter()
            .filter(|h| !is_reserved_column(h) && !self.categories.iter().any(|c| c == h))
        {
            debug!(table = %self.kind, column = extra, "Ignoring undeclared column");
        }
        Ok(())
    }

    /// The declared categories whose flag is set in `record`, in declaration order
    pub fn flags(&self, record: &Record) -> Vec<String> {
        self.categories
            .iter()
            .filter(|category| record.flag(category))
            .cloned()
            .collect()
    }
}

/// A parsed source table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: TableSchema,
    pub records: Vec<Record>,
}

impl Table {
    pub fn empty(schema: TableSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.schema.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parses delimited text using its first line as the header.
    ///
    /// Text without any content, or whose header can't be read, produces an empty table.
    /// Individual rows that fail to parse are skipped. A header that doesn't satisfy the schema
    /// is an error.
    pub fn parse(text: &str, schema: TableSchema) -> Result<Self> {
        if text.trim().is_empty() {
            warn!(table = %schema.kind, "Table source is empty");
            return Ok(Self::empty(schema));
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());
        let header = match reader.headers() {
            Ok(header) => header.clone(),
            Err(e) => {
                warn!(table = %schema.kind, "Unable to read table header: {e}");
                return Ok(Self::empty(schema));
            }
        };
        schema.validate_header(&header)?;

        let mut records = Vec::new();
        for (n, row) in reader.records().enumerate() {
            match row {
                Ok(row) => records.push(
                    header
                        .iter()
                        .zip(row.iter())
                        .collect::<Record>(),
                ),
                Err(e) => warn!(table = %schema.kind, row = n + 1, "Skipping malformed row: {e}"),
            }
        }
        debug!(table = %schema.kind, rows = records.len(), "Parsed table");
        Ok(Self { schema, records })
    }
}
