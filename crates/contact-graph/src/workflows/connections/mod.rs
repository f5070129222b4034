mod domain;
mod normalizer;
mod parser;

pub use domain::{ContactBook, ContactRecord, ImportStats};

use parser::RawConnection;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Number of note lines the export places above its header row.
pub const METADATA_LINES: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionImportError {
    #[error("Please upload a LinkedIn connections.csv file to begin.")]
    MissingInput,
    #[error("failed to read connections export: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
}

/// The export was readable but cannot produce any chart.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInput {
    #[error("invalid connections CSV data: {0}")]
    Csv(#[source] csv::Error),
    #[error("connections export is missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },
    #[error("row {row}: connection date '{value}' is not in DD Mon YYYY format")]
    InvalidDate { row: usize, value: String },
    #[error(
        "no usable connections remain after cleaning ({rows_read} row(s) read, \
         {missing_fields} without company or position, {excluded} freelance or self-employed)"
    )]
    NoUsableRows {
        rows_read: usize,
        missing_fields: usize,
        excluded: usize,
    },
}

pub struct ConnectionImporter;

impl ConnectionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ContactBook, ConnectionImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening connections export");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`ConnectionImporter::from_path`], but treats an absent path as
    /// the viewer not having supplied a file yet.
    pub fn from_optional_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<ContactBook, ConnectionImportError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Err(ConnectionImportError::MissingInput),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ContactBook, ConnectionImportError> {
        let rows = parser::parse_records(reader, METADATA_LINES)?;
        let mut stats = ImportStats {
            rows_read: rows.len(),
            ..ImportStats::default()
        };
        let mut records = Vec::with_capacity(rows.len());

        for raw in rows {
            match normalize_row(raw)? {
                RowOutcome::Kept(record) => records.push(record),
                RowOutcome::MissingFields => stats.missing_company_or_position += 1,
                RowOutcome::Excluded => stats.excluded_self_employed += 1,
            }
        }

        stats.kept = records.len();
        if records.is_empty() {
            return Err(MalformedInput::NoUsableRows {
                rows_read: stats.rows_read,
                missing_fields: stats.missing_company_or_position,
                excluded: stats.excluded_self_employed,
            }
            .into());
        }

        info!(
            rows_read = stats.rows_read,
            kept = stats.kept,
            missing_company_or_position = stats.missing_company_or_position,
            excluded_self_employed = stats.excluded_self_employed,
            "connections export imported"
        );

        Ok(ContactBook::new(records, stats))
    }
}

enum RowOutcome {
    Kept(ContactRecord),
    MissingFields,
    Excluded,
}

fn normalize_row(raw: RawConnection) -> Result<RowOutcome, MalformedInput> {
    let RawConnection { line, row } = raw;

    let company = row.company.as_deref().map(normalizer::clean_value);
    let position = row.position.as_deref().map(normalizer::clean_value);
    let (company, position) = match (company, position) {
        (Some(company), Some(position)) if !company.is_empty() && !position.is_empty() => {
            (company, position)
        }
        _ => return Ok(RowOutcome::MissingFields),
    };

    let connected_on = match row.connected_on.as_deref() {
        Some(value) => Some(normalizer::parse_connected_on(value).ok_or_else(|| {
            MalformedInput::InvalidDate {
                row: line,
                value: value.to_string(),
            }
        })?),
        None => None,
    };

    if normalizer::is_excluded_company(&company) {
        return Ok(RowOutcome::Excluded);
    }

    Ok(RowOutcome::Kept(ContactRecord {
        first_name: clean_optional(row.first_name),
        last_name: clean_optional(row.last_name),
        company,
        position,
        connected_on,
        email: row.email_address.as_deref().map(normalizer::clean_value),
        profile_url: row.url.as_deref().map(normalizer::clean_value),
    }))
}

fn clean_optional(value: Option<String>) -> String {
    value
        .as_deref()
        .map(normalizer::clean_value)
        .unwrap_or_default()
}
