use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One cleaned row of the connections export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub connected_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl ContactRecord {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let trimmed = name.trim();
        if trimmed.is_empty() {
            "Unnamed connection".to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn connected_year(&self) -> Option<i32> {
        self.connected_on.map(|date| date.year())
    }
}

/// Row accounting for a single import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub rows_read: usize,
    pub missing_company_or_position: usize,
    pub excluded_self_employed: usize,
    pub kept: usize,
}

/// Canonical record set every chart and graph is derived from.
#[derive(Debug, Clone)]
pub struct ContactBook {
    records: Vec<ContactRecord>,
    stats: ImportStats,
}

impl ContactBook {
    pub(crate) fn new(records: Vec<ContactRecord>, stats: ImportStats) -> Self {
        Self { records, stats }
    }

    /// Builds a book from records that are already clean, e.g. in tests or
    /// when another source has done the normalization.
    pub fn from_records(records: Vec<ContactRecord>) -> Self {
        let stats = ImportStats {
            rows_read: records.len(),
            kept: records.len(),
            ..ImportStats::default()
        };
        Self { records, stats }
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn stats(&self) -> ImportStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
