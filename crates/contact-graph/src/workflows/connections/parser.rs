use super::normalizer::clean_column_name;
use super::{ConnectionImportError, MalformedInput};
use csv::StringRecord;
use serde::{Deserialize, Deserializer};
use std::io::{BufRead, BufReader, Read};

/// Columns that must be present after header cleaning.
pub(crate) const REQUIRED_COLUMNS: [&str; 5] = [
    "first_name",
    "last_name",
    "company",
    "position",
    "connected_on",
];

/// A data row before normalization. `line` is the 1-based position of the row
/// below the header.
#[derive(Debug)]
pub(crate) struct RawConnection {
    pub(crate) line: usize,
    pub(crate) row: ConnectionRow,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) position: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) connected_on: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) email_address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) url: Option<String>,
}

pub(crate) fn parse_records<R: Read>(
    reader: R,
    metadata_lines: usize,
) -> Result<Vec<RawConnection>, ConnectionImportError> {
    let mut buffered = BufReader::new(reader);
    skip_lines(&mut buffered, metadata_lines)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(buffered);

    let headers: StringRecord = csv_reader
        .headers()
        .map_err(MalformedInput::Csv)?
        .iter()
        .map(clean_column_name)
        .collect();

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(MalformedInput::MissingColumns { missing }.into());
    }

    csv_reader.set_headers(headers);

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<ConnectionRow>().enumerate() {
        let row = result.map_err(MalformedInput::Csv)?;
        records.push(RawConnection {
            line: index + 1,
            row,
        });
    }

    Ok(records)
}

fn skip_lines<R: BufRead>(reader: &mut R, count: usize) -> Result<(), std::io::Error> {
    let mut discarded = Vec::new();
    for _ in 0..count {
        discarded.clear();
        if reader.read_until(b'\n', &mut discarded)? == 0 {
            break;
        }
    }
    Ok(())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
