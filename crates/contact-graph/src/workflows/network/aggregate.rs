use crate::workflows::connections::ContactRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Record attribute an entity table is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Company,
    Position,
}

impl Dimension {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Position => "position",
        }
    }

    pub fn value_of(self, record: &ContactRecord) -> &str {
        match self {
            Self::Company => &record.company,
            Self::Position => &record.position,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub count: usize,
}

/// Entity counts ordered by descending count. Equal counts keep the order in
/// which the entities were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut slots: HashMap<&'a str, usize> = HashMap::new();
        let mut entries: Vec<FrequencyEntry> = Vec::new();

        for value in values {
            match slots.get(value) {
                Some(&slot) => entries[slot].count += 1,
                None => {
                    slots.insert(value, entries.len());
                    entries.push(FrequencyEntry {
                        name: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // `sort_by` is stable, which is what keeps first-seen order on ties.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    pub fn for_dimension(records: &[ContactRecord], dimension: Dimension) -> Self {
        Self::tally(records.iter().map(|record| dimension.value_of(record)))
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, limit: usize) -> &[FrequencyEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Entities seen at least `min_count` times, in table order.
    pub fn at_least(&self, min_count: usize) -> FrequencyTable {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.count >= min_count)
                .cloned()
                .collect(),
        }
    }

    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.count)
    }

    pub fn lookup(&self) -> HashMap<&str, usize> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.count))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Connection counts per calendar year, oldest year first.
pub fn tally_years(records: &[ContactRecord]) -> Vec<YearCount> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.iter().filter_map(ContactRecord::connected_year) {
        *years.entry(year).or_default() += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Every frequency table derived from one contact book.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub companies: FrequencyTable,
    pub positions: FrequencyTable,
    pub years: Vec<YearCount>,
}

impl Aggregates {
    pub fn from_records(records: &[ContactRecord]) -> Self {
        Self {
            companies: FrequencyTable::for_dimension(records, Dimension::Company),
            positions: FrequencyTable::for_dimension(records, Dimension::Position),
            years: tally_years(records),
        }
    }

    pub fn table(&self, dimension: Dimension) -> &FrequencyTable {
        match dimension {
            Dimension::Company => &self.companies,
            Dimension::Position => &self.positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(company: &str, position: &str, date: Option<(i32, u32, u32)>) -> ContactRecord {
        ContactRecord {
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            company: company.to_string(),
            position: position.to_string(),
            connected_on: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            email: None,
            profile_url: None,
        }
    }

    #[test]
    fn tally_sorts_descending_and_keeps_first_seen_order_on_ties() {
        let table = FrequencyTable::tally(["Beta", "Acme", "Gamma", "Acme", "Gamma", "Delta"]);
        let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Gamma", "Beta", "Delta"]);
        assert_eq!(table.count_of("Acme"), Some(2));
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn threshold_keeps_entities_at_or_above_minimum() {
        let table = FrequencyTable::tally(["A", "A", "A", "B", "B", "C"]);
        let reduced = table.at_least(2);
        assert_eq!(reduced.len(), 2);
        assert!(reduced.count_of("C").is_none());
        assert!(table.at_least(4).is_empty());
        assert_eq!(table.at_least(1), table);
    }

    #[test]
    fn top_truncates_without_panicking() {
        let table = FrequencyTable::tally(["A", "B"]);
        assert_eq!(table.top(20).len(), 2);
        assert_eq!(table.top(1)[0].name, "A");
    }

    #[test]
    fn aggregates_cover_company_position_and_year() {
        let records = vec![
            record("Acme", "Eng", Some((2020, 1, 1))),
            record("Acme", "Eng", Some((2020, 1, 2))),
            record("Beta", "Sales", Some((2019, 6, 3))),
            record("Beta", "Eng", None),
        ];
        let aggregates = Aggregates::from_records(&records);
        assert_eq!(aggregates.companies.count_of("Acme"), Some(2));
        assert_eq!(aggregates.table(Dimension::Position).entries()[0].name, "Eng");
        assert_eq!(
            aggregates.years,
            vec![
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2020, count: 2 },
            ]
        );
    }
}
