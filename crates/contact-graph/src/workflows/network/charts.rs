use super::aggregate::{Dimension, FrequencyEntry, FrequencyTable, YearCount};
use super::palette::GradientPalette;
use crate::workflows::connections::ContactRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const TOP_COMPANIES: usize = 20;
pub const TOP_POSITIONS: usize = 15;
pub const HISTOGRAM_BINS: usize = 15;

/// Horizontal bar chart of the most frequent entities, largest first.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub dimension: Dimension,
    pub palette: GradientPalette,
    pub bars: Vec<FrequencyEntry>,
}

impl BarChart {
    pub fn top_companies(table: &FrequencyTable, palette: GradientPalette) -> Self {
        Self::top(
            "Connections by Company",
            Dimension::Company,
            table,
            TOP_COMPANIES,
            palette,
        )
    }

    pub fn top_positions(table: &FrequencyTable, palette: GradientPalette) -> Self {
        Self::top(
            "Connections by Position",
            Dimension::Position,
            table,
            TOP_POSITIONS,
            palette,
        )
    }

    fn top(
        title: &'static str,
        dimension: Dimension,
        table: &FrequencyTable,
        limit: usize,
        palette: GradientPalette,
    ) -> Self {
        Self {
            title,
            dimension,
            palette,
            bars: table.top(limit).to_vec(),
        }
    }
}

/// One equal-width slice of the connection timeline. `end` is exclusive
/// except for the last bin, which also holds the latest date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: usize,
    pub by_year: Vec<YearCount>,
}

/// Connection dates bucketed over time and split by year.
#[derive(Debug, Clone, Serialize)]
pub struct DateHistogram {
    pub title: &'static str,
    pub palette: GradientPalette,
    pub bins: Vec<HistogramBin>,
    /// Records whose connection date was blank.
    pub undated: usize,
}

impl DateHistogram {
    pub fn from_records(
        records: &[ContactRecord],
        bin_count: usize,
        palette: GradientPalette,
    ) -> Self {
        let dates: Vec<NaiveDate> = records.iter().filter_map(|r| r.connected_on).collect();
        let undated = records.len() - dates.len();

        Self {
            title: "Connections by Date",
            palette,
            bins: bin_dates(&dates, bin_count),
            undated,
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.total).sum()
    }
}

fn bin_dates(dates: &[NaiveDate], bin_count: usize) -> Vec<HistogramBin> {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return Vec::new();
    };
    let (first, last) = (*first, *last);
    let bin_count = bin_count.max(1);
    let span_days = (last - first).num_days();

    if span_days == 0 {
        return vec![HistogramBin {
            start: first,
            end: first + Duration::days(1),
            total: dates.len(),
            by_year: year_counts(dates.iter().copied()),
        }];
    }

    let width = span_days as f64 / bin_count as f64;
    let mut boundaries: Vec<NaiveDate> = (0..bin_count)
        .map(|index| first + Duration::days((index as f64 * width).round() as i64))
        .collect();
    boundaries.push(last);

    // inner boundaries only; the last bin is closed on the right
    let inner = &boundaries[1..bin_count];
    let mut buckets: Vec<Vec<NaiveDate>> = vec![Vec::new(); bin_count];
    for date in dates {
        let index = inner.partition_point(|boundary| boundary <= date);
        buckets[index].push(*date);
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, bucket)| HistogramBin {
            start: boundaries[index],
            end: boundaries[index + 1],
            total: bucket.len(),
            by_year: year_counts(bucket.into_iter()),
        })
        .collect()
}

fn year_counts(dates: impl Iterator<Item = NaiveDate>) -> Vec<YearCount> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for date in dates {
        *years.entry(date.year()).or_default() += 1;
    }
    years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: Option<NaiveDate>, company: &str) -> ContactRecord {
        ContactRecord {
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            company: company.to_string(),
            position: "Eng".to_string(),
            connected_on: date,
            email: None,
            profile_url: None,
        }
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn bar_charts_take_top_twenty_and_fifteen() {
        let names: Vec<String> = (0..30).map(|i| format!("Entity {i:02}")).collect();
        let table = FrequencyTable::tally(names.iter().map(String::as_str));

        let companies = BarChart::top_companies(&table, GradientPalette::Sunset);
        assert_eq!(companies.bars.len(), 20);
        assert_eq!(companies.palette, GradientPalette::Sunset);

        let positions = BarChart::top_positions(&table, GradientPalette::Magenta);
        assert_eq!(positions.bars.len(), 15);
        assert_eq!(positions.bars[0].name, "Entity 00");
    }

    #[test]
    fn histogram_spreads_dates_over_fixed_bins() {
        let records: Vec<ContactRecord> = vec![
            dated(Some(ymd(2019, 1, 1)), "A"),
            dated(Some(ymd(2019, 6, 1)), "A"),
            dated(Some(ymd(2020, 3, 1)), "A"),
            dated(Some(ymd(2021, 12, 31)), "A"),
            dated(None, "A"),
        ];
        let histogram = DateHistogram::from_records(&records, HISTOGRAM_BINS, GradientPalette::Teal);

        assert_eq!(histogram.bins.len(), HISTOGRAM_BINS);
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.undated, 1);
        assert_eq!(histogram.bins[0].start, ymd(2019, 1, 1));
        assert_eq!(histogram.bins.last().map(|b| b.end), Some(ymd(2021, 12, 31)));
        assert_eq!(histogram.bins.last().map(|b| b.total), Some(1));
        for pair in histogram.bins.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn bin_ranges_hold_exactly_the_dates_they_count() {
        let days: Vec<NaiveDate> = (0..34)
            .map(|offset| ymd(2020, 1, 1) + Duration::days(offset))
            .collect();
        let records: Vec<ContactRecord> =
            days.iter().map(|day| dated(Some(*day), "A")).collect();
        let histogram = DateHistogram::from_records(&records, HISTOGRAM_BINS, GradientPalette::Teal);

        assert_eq!(histogram.bins.len(), HISTOGRAM_BINS);
        assert_eq!(histogram.total(), 34);
        let last_index = histogram.bins.len() - 1;
        for (index, bin) in histogram.bins.iter().enumerate() {
            let inside = days
                .iter()
                .filter(|day| {
                    **day >= bin.start
                        && (**day < bin.end || (index == last_index && **day == bin.end))
                })
                .count();
            assert_eq!(inside, bin.total, "bin {index} {}..{}", bin.start, bin.end);
        }
    }

    #[test]
    fn short_spans_leave_empty_bins_without_losing_dates() {
        let records = vec![
            dated(Some(ymd(2023, 3, 1)), "A"),
            dated(Some(ymd(2023, 3, 2)), "A"),
            dated(Some(ymd(2023, 3, 3)), "A"),
        ];
        let histogram = DateHistogram::from_records(&records, HISTOGRAM_BINS, GradientPalette::Teal);
        assert_eq!(histogram.total(), 3);
        for bin in &histogram.bins {
            assert!(bin.start <= bin.end);
        }
        assert_eq!(histogram.bins.last().map(|b| b.end), Some(ymd(2023, 3, 3)));
    }

    #[test]
    fn bins_split_counts_by_year() {
        let records = vec![
            dated(Some(ymd(2019, 12, 30)), "A"),
            dated(Some(ymd(2020, 1, 2)), "A"),
            dated(Some(ymd(2020, 1, 3)), "A"),
        ];
        let histogram = DateHistogram::from_records(&records, 1, GradientPalette::Teal);
        assert_eq!(
            histogram.bins[0].by_year,
            vec![
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2020, count: 2 },
            ]
        );
    }

    #[test]
    fn single_day_collapses_into_one_bin() {
        let records = vec![
            dated(Some(ymd(2022, 5, 5)), "A"),
            dated(Some(ymd(2022, 5, 5)), "B"),
        ];
        let histogram = DateHistogram::from_records(&records, HISTOGRAM_BINS, GradientPalette::Teal);
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].total, 2);
    }

    #[test]
    fn no_dates_means_no_bins() {
        let records = vec![dated(None, "A")];
        let histogram = DateHistogram::from_records(&records, HISTOGRAM_BINS, GradientPalette::Teal);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.undated, 1);
    }
}
