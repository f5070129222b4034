use super::aggregate::{Aggregates, YearCount};
use super::builder::{EmptyResult, GraphBuilder};
use super::charts::{BarChart, DateHistogram, HISTOGRAM_BINS};
use super::graph::{GraphKind, NetworkGraph};
use crate::config::VisualizationConfig;
use crate::workflows::connections::{ContactBook, ImportStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// Everything rendered for one contacts export: three charts and three
/// graphs, plus notices for graphs a threshold emptied.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub import: ImportStats,
    pub options: VisualizationConfig,
    pub company_chart: BarChart,
    pub position_chart: BarChart,
    pub connection_dates: DateHistogram,
    pub connection_years: Vec<YearCount>,
    pub company_graph: NetworkGraph,
    pub position_graph: NetworkGraph,
    pub people_graph: NetworkGraph,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<EmptyResult>,
}

impl NetworkReport {
    /// Builds the report, seeding the people sample from `sample_seed` when
    /// one is configured.
    pub fn build(book: &ContactBook, options: &VisualizationConfig) -> Self {
        match options.sample_seed {
            Some(seed) => Self::build_with_rng(book, options, &mut StdRng::seed_from_u64(seed)),
            None => Self::build_with_rng(book, options, &mut StdRng::from_entropy()),
        }
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        book: &ContactBook,
        options: &VisualizationConfig,
        rng: &mut R,
    ) -> Self {
        let records = book.records();
        let aggregates = Aggregates::from_records(records);
        let builder = GraphBuilder::new(records, &aggregates, options);

        let (company_graph, company_notice) = builder.company_graph();
        let (position_graph, position_notice) = builder.position_graph();
        let people_graph = builder.people_graph(rng);
        let notices: Vec<EmptyResult> = company_notice.into_iter().chain(position_notice).collect();

        info!(
            companies = company_graph.node_count() - 1,
            positions = position_graph.node_count() - 1,
            people = people_graph.node_count() - 1,
            notices = notices.len(),
            "network report built"
        );

        Self {
            import: book.stats(),
            options: options.clone(),
            company_chart: BarChart::top_companies(&aggregates.companies, options.bar_palette),
            position_chart: BarChart::top_positions(&aggregates.positions, options.bar_palette),
            connection_dates: DateHistogram::from_records(
                records,
                HISTOGRAM_BINS,
                options.bar_palette,
            ),
            connection_years: aggregates.years.clone(),
            company_graph,
            position_graph,
            people_graph,
            notices,
        }
    }

    pub fn graph(&self, kind: GraphKind) -> &NetworkGraph {
        match kind {
            GraphKind::Company => &self.company_graph,
            GraphKind::Position => &self.position_graph,
            GraphKind::People => &self.people_graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::connections::ContactRecord;
    use crate::workflows::network::aggregate::Dimension;
    use chrono::NaiveDate;

    fn book() -> ContactBook {
        let rows = [
            ("Ada", "Acme", "Eng", 1),
            ("Grace", "Acme", "Eng", 2),
            ("Alan", "Acme", "Sales", 3),
            ("Edsger", "Beta", "Eng", 4),
            ("Barbara", "Gamma", "Sales", 5),
        ];
        ContactBook::from_records(
            rows.iter()
                .map(|(first, company, position, day)| ContactRecord {
                    first_name: first.to_string(),
                    last_name: "Tester".to_string(),
                    company: company.to_string(),
                    position: position.to_string(),
                    connected_on: NaiveDate::from_ymd_opt(2021, 4, *day),
                    email: None,
                    profile_url: None,
                })
                .collect(),
        )
    }

    #[test]
    fn report_bundles_charts_and_graphs() {
        let options = VisualizationConfig {
            sample_seed: Some(9),
            ..VisualizationConfig::default()
        };
        let report = NetworkReport::build(&book(), &options);

        assert_eq!(report.company_chart.bars[0].name, "Acme");
        assert_eq!(report.position_chart.bars.len(), 2);
        assert_eq!(report.connection_dates.total(), 5);
        assert_eq!(report.connection_years, vec![YearCount { year: 2021, count: 5 }]);
        // Acme has 3, the default threshold
        assert_eq!(report.company_graph.node_count(), 2);
        assert_eq!(report.position_graph.node_count(), 2);
        // the sample is clamped to the five available people
        assert_eq!(report.people_graph.node_count(), 6);
        assert!(report.notices.is_empty());
        assert_eq!(report.graph(GraphKind::People).kind, GraphKind::People);
    }

    #[test]
    fn emptied_dimensions_become_notices_not_failures() {
        let options = VisualizationConfig {
            company_min_count: 10,
            position_min_count: 10,
            sample_seed: Some(1),
            ..VisualizationConfig::default()
        };
        let report = NetworkReport::build(&book(), &options);

        assert!(report.company_graph.is_root_only());
        assert!(report.position_graph.is_root_only());
        let dimensions: Vec<Dimension> = report.notices.iter().map(|n| n.dimension).collect();
        assert_eq!(dimensions, vec![Dimension::Company, Dimension::Position]);
        assert_eq!(report.company_chart.bars.len(), 3);
    }

    #[test]
    fn report_serializes_for_the_api() {
        let options = VisualizationConfig {
            sample_seed: Some(3),
            ..VisualizationConfig::default()
        };
        let report = NetworkReport::build(&book(), &options);
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["options"]["network_palette"], "Bolds");
        assert_eq!(json["company_graph"]["nodes"][1]["label"], "Acme");
        assert!(json.get("notices").is_none());
    }
}
