use contact_graph::config::VisualizationConfig;
use contact_graph::workflows::connections::{
    ConnectionImportError, ConnectionImporter, ContactBook,
};
use contact_graph::workflows::network::{
    Aggregates, ArtifactKind, Dimension, DirectorySink, EdgeKind, GraphKind, NetworkReport,
    ReportExporter,
};

fn fixture() -> ContactBook {
    let data = include_bytes!("../Connections.csv");
    ConnectionImporter::from_reader(&data[..]).expect("fixture imports")
}

fn seeded(seed: u64) -> VisualizationConfig {
    VisualizationConfig {
        sample_seed: Some(seed),
        ..VisualizationConfig::default()
    }
}

#[test]
fn fixture_import_counts_every_row() {
    let book = fixture();
    let stats = book.stats();
    assert_eq!(stats.rows_read, 22);
    assert_eq!(stats.missing_company_or_position, 2);
    assert_eq!(stats.excluded_self_employed, 3);
    assert_eq!(stats.kept, 17);
    assert_eq!(book.len(), 17);
}

#[test]
fn freelance_and_self_employed_never_reach_any_output() {
    let book = fixture();
    let aggregates = Aggregates::from_records(book.records());
    let excluded = |name: &str| {
        let lowered = name.to_lowercase();
        lowered.contains("freelance") || lowered.contains("self-employed")
    };

    assert!(aggregates
        .table(Dimension::Company)
        .entries()
        .iter()
        .all(|entry| !excluded(&entry.name)));

    let options = VisualizationConfig {
        company_min_count: 1,
        position_min_count: 1,
        sample_size: 150,
        ..seeded(5)
    };
    let report = NetworkReport::build(&book, &options);
    for kind in GraphKind::ordered() {
        assert!(report
            .graph(kind)
            .nodes()
            .iter()
            .all(|node| !excluded(&node.label)));
    }
    // titles only held by excluded people disappear too
    assert!(report
        .position_chart
        .bars
        .iter()
        .all(|bar| bar.name != "Author" && bar.name != "Consultant"));
}

#[test]
fn default_thresholds_keep_frequent_companies_and_positions() {
    let report = NetworkReport::build(&fixture(), &seeded(1));

    let companies: Vec<&str> = report
        .company_graph
        .nodes()
        .iter()
        .skip(1)
        .map(|node| node.label.as_str())
        .collect();
    assert_eq!(companies, vec!["Acme Corp", "Globex", "Initech"]);
    assert_eq!(report.company_graph.edge_count(), 3);

    let positions: Vec<&str> = report
        .position_graph
        .nodes()
        .iter()
        .skip(1)
        .map(|node| node.label.as_str())
        .collect();
    assert_eq!(
        positions,
        vec!["Software Engineer", "Product Manager", "Data Scientist"]
    );

    assert_eq!(report.company_graph.root().label, "You");
    assert!(report.notices.is_empty());
}

#[test]
fn whole_book_sample_links_every_colleague_pair() {
    let report = NetworkReport::build(&fixture(), &seeded(17));
    let people = &report.people_graph;

    // 17 kept contacts, all drawn because the default sample is larger
    assert_eq!(people.node_count(), 18);
    assert_eq!(people.edges_of_kind(EdgeKind::Structural).count(), 17);
    // Acme 6, Globex 4, Initech 3, Umbrella 2, Hooli 2
    assert_eq!(people.edges_of_kind(EdgeKind::SharedCompany).count(), 26);
    // Software Engineer 6, Product Manager 4, Data Scientist 3, Designer 2
    assert_eq!(people.edges_of_kind(EdgeKind::SharedPosition).count(), 25);

    let other_seed = NetworkReport::build(&fixture(), &seeded(99));
    assert_eq!(
        people.labelled_edge_set(),
        other_seed.people_graph.labelled_edge_set()
    );
}

#[test]
fn thresholds_above_every_count_leave_root_only_graphs() {
    let options = VisualizationConfig {
        company_min_count: 7,
        position_min_count: 7,
        ..seeded(2)
    };
    let report = NetworkReport::build(&fixture(), &options);

    assert!(report.company_graph.is_root_only());
    assert!(report.position_graph.is_root_only());
    assert_eq!(report.notices.len(), 2);
    assert_eq!(report.company_chart.bars.len(), 5);
}

#[test]
fn timeline_covers_dated_connections() {
    let report = NetworkReport::build(&fixture(), &seeded(3));
    assert_eq!(report.connection_dates.total(), 16);
    assert_eq!(report.connection_dates.undated, 1);

    let years: Vec<(i32, usize)> = report
        .connection_years
        .iter()
        .map(|entry| (entry.year, entry.count))
        .collect();
    assert_eq!(
        years,
        vec![(2019, 1), (2020, 3), (2021, 2), (2022, 6), (2023, 4)]
    );
}

#[test]
fn render_writes_every_artifact_to_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report = NetworkReport::build(&fixture(), &seeded(8));
    let mut sink = DirectorySink::create(dir.path()).expect("sink");

    let written = ReportExporter::new(&report)
        .export_to(&mut sink)
        .expect("export succeeds");
    assert_eq!(written, 7);

    let people = std::fs::read_to_string(dir.path().join(ArtifactKind::PeopleGraph.file_name()))
        .expect("people graph written");
    assert!(people.contains("vis.DataSet"));
    assert!(people.contains("Ada Lovelace"));

    let json = std::fs::read_to_string(dir.path().join("report.json")).expect("report written");
    let value: serde_json::Value = serde_json::from_str(&json).expect("report is json");
    assert_eq!(value["import"]["kept"], 17);
}

#[test]
fn missing_upload_prompts_for_a_file() {
    let err = ConnectionImporter::from_optional_path(None::<&str>).expect_err("no file");
    assert!(matches!(err, ConnectionImportError::MissingInput));
    assert_eq!(
        err.to_string(),
        "Please upload a LinkedIn connections.csv file to begin."
    );
}
