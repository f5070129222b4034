//! Aggregation, visual encoding and graph construction over imported
//! contacts, plus the HTML/JSON artifacts rendered from them.

mod aggregate;
mod builder;
mod charts;
mod export;
mod graph;
mod markup;
mod palette;
mod render;
mod report;
mod router;

pub use aggregate::{tally_years, Aggregates, Dimension, FrequencyEntry, FrequencyTable, YearCount};
pub use builder::{
    people_graph_from_sample, sample_records, EmptyResult, GraphBuilder, SizePolicy,
    PLACEHOLDER_POSITION,
};
pub use charts::{
    BarChart, DateHistogram, HistogramBin, HISTOGRAM_BINS, TOP_COMPANIES, TOP_POSITIONS,
};
pub use export::{
    Artifact, ArtifactKind, ArtifactSink, DirectorySink, ExportError, MemorySink, ReportExporter,
};
pub use graph::{EdgeKind, GraphEdge, GraphKind, GraphNode, NetworkGraph, NodeKind, ROOT_ID};
pub use palette::{
    color_for, DiscretePalette, GradientPalette, GraphLayout, ParseOptionError, PhysicsSettings,
    BUCKET_LOWER_BOUNDS, SWATCH_LEN,
};
pub use render::{bar_chart_document, graph_document, histogram_document};
pub use report::NetworkReport;
pub use router::{network_router, NetworkRequest, MAX_UPLOAD_BYTES};
