use super::graph::GraphKind;
use super::render::{bar_chart_document, graph_document, histogram_document};
use super::report::NetworkReport;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    CompanyGraph,
    PositionGraph,
    PeopleGraph,
    CompanyChart,
    PositionChart,
    ConnectionDates,
    ReportJson,
}

impl ArtifactKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::CompanyGraph,
            Self::PositionGraph,
            Self::PeopleGraph,
            Self::CompanyChart,
            Self::PositionChart,
            Self::ConnectionDates,
            Self::ReportJson,
        ]
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::CompanyGraph => "company_graph.html",
            Self::PositionGraph => "position_graph.html",
            Self::PeopleGraph => "people_graph.html",
            Self::CompanyChart => "company_chart.html",
            Self::PositionChart => "position_chart.html",
            Self::ConnectionDates => "connection_dates.html",
            Self::ReportJson => "report.json",
        }
    }

    /// Accepts either the file name or its stem, e.g. `people_graph`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ordered().into_iter().find(|kind| {
            let file_name = kind.file_name();
            file_name == name
                || file_name
                    .rsplit_once('.')
                    .map(|(stem, _)| stem == name)
                    .unwrap_or(false)
        })
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::ReportJson => mime::APPLICATION_JSON,
            _ => mime::TEXT_HTML_UTF_8,
        }
    }
}

/// A rendered, named document ready to be stored or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub body: String,
}

impl Artifact {
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown artifact `{0}`")]
    UnknownArtifact(String),
}

/// Destination for rendered artifacts.
pub trait ArtifactSink {
    fn store(&mut self, artifact: Artifact) -> Result<(), ExportError>;
}

/// Writes each artifact as a file inside one output directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn create<P: AsRef<Path>>(root: P) -> Result<Self, ExportError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| ExportError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirectorySink {
    fn store(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        let path = self.root.join(artifact.file_name());
        fs::write(&path, artifact.body.as_bytes())
            .map_err(|source| ExportError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), "artifact written");
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<ArtifactKind, Artifact>,
}

impl MemorySink {
    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts.into_values().collect()
    }
}

impl ArtifactSink for MemorySink {
    fn store(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        self.artifacts.insert(artifact.kind, artifact);
        Ok(())
    }
}

/// Renders a report into its charts, graphs and JSON summary.
#[derive(Debug, Clone, Copy)]
pub struct ReportExporter<'a> {
    report: &'a NetworkReport,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a NetworkReport) -> Self {
        Self { report }
    }

    pub fn render(&self, kind: ArtifactKind) -> Result<Artifact, ExportError> {
        let report = self.report;
        let layout = report.options.graph_layout;
        let body = match kind {
            ArtifactKind::CompanyGraph => graph_document(report.graph(GraphKind::Company), layout)?,
            ArtifactKind::PositionGraph => {
                graph_document(report.graph(GraphKind::Position), layout)?
            }
            ArtifactKind::PeopleGraph => graph_document(report.graph(GraphKind::People), layout)?,
            ArtifactKind::CompanyChart => bar_chart_document(&report.company_chart)?,
            ArtifactKind::PositionChart => bar_chart_document(&report.position_chart)?,
            ArtifactKind::ConnectionDates => histogram_document(&report.connection_dates)?,
            ArtifactKind::ReportJson => serde_json::to_string_pretty(report)?,
        };
        Ok(Artifact { kind, body })
    }

    /// Looks an artifact up by file name or stem and renders it.
    pub fn render_named(&self, name: &str) -> Result<Artifact, ExportError> {
        let kind = ArtifactKind::from_file_name(name)
            .ok_or_else(|| ExportError::UnknownArtifact(name.to_string()))?;
        self.render(kind)
    }

    pub fn export_to<S: ArtifactSink + ?Sized>(&self, sink: &mut S) -> Result<usize, ExportError> {
        let mut stored = 0;
        for kind in ArtifactKind::ordered() {
            sink.store(self.render(kind)?)?;
            stored += 1;
        }
        info!(artifacts = stored, "network report exported");
        Ok(stored)
    }
}
