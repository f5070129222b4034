use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::export::{ArtifactKind, ExportError, ReportExporter};
use super::report::NetworkReport;
use crate::config::{VisualizationConfig, VisualizationOverrides};
use crate::error::AppError;
use crate::workflows::connections::{ConnectionImportError, ConnectionImporter};

/// Largest request body accepted, CSV text included.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Body shared by the report and artifact endpoints. Any option left out,
/// or the whole `options` object, falls back to the server's configured
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkRequest {
    #[serde(default)]
    pub connections_csv: Option<String>,
    #[serde(default)]
    pub options: Option<VisualizationOverrides>,
}

impl NetworkRequest {
    pub fn into_report(self, defaults: &VisualizationConfig) -> Result<NetworkReport, AppError> {
        let options = self
            .options
            .unwrap_or_default()
            .apply_to(defaults.clone())?;

        let csv = self
            .connections_csv
            .filter(|csv| !csv.trim().is_empty())
            .ok_or(ConnectionImportError::MissingInput)?;
        let book = ConnectionImporter::from_reader(Cursor::new(csv.into_bytes()))?;
        Ok(NetworkReport::build(&book, &options))
    }
}

/// Router exposing report and artifact downloads for uploaded exports.
pub fn network_router(defaults: VisualizationConfig) -> Router {
    Router::new()
        .route("/api/v1/network/report", post(report_handler))
        .route("/api/v1/network/artifacts/:name", post(artifact_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(Arc::new(defaults))
}

/// CSV parsing and graph building are CPU bound, so they run on the
/// blocking pool.
async fn build_off_executor(
    request: NetworkRequest,
    defaults: Arc<VisualizationConfig>,
) -> Result<NetworkReport, AppError> {
    tokio::task::spawn_blocking(move || request.into_report(&defaults)).await?
}

pub(crate) async fn report_handler(
    State(defaults): State<Arc<VisualizationConfig>>,
    Json(request): Json<NetworkRequest>,
) -> Result<Json<NetworkReport>, AppError> {
    let report = build_off_executor(request, defaults).await?;
    info!(contacts = report.import.kept, "network report served");
    Ok(Json(report))
}

pub(crate) async fn artifact_handler(
    State(defaults): State<Arc<VisualizationConfig>>,
    Path(name): Path<String>,
    Json(request): Json<NetworkRequest>,
) -> Result<Response, AppError> {
    let kind = ArtifactKind::from_file_name(&name).ok_or(ExportError::UnknownArtifact(name))?;
    let report = build_off_executor(request, defaults).await?;
    let artifact = ReportExporter::new(&report).render(kind)?;
    info!(artifact = artifact.file_name(), "network artifact served");

    let headers = [
        (header::CONTENT_TYPE, kind.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", kind.file_name()),
        ),
    ];
    Ok((headers, artifact.body).into_response())
}
