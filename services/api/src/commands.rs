use chrono::Local;
use clap::Args;
use contact_graph::config::{AppConfig, VisualizationConfig, VisualizationOverrides};
use contact_graph::error::AppError;
use contact_graph::workflows::connections::{ContactBook, ConnectionImporter};
use contact_graph::workflows::network::{
    ArtifactKind, DirectorySink, DiscretePalette, EdgeKind, ExportError, GradientPalette,
    GraphKind, GraphLayout, NetworkReport, ReportExporter,
};
use std::path::PathBuf;

/// Viewer options; anything omitted keeps the `NETWORK_*` configured default.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct OptionArgs {
    /// Gradient for the bar charts and date histogram (e.g. Tealgrn, Inferno)
    #[arg(long)]
    pub(crate) bar_palette: Option<GradientPalette>,
    /// Node palette for the graphs (Bolds, Pastels, Bluegreen, Blues, Neons)
    #[arg(long)]
    pub(crate) network_palette: Option<DiscretePalette>,
    /// Graph layout (Packed or Spoked)
    #[arg(long)]
    pub(crate) layout: Option<GraphLayout>,
    /// Minimum connections for a company to appear in the company graph (1-20)
    #[arg(long)]
    pub(crate) company_min_count: Option<usize>,
    /// Minimum connections for a position to appear in the position graph (1-20)
    #[arg(long)]
    pub(crate) position_min_count: Option<usize>,
    /// Number of people drawn into the people graph (10-150)
    #[arg(long)]
    pub(crate) sample_size: Option<usize>,
    /// Label of the center node
    #[arg(long)]
    pub(crate) root_label: Option<String>,
    /// Seed for a reproducible people sample
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl OptionArgs {
    pub(crate) fn apply(self, base: VisualizationConfig) -> Result<VisualizationConfig, AppError> {
        let overrides = VisualizationOverrides {
            bar_palette: self.bar_palette,
            network_palette: self.network_palette,
            graph_layout: self.layout,
            company_min_count: self.company_min_count,
            position_min_count: self.position_min_count,
            sample_size: self.sample_size,
            root_label: self.root_label,
            sample_seed: self.seed,
        };
        Ok(overrides.apply_to(base)?)
    }
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Path to the Connections.csv export
    #[arg(long)]
    pub(crate) connections_csv: Option<PathBuf>,
    /// Directory receiving the HTML documents and report.json
    #[arg(long, default_value = "network-report")]
    pub(crate) out: PathBuf,
    #[command(flatten)]
    pub(crate) options: OptionArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Path to the Connections.csv export
    #[arg(long)]
    pub(crate) connections_csv: Option<PathBuf>,
    /// Number of companies and positions to list
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
    /// Print the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) options: OptionArgs,
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        connections_csv,
        out,
        options,
    } = args;

    let (book, options) = load_inputs(connections_csv, options)?;
    let report = NetworkReport::build(&book, &options);
    let mut sink = DirectorySink::create(&out)?;
    let written = ReportExporter::new(&report).export_to(&mut sink)?;

    println!(
        "Rendered {} artifact(s) for {} connection(s) into {}",
        written,
        book.len(),
        sink.root().display()
    );
    for kind in ArtifactKind::ordered() {
        println!("- {}", kind.file_name());
    }
    print_notices(&report);
    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let SummaryArgs {
        connections_csv,
        top,
        json,
        options,
    } = args;

    let (book, options) = load_inputs(connections_csv, options)?;
    let report = NetworkReport::build(&book, &options);

    if json {
        let body = serde_json::to_string_pretty(&report)
            .map_err(ExportError::from)?;
        println!("{body}");
        return Ok(());
    }

    let stats = report.import;
    println!(
        "Contact network summary ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!(
        "- {} row(s) read | {} kept | {} missing company or position | {} freelance/self-employed",
        stats.rows_read, stats.kept, stats.missing_company_or_position, stats.excluded_self_employed
    );
    if report.connection_dates.undated > 0 {
        println!(
            "- {} connection(s) without a date",
            report.connection_dates.undated
        );
    }

    println!("\nTop companies");
    for entry in report.company_chart.bars.iter().take(top) {
        println!("  - {}: {}", entry.name, entry.count);
    }
    println!("\nTop positions");
    for entry in report.position_chart.bars.iter().take(top) {
        println!("  - {}: {}", entry.name, entry.count);
    }

    println!("\nConnections per year");
    for year in &report.connection_years {
        println!("  - {}: {}", year.year, year.count);
    }

    println!("\nGraphs");
    for kind in GraphKind::ordered() {
        let graph = report.graph(kind);
        println!(
            "  - {}: {} node(s), {} edge(s)",
            kind.title(),
            graph.node_count(),
            graph.edge_count()
        );
    }
    let people = report.graph(GraphKind::People);
    println!(
        "    people links: {} shared company, {} shared position",
        people.edges_of_kind(EdgeKind::SharedCompany).count(),
        people.edges_of_kind(EdgeKind::SharedPosition).count()
    );
    print_notices(&report);
    Ok(())
}

fn load_inputs(
    connections_csv: Option<PathBuf>,
    options: OptionArgs,
) -> Result<(ContactBook, VisualizationConfig), AppError> {
    let config = AppConfig::load()?;
    let options = options.apply(config.visualization)?;
    let book = ConnectionImporter::from_optional_path(connections_csv)?;
    Ok((book, options))
}

fn print_notices(report: &NetworkReport) {
    if report.notices.is_empty() {
        return;
    }
    println!("\nNotices");
    for notice in &report.notices {
        println!("  - {}", notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_args_override_only_what_was_given() {
        let args = OptionArgs {
            layout: Some(GraphLayout::Spoked),
            sample_size: Some(40),
            seed: Some(11),
            ..OptionArgs::default()
        };
        let options = args
            .apply(VisualizationConfig::default())
            .expect("options valid");

        assert_eq!(options.graph_layout, GraphLayout::Spoked);
        assert_eq!(options.sample_size, 40);
        assert_eq!(options.sample_seed, Some(11));
        assert_eq!(options.network_palette, DiscretePalette::Bolds);
        assert_eq!(options.company_min_count, 3);
    }

    #[test]
    fn option_args_reject_out_of_range_thresholds() {
        let args = OptionArgs {
            company_min_count: Some(0),
            ..OptionArgs::default()
        };
        assert!(args.apply(VisualizationConfig::default()).is_err());
    }
}
