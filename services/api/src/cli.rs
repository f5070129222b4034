use crate::commands::{run_render, run_summary, RenderArgs, SummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contact_graph::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contact Graph",
    about = "Chart and graph a professional contacts export from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render every chart and graph into an output directory
    Render(RenderArgs),
    /// Print ranked companies, positions and graph sizes
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Render(args) => run_render(args),
        Command::Summary(args) => run_summary(args),
    }
}
