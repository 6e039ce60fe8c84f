#![forbid(unsafe_code)]

mod cmd;
mod config;
mod datasets;
mod loader;
mod output;
mod report;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tg: dependency graph analysis (SCC, topological order, critical paths)",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format: pretty, text, or json [env: FORMAT].
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Datasets",
        about = "Generate the benchmark datasets",
        long_about = "Write the nine seeded synthetic graphs (small, medium, large; cyclic and acyclic) as JSON files.",
        after_help = "EXAMPLES:\n    # Write datasets into ./data with the configured seed\n    tg generate\n\n    # Use another seed and directory\n    tg generate --seed 7 --out-dir /tmp/graphs"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Run every algorithm over every dataset",
        long_about = "Run SCC, topological sort, and shortest/longest paths over each dataset and write the CSV report.",
        after_help = "EXAMPLES:\n    # Analyze ./data and write results/results.csv\n    tg analyze\n\n    # Regenerate first, then analyze\n    tg analyze --generate\n\n    # Emit machine-readable output\n    tg analyze --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Strongly connected components",
        long_about = "Find the strongly connected components of a graph file and optionally its condensation.",
        after_help = "EXAMPLES:\n    # List components\n    tg scc data/small_1.json\n\n    # Include condensation edges\n    tg scc data/small_1.json --condensation"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Topological order",
        long_about = "Order a graph with Kahn's algorithm or DFS post-order, optionally through its condensation.",
        after_help = "EXAMPLES:\n    # Kahn order\n    tg topo data/small_2.json\n\n    # DFS order of a cyclic graph's components\n    tg topo data/small_1.json --method dfs --condense"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Shortest or longest paths",
        long_about = "Single-source shortest or longest paths over a DAG, with the critical path for longest runs.",
        after_help = "EXAMPLES:\n    # Shortest paths from vertex 0\n    tg path data/small_2.json --source 0\n\n    # Critical path from the best source\n    tg path data/small_2.json --all-sources\n\n    # Emit machine-readable output\n    tg path data/small_2.json --kind longest --format json"
    )]
    Path(cmd::path::PathArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tg=debug,taskgraph_core=debug,info"
        } else {
            "tg=info,taskgraph_core=info,warn"
        })
    });

    let format = env::var("TASKGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let config = config::load_project_config(&project_root)?;

    match cli.command {
        Commands::Generate(ref args) => {
            cmd::generate::run_generate(args, &config.generate, output, &project_root)
        }
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, &config, output, &project_root)
        }
        Commands::Scc(ref args) => cmd::scc::run_scc(args, output, &project_root),
        Commands::Topo(ref args) => cmd::topo::run_topo(args, output, &project_root),
        Commands::Path(ref args) => {
            cmd::path::run_path(args, &config.analysis, output, &project_root)
        }
    }
}
