use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use nomad_console::client::{ClientController, ClientNode, ClientQuery, ViewState};
use nomad_console::config::{ConsoleConfig, ListConfig, DEFAULT_PAGE_SIZE};
use nomad_console::dashboard::{run_dashboard, DashboardState};
use nomad_console::registry::NodeRegistry;
use nomad_console::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "nomad-console")]
#[command(version)]
#[command(about = "Client detail view of a job scheduler console")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the client pages over HTTP
    Serve(ServeArgs),

    /// List the nodes in a fixture file
    Nodes {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show one page of a node's allocations
    Allocs(AllocsArgs),
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Port for the dashboard
    #[arg(long, default_value = "4646")]
    port: u16,

    /// JSON file with the node records to serve
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Allocations per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// JSON file with the node records
    #[arg(long, short = 'f')]
    fixture: PathBuf,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Parser, Debug)]
struct AllocsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Node ID, short ID prefix, or name
    node: String,

    /// Page to show (1-based)
    #[arg(long)]
    page: Option<u32>,

    /// Filter allocations by short ID or name
    #[arg(long)]
    search: Option<String>,

    /// Column to sort by (e.g. modifyIndex, name, clientStatus)
    #[arg(long)]
    sort: Option<String>,

    /// Sort direction: true for descending, false for ascending
    /// (default: true)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    desc: Option<bool>,

    /// Only show preempted allocations
    #[arg(long)]
    preemptions: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct NodeListItem {
    id: String,
    name: String,
    datacenter: String,
    status: String,
    eligibility: String,
    draining: bool,
    allocations: usize,
}

#[derive(Serialize)]
struct AllocListItem {
    id: String,
    name: String,
    job_id: String,
    status: String,
    modify_index: u64,
    preempted: bool,
}

#[derive(Serialize)]
struct AllocPageOutput {
    node_id: String,
    allocations: Vec<AllocListItem>,
    page: u32,
    total_pages: usize,
    total_count: usize,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Match a node by full ID, short ID prefix, or exact name.
fn resolve_node<'a>(nodes: &'a [ClientNode], needle: &str) -> Option<&'a ClientNode> {
    nodes
        .iter()
        .find(|n| n.id.to_string() == needle || n.name == needle)
        .or_else(|| {
            let mut matches = nodes.iter().filter(|n| n.id.to_string().starts_with(needle));
            match (matches.next(), matches.next()) {
                (Some(node), None) => Some(node),
                _ => None,
            }
        })
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let listen_addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let mut config = ConsoleConfig::new(listen_addr).with_page_size(args.page_size);
    if let Some(path) = args.fixture {
        config = config.with_fixture(path);
    }

    let registry = match &config.fixture_path {
        Some(path) => NodeRegistry::load_fixture(path).await?,
        None => {
            tracing::warn!("No fixture given, serving an empty node list");
            NodeRegistry::new()
        }
    };

    let state = DashboardState::new(Arc::new(registry), config.list.clone());
    let shutdown = install_shutdown_handler();
    run_dashboard(config.listen_addr, state, shutdown).await;
    Ok(())
}

async fn handle_nodes(source: SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = NodeRegistry::load_fixture(&source.fixture).await?;
    let nodes = registry.list().await;

    match source.output {
        OutputFormat::Json => {
            let output: Vec<NodeListItem> = nodes
                .iter()
                .map(|n| NodeListItem {
                    id: n.id.to_string(),
                    name: n.name.clone(),
                    datacenter: n.datacenter.clone(),
                    status: n.status.clone(),
                    eligibility: n.scheduling_eligibility.to_string(),
                    draining: n.is_draining,
                    allocations: n.allocations.len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            if nodes.is_empty() {
                println!("No nodes found.");
                return Ok(());
            }
            println!(
                "{:<10} {:<20} {:<8} {:<12} {:<9} ALLOCS",
                "ID", "NAME", "DC", "ELIGIBILITY", "DRAIN"
            );
            println!("{}", "-".repeat(70));
            for n in &nodes {
                println!(
                    "{:<10} {:<20} {:<8} {:<12} {:<9} {}",
                    n.short_id(),
                    n.name,
                    n.datacenter,
                    n.scheduling_eligibility,
                    n.is_draining,
                    n.allocations.len()
                );
            }
        }
    }
    Ok(())
}

async fn handle_allocs(args: AllocsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(NodeRegistry::load_fixture(&args.source.fixture).await?);
    let nodes = registry.list().await;
    let node_id = match resolve_node(&nodes, &args.node) {
        Some(node) => node.id,
        None => return Err(format!("No unique node matches {:?}", args.node).into()),
    };

    let list_config = ListConfig::default();
    let query = ClientQuery {
        page: args.page,
        search: args.search,
        sort: args.sort,
        desc: args.desc,
        preemptions: Some(args.preemptions),
    };
    let view = ViewState::from_query(&list_config, &query)?;

    let mut controller = ClientController::load(registry, node_id, &list_config).await?;
    controller.set_view_state(view);

    let page = controller.paged_allocations();
    let total_count = controller.sorted_allocations().len();
    let total_pages = controller.total_pages();
    let current_page = controller.view_state().current_page();

    match args.source.output {
        OutputFormat::Json => {
            let output = AllocPageOutput {
                node_id: node_id.to_string(),
                allocations: page
                    .iter()
                    .map(|a| AllocListItem {
                        id: a.id.to_string(),
                        name: a.name.clone(),
                        job_id: a.job_id.clone(),
                        status: a.client_status.to_string(),
                        modify_index: a.modify_index,
                        preempted: a.was_preempted,
                    })
                    .collect(),
                page: current_page,
                total_pages,
                total_count,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            if page.is_empty() {
                println!("No allocations found.");
            } else {
                println!(
                    "{:<10} {:<28} {:<16} {:<10} {:<8} PREEMPTED",
                    "ID", "NAME", "JOB", "STATUS", "INDEX"
                );
                println!("{}", "-".repeat(86));
                for a in &page {
                    println!(
                        "{:<10} {:<28} {:<16} {:<10} {:<8} {}",
                        a.short_id(),
                        a.name,
                        a.job_id,
                        a.client_status,
                        a.modify_index,
                        if a.was_preempted { "yes" } else { "" }
                    );
                }
            }
            println!();
            println!(
                "Page {} of {} ({} allocations)",
                current_page,
                total_pages.max(1),
                total_count
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    match args.command {
        Commands::Serve(serve_args) => run_serve(serve_args).await?,
        Commands::Nodes { source } => handle_nodes(source).await?,
        Commands::Allocs(allocs_args) => handle_allocs(allocs_args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocs_args(argv: &[&str]) -> AllocsArgs {
        let base = ["nomad-console", "allocs", "-f", "fixtures/nodes.json", "client-1"];
        let args = Args::try_parse_from(base.iter().chain(argv.iter()).copied()).unwrap();
        match args.command {
            Commands::Allocs(allocs) => allocs,
            other => panic!("expected allocs, got {:?}", other),
        }
    }

    #[test]
    fn test_desc_takes_an_explicit_value() {
        assert_eq!(allocs_args(&[]).desc, None);
        assert_eq!(allocs_args(&["--desc", "false"]).desc, Some(false));
        assert_eq!(allocs_args(&["--desc=true"]).desc, Some(true));
    }

    #[test]
    fn test_bare_desc_is_rejected() {
        let result = Args::try_parse_from([
            "nomad-console",
            "allocs",
            "-f",
            "fixtures/nodes.json",
            "client-1",
            "--desc",
        ]);
        assert!(result.is_err());
    }
}
