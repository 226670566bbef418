use clap::{Parser, Subcommand};
use pf_project::{ProjectResult, compile, load, validate_project};
use pf_solver::{FlowSolver, SolverConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PipeFlow CLI - Piping network flow and pressure-drop solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate network file syntax and references
    Validate {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
    /// Solve flows and pressures
    Solve {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Maximum relaxation passes
        #[arg(long)]
        max_iterations: Option<usize>,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Solve {
            network_path,
            json,
            max_iterations,
        } => cmd_solve(&network_path, json, max_iterations),
    }
}

fn cmd_validate(network_path: &Path) -> ProjectResult<()> {
    println!("Validating network: {}", network_path.display());
    let project = load(network_path)?;
    validate_project(&project)?;
    compile(&project)?;
    println!(
        "✓ Network is valid ({} nodes, {} elements)",
        project.nodes.len(),
        project.elements.len()
    );
    Ok(())
}

#[derive(Serialize)]
struct SolveReport {
    name: String,
    converged: bool,
    iterations: usize,
    last_change_ls: f64,
    loops: usize,
    arcs: usize,
    unaccounted_edges: Vec<String>,
    elements: Vec<ElementRow>,
    nodes: Vec<NodeRow>,
}

#[derive(Serialize)]
struct ElementRow {
    id: String,
    kind: &'static str,
    from: String,
    to: String,
    flow_ls: f64,
    head_loss_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity_mps: Option<f64>,
}

#[derive(Serialize)]
struct NodeRow {
    id: String,
    pressure_kpa: f64,
}

fn cmd_solve(network_path: &Path, json: bool, max_iterations: Option<usize>) -> ProjectResult<()> {
    let project = load(network_path)?;
    let compiled = compile(&project)?;

    let mut config = SolverConfig::default();
    if let Some(max_iterations) = max_iterations {
        config.max_iterations = max_iterations;
    }
    let solver = FlowSolver::with_config(&compiled.network, config);
    let solution = solver.solve_flows_ls(&compiled.demands, &compiled.supplies_kpa)?;
    let pressures = solver.node_pressures_kpa(&solution, &compiled.supplies_kpa)?;
    info!(network = %project.name, converged = solution.converged, "solve finished");

    let elements = solver
        .element_reports(&solution)?
        .into_iter()
        .map(|r| ElementRow {
            id: r.uid,
            kind: r.kind,
            from: r.from,
            to: r.to,
            flow_ls: r.flow_ls,
            head_loss_m: r.head_loss_m,
            velocity_mps: r.velocity_mps,
        })
        .collect();
    let mut nodes: Vec<NodeRow> = pressures
        .into_iter()
        .map(|(id, pressure_kpa)| NodeRow { id, pressure_kpa })
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let report = SolveReport {
        name: project.name.clone(),
        converged: solution.converged,
        iterations: solution.iterations,
        last_change_ls: solution.last_change,
        loops: solution.cycles.len(),
        arcs: solution.arcs.len(),
        unaccounted_edges: solution.unaccounted_edges.clone(),
        elements,
        nodes,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SolveReport) {
    println!("Network: {}", report.name);
    if report.converged {
        println!("✓ Converged after {} iteration(s)", report.iterations);
    } else {
        println!(
            "✗ Not converged after {} iteration(s), last change {:.3e} L/s",
            report.iterations, report.last_change_ls
        );
    }
    println!("  {} loop(s), {} arc(s)", report.loops, report.arcs);

    println!();
    println!(
        "{:<16} {:<13} {:<10} {:<10} {:>10} {:>12} {:>10}",
        "Element", "Kind", "From", "To", "Flow L/s", "Loss m", "v m/s"
    );
    for row in &report.elements {
        let velocity = row
            .velocity_mps
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:<13} {:<10} {:<10} {:>10.4} {:>12.4} {:>10}",
            row.id, row.kind, row.from, row.to, row.flow_ls, row.head_loss_m, velocity
        );
    }

    println!();
    println!("{:<16} {:>14}", "Node", "Pressure kPa");
    for node in &report.nodes {
        println!("{:<16} {:>14.2}", node.id, node.pressure_kpa);
    }
}
