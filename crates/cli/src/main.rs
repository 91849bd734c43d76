#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tranship_api::{prepare, InitialMethod, SolveOptions, TransportSolver};
use tranship_core::math::Scalar;
use tranship_io::{read_request, write_response, ErrorResponse, TransportationResponse};

#[derive(Parser)]
#[command(name = "tranship")]
#[command(version, about = "Balanced transportation problem solver")]
struct Cli {
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Solve {
        #[arg(long)]
        request: PathBuf,
        #[arg(long, default_value = "least-cost")]
        initial: InitialArg,
        #[arg(long)]
        tol: Option<f64>,
        #[arg(long)]
        max_pivots: Option<usize>,
        /// Wall-clock budget in seconds.
        #[arg(long)]
        time_limit: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Include pivot statistics in the response.
        #[arg(long)]
        stats: bool,
    },
    Check {
        #[arg(long)]
        request: PathBuf,
    },
    Bench {},
}

#[derive(Clone, Copy, ValueEnum)]
enum InitialArg {
    LeastCost,
    NorthWest,
    Vogel,
}

impl From<InitialArg> for InitialMethod {
    fn from(arg: InitialArg) -> InitialMethod {
        match arg {
            InitialArg::LeastCost => InitialMethod::LeastCost,
            InitialArg::NorthWest => InitialMethod::NorthWest,
            InitialArg::Vogel => InitialMethod::Vogel,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(cli.log_json);
    let outcome = match cli.command {
        Commands::Solve {
            request,
            initial,
            tol,
            max_pivots,
            time_limit,
            output,
            stats,
        } => solve_command(
            request,
            initial.into(),
            tol,
            max_pivots,
            time_limit,
            output,
            stats,
        ),
        Commands::Check { request } => check_command(request),
        Commands::Bench {} => {
            println!("Benchmarks are available via `cargo bench -p tranship-benches`.");
            Ok(())
        }
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn initialize_tracing(log_json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if log_json {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }
}

fn report_error(err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "request failed");
    let body = ErrorResponse::from(err);
    match serde_json::to_string(&body) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{err:#}"),
    }
}

fn solve_command(
    path: PathBuf,
    initial: InitialMethod,
    tol: Option<f64>,
    max_pivots: Option<usize>,
    time_limit: Option<f64>,
    output: Option<PathBuf>,
    with_stats: bool,
) -> Result<()> {
    let mut options = SolveOptions::<Scalar> {
        initial,
        max_pivots,
        record_history: with_stats,
        ..SolveOptions::default()
    };
    if let Some(tolerance) = tol {
        options.tolerance = tolerance as Scalar;
    }
    if let Some(limit) = time_limit {
        let limit = Duration::try_from_secs_f64(limit)
            .with_context(|| format!("invalid time limit {limit}"))?;
        options.max_time = Some(limit);
    }

    let instance = read_request(&path)?
        .into_instance()
        .context("invalid transportation request")?;
    let report = TransportSolver::new()
        .options(options)
        .solve_instance(&instance)?;
    let response = TransportationResponse::from_report(&report, with_stats);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &response)?;
    handle.write_all(b"\n")?;
    handle.flush()?;

    if let Some(path) = output {
        write_response(path, &response)?;
    }
    Ok(())
}

fn check_command(path: PathBuf) -> Result<()> {
    let instance = read_request(&path)?
        .into_instance()
        .context("invalid transportation request")?;
    let prepared = prepare(&instance.locations, &instance.customers)?;
    println!(
        "locations: {}\ncustomers: {}\ntotal capacity: {}\ntotal demand: {}\nsynthetic demand: {}\ntableau: {} x {}",
        prepared.supply.len(),
        prepared.demand.real().count(),
        prepared.supply.total()?,
        prepared.demand.real_total()?,
        prepared.demand.synthetic().unwrap_or_default(),
        prepared.problem.nrows(),
        prepared.problem.ncols(),
    );
    Ok(())
}
