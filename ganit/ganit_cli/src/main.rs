use std::{
    io::{self, Read},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ganit_solver::{
    MathProblem, MathSolver, SolutionResponse, SolveService, SolverConfig, SolverTelemetry,
};
use shared_logging::{LogLevel, MemoryLogger};

#[derive(Parser, Debug)]
#[command(name = "ganit", version, about = "Classify and solve math problems")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solves a problem and prints the answer with its steps.
    Solve(SolveArgs),
    /// Cleans the text and prints the detected topic.
    Detect {
        /// Problem text, or `-` to read stdin.
        text: String,
        /// Print the JSON response instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Lists the advertised topic catalog as JSON.
    Topics,
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// Problem text, or `-` to read stdin.
    text: String,
    /// Topic hint: auto, vector, matrix, derivative, integral, limit, equation, general.
    #[arg(long, default_value = "auto")]
    topic: String,
    /// Narration language: en or bn.
    #[arg(long, default_value = "en")]
    lang: String,
    /// Solver configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Append JSON-lines telemetry to this file.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Minimum telemetry level.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Print the JSON response instead of plain text.
    #[arg(long)]
    json: bool,
    /// Echo telemetry events to stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Solve(args) => handle_solve(args),
        Commands::Detect { text, json } => {
            let text = read_text(&text)?;
            let service = SolveService::new(MathSolver::default(), None);
            let response = service.detect_text(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{} | {}", response.problem_type, response.extracted_text);
            }
            Ok(())
        }
        Commands::Topics => {
            let service = SolveService::new(MathSolver::default(), None);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "topics": service.topics() }))?
            );
            Ok(())
        }
    }
}

fn handle_solve(args: SolveArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    let Some(level) = LogLevel::parse(&args.log_level) else {
        bail!("unknown log level {:?}", args.log_level);
    };
    let memory = Arc::new(MemoryLogger::new());
    let telemetry = if args.log.is_some() || args.verbose {
        let mut builder = SolverTelemetry::builder("ganit").min_level(level);
        if let Some(path) = &args.log {
            builder = builder.log_path(path);
        }
        if args.verbose {
            builder = builder.sink(memory.clone());
        }
        Some(builder.build().context("opening telemetry log")?)
    } else {
        None
    };
    let service = SolveService::new(MathSolver::new(config, telemetry.clone()), telemetry);
    let problem = MathProblem {
        problem_text: read_text(&args.text)?,
        problem_type: args.topic,
        language: args.lang,
    };
    let response = service.solve(&problem);
    for record in memory.snapshot() {
        eprintln!("{}", serde_json::to_string(&record)?);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response)?;
    }
    Ok(())
}

fn print_response(response: &SolutionResponse) -> Result<()> {
    if let Some(error) = &response.error {
        bail!("{error}");
    }
    println!("{}", response.answer);
    for (index, step) in response.steps.iter().enumerate() {
        println!("  {}. {step}", index + 1);
    }
    if let Some(visualization) = &response.visualization {
        println!("{}", serde_json::to_string(visualization)?);
    }
    Ok(())
}

fn read_text(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading problem from stdin")?;
    Ok(buffer)
}
