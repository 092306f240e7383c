//! CLI entry point for the solver.
//!
//! Usage:
//!   klotski-solver solve <puzzle.json> [options]
//!   klotski-solver solve --stdin [options]
//!   klotski-solver solve --builtin classic [options]
//!   klotski-solver list
//!
//! Options:
//!   --compression <mode>   inline, post-process or off (default: inline)
//!   --max-states <n>       Stop after recording n layouts
//!   --timeout <seconds>    Maximum search time
//!   --format <format>      json or text (default: json)
//!
//! Progress is logged through `RUST_LOG`, e.g. `RUST_LOG=debug`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use klotski_solver::{
    solve, Board, CompressionMode, Move, PuzzleConfig, PuzzleError, SearchLimit, SearchOutcome,
    SolverConfig, SolverResult, BUILTIN_NAMES,
};

#[derive(Parser)]
#[command(name = "klotski-solver")]
#[command(about = "Breadth-first solver for Klotski-style sliding-block puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the moves
    Solve {
        /// Path to puzzle JSON file (defaults to the reference puzzle)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Solve a built-in puzzle instead
        #[arg(long, value_name = "NAME", conflicts_with_all = ["file", "stdin"])]
        builtin: Option<String>,

        /// How repeated slides are merged into double moves
        #[arg(long, value_enum, default_value = "inline")]
        compression: Compression,

        /// Stop after recording this many distinct layouts
        #[arg(long)]
        max_states: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// List the built-in puzzles
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compression {
    Inline,
    PostProcess,
    Off,
}

impl From<Compression> for CompressionMode {
    fn from(value: Compression) -> Self {
        match value {
            Compression::Inline => CompressionMode::Inline,
            Compression::PostProcess => CompressionMode::PostProcess,
            Compression::Off => CompressionMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Output format for a search result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    puzzle: String,
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    states_visited: usize,
    nodes_expanded: usize,
    max_frontier: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    move_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_move_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_board: Option<Vec<String>>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for name in BUILTIN_NAMES {
                match PuzzleConfig::builtin(name) {
                    Ok(puzzle) => println!("{:<10} {}", name, puzzle.title),
                    Err(e) => eprintln!("Error loading {}: {}", name, e),
                }
            }
        }
        Commands::Solve {
            file,
            stdin,
            builtin,
            compression,
            max_states,
            timeout,
            format,
        } => {
            let puzzle = match load_puzzle(file, stdin, builtin) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading puzzle: {}", e);
                    process::exit(2);
                }
            };

            let (start, goal) = match puzzle.build() {
                Ok(built) => built,
                Err(e) => {
                    eprintln!("Invalid puzzle: {}", e);
                    process::exit(2);
                }
            };

            let config = SolverConfig {
                compression: compression.into(),
                max_states,
                timeout: timeout.map(Duration::from_secs),
                ..Default::default()
            };

            info!(
                "solving {:?} ({}x{}) with {:?} compression",
                puzzle.id,
                start.rows(),
                start.cols(),
                config.compression
            );
            let result = solve(&start, &goal, &config);

            match format {
                OutputFormat::Json => match serde_json::to_string_pretty(&format_result(&puzzle, &result)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing result: {}", e);
                        process::exit(2);
                    }
                },
                OutputFormat::Text => print_text(&start, &result),
            }

            // Exit with appropriate code
            if result.is_solved() {
                process::exit(0);
            } else {
                process::exit(1);
            }
        }
    }
}

fn load_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    builtin: Option<String>,
) -> Result<PuzzleConfig, PuzzleError> {
    if let Some(name) = builtin {
        return PuzzleConfig::builtin(&name);
    }

    let json = if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)?
    } else {
        return PuzzleConfig::builtin("reference");
    };

    PuzzleConfig::from_json(&json)
}

fn failure_reason(outcome: &SearchOutcome) -> Option<String> {
    match outcome {
        SearchOutcome::Solved(_) => None,
        SearchOutcome::Exhausted => Some("no_solution".to_string()),
        SearchOutcome::LimitReached(SearchLimit::States) => Some("state_limit".to_string()),
        SearchOutcome::LimitReached(SearchLimit::Timeout) => Some("timeout".to_string()),
    }
}

fn format_result(puzzle: &PuzzleConfig, result: &SolverResult) -> SolveOutput {
    let solution = result.solution();
    SolveOutput {
        puzzle: puzzle.id.clone(),
        solved: solution.is_some(),
        reason: failure_reason(&result.outcome),
        states_visited: result.states_visited,
        nodes_expanded: result.nodes_expanded,
        max_frontier: result.max_frontier,
        time_elapsed_ms: result.time_elapsed_ms,
        move_count: solution.map(|s| s.len()),
        unit_move_count: solution.map(|s| s.unit_len()),
        moves: solution.map(|s| s.moves.clone()),
        final_board: solution.map(|s| board_lines(&s.board)),
    }
}

fn board_lines(board: &Board) -> Vec<String> {
    board
        .to_string()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

fn print_text(start: &Board, result: &SolverResult) {
    println!("{}\n", start);

    match result.solution() {
        Some(solution) => {
            println!("{}\n", solution.board);
            println!(
                "{} moves ({} single-cell), {} layouts explored",
                solution.len(),
                solution.unit_len(),
                result.states_visited
            );
            for (step, mv) in solution.moves.iter().enumerate() {
                println!("{:>4}. {}", step + 1, mv);
            }
        }
        None => println!(
            "{}, {} layouts explored",
            failure_reason(&result.outcome).unwrap_or_default(),
            result.states_visited
        ),
    }
}
