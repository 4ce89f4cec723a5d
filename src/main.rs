//! Blocks World Planner
//!
//! Reads a blocks-world problem in PDDL, searches for a sequence of moves
//! from the initial arrangement to the goal with the chosen strategy, prints
//! every intermediate arrangement, and writes the moves to a log file. The
//! path can also be stepped through in an interactive 3D viewer.

mod visualization;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blocksworld::{
    format_configuration, moves, parser, solve_with, Heuristic, Move, Problem, Solution, Strategy,
};

/// Solves blocks-world planning problems.
#[derive(Parser)]
#[command(name = "blocksworld")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Log search progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a problem, print the path, and write the move log.
    Solve {
        /// Path to the PDDL problem file.
        problem: PathBuf,

        /// Search strategy: depth, breadth, astar, or best.
        #[arg(short, long, default_value = "astar")]
        strategy: Strategy,

        /// Heuristic for astar and best: penalized or misplaced.
        #[arg(long, default_value = "penalized")]
        heuristic: Heuristic,

        /// Where to write the move log.
        #[arg(short, long, default_value = "out.txt")]
        output: PathBuf,

        /// Wall-clock limit in seconds; 0 disables it.
        #[arg(long, default_value = "60")]
        timeout: u64,
    },
    /// Run every strategy on a problem and compare the results.
    Compare {
        /// Path to the PDDL problem file.
        problem: PathBuf,

        /// Heuristic for astar and best: penalized or misplaced.
        #[arg(long, default_value = "penalized")]
        heuristic: Heuristic,

        /// Wall-clock limit in seconds for all runs together; 0 disables it.
        #[arg(long, default_value = "60")]
        timeout: u64,
    },
    /// Solve a problem and step through the path in a 3D viewer.
    Display {
        /// Path to the PDDL problem file.
        problem: PathBuf,

        /// Search strategy: depth, breadth, astar, or best.
        #[arg(short, long, default_value = "astar")]
        strategy: Strategy,

        /// Heuristic for astar and best: penalized or misplaced.
        #[arg(long, default_value = "penalized")]
        heuristic: Heuristic,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Solve {
            problem,
            strategy,
            heuristic,
            output,
            timeout,
        } => {
            arm_watchdog(timeout);
            run_solve(&problem, strategy, heuristic, &output)
        }
        Command::Compare {
            problem,
            heuristic,
            timeout,
        } => {
            arm_watchdog(timeout);
            run_compare(&problem, heuristic)
        }
        Command::Display {
            problem,
            strategy,
            heuristic,
        } => run_display(&problem, strategy, heuristic),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "blocksworld=debug"
    } else {
        "blocksworld=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Terminates the process once `seconds` of wall-clock time have passed.
fn arm_watchdog(seconds: u64) {
    if seconds == 0 {
        return;
    }
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(seconds));
        error!(event = "timeout", seconds, "time limit exceeded, exiting");
        std::process::exit(2);
    });
}

fn load(path: &Path) -> blocksworld::Result<Problem> {
    let started = Instant::now();
    let problem = parser::read_problem(path)?;
    info!(
        event = "problem_loaded",
        path = %path.display(),
        blocks = problem.block_count(),
        duration_ms = started.elapsed().as_millis() as u64,
    );
    Ok(problem)
}

/// Solves a problem, prints every step, and writes the move log.
fn run_solve(
    path: &Path,
    strategy: Strategy,
    heuristic: Heuristic,
    output: &Path,
) -> blocksworld::Result<()> {
    let problem = load(path)?;
    println!("Initial:\n{}", format_configuration(problem.initial()));
    println!("Goal:\n{}", format_configuration(problem.goal()));

    let solution = solve_with(&problem, strategy, heuristic)?;
    let moves = solution.moves()?;
    print!("{}", render_solution(&solution, &moves));
    println!("Elapsed time: {:.3} seconds", solution.elapsed.as_secs_f64());

    moves::write_move_log(output, &moves)?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Runs every strategy and prints one row per strategy.
fn run_compare(path: &Path, heuristic: Heuristic) -> blocksworld::Result<()> {
    let problem = load(path)?;

    println!(
        "{:<8} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "strategy", "moves", "expanded", "generated", "frontier", "ms"
    );
    for strategy in Strategy::ALL {
        match solve_with(&problem, strategy, heuristic) {
            Ok(solution) => println!(
                "{:<8} {:>6} {:>10} {:>10} {:>10} {:>10}",
                strategy.name(),
                solution.move_count(),
                solution.stats.expanded,
                solution.stats.generated,
                solution.stats.max_frontier,
                solution.elapsed.as_millis()
            ),
            Err(e) => println!("{:<8} {e}", strategy.name()),
        }
    }
    Ok(())
}

/// Solves a problem and opens the viewer on the resulting path.
fn run_display(path: &Path, strategy: Strategy, heuristic: Heuristic) -> blocksworld::Result<()> {
    let problem = load(path)?;
    let solution = solve_with(&problem, strategy, heuristic)?;
    println!(
        "{} search needs {} moves",
        solution.strategy,
        solution.move_count()
    );
    println!("Controls: Left/Right step, Home/End jump");
    visualization::display(solution.path);
    Ok(())
}

/// Formats each step of a solution with the move that produced it.
fn render_solution(solution: &Solution, moves: &[Move]) -> String {
    let mut output = String::new();

    for (step, configuration) in solution.path.iter().enumerate() {
        output.push_str(&format!("Step {step}:"));
        if let Some(m) = step.checked_sub(1).and_then(|i| moves.get(i)) {
            output.push_str(&format!(" {m}"));
        }
        if solution.strategy.is_informed() {
            output.push_str(&format!(
                " (g={}, h={})",
                configuration.g(),
                configuration.h()
            ));
        }
        output.push('\n');
        output.push_str(&format_configuration(configuration));
    }

    output.push_str(&format!(
        "{} search needs {} moves.\n",
        solution.strategy,
        solution.move_count()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocksworld::{solve, Configuration};

    #[test]
    fn test_breadth_first_path_snapshot() {
        let problem = Problem::new(
            Configuration::from_names(&[&["C", "B", "A"], &[]]),
            Configuration::from_names(&[&["A", "B", "C"]]),
        )
        .unwrap();
        let solution = solve(&problem, Strategy::BreadthFirst).unwrap();

        let moves = solution.moves().unwrap();

        insta::assert_snapshot!(render_solution(&solution, &moves), @r"
        Step 0:
        A
        B
        C
        -
        Step 1: MOVE(A, B, table)
        B .
        C A
        ---
        Step 2: MOVE(B, C, A)
        . B
        C A
        ---
        Step 3: MOVE(C, table, B)
        C
        B
        A
        -
        breadth search needs 3 moves.
        ");
    }

    #[test]
    fn test_problem_file_roundtrip() {
        let path =
            std::env::temp_dir().join(format!("blocksworld-cli-{}.pddl", std::process::id()));
        let output = path.with_extension("txt");
        std::fs::write(
            &path,
            "(define (problem BLOCKS-3-0) (:domain BLOCKS) (:objects A B C)
             (:INIT (CLEAR A) (ON A B) (ON B C) (ONTABLE C) (HANDEMPTY))
             (:goal (AND (ON B A) (ON C B))))",
        )
        .unwrap();

        run_solve(&path, Strategy::BreadthFirst, Heuristic::default(), &output).unwrap();
        let log = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::remove_file(&output).unwrap();

        assert_eq!(log.lines().count(), 3);
        assert!(log.lines().all(|line| line.starts_with("MOVE(")));
    }
}
