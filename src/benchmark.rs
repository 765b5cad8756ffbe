//! Timing the search with and without alpha-beta pruning
//!
//! Boards are generated up front from a seeded RNG so a benchmark is
//! reproducible. Runs are spread over the rayon pool, but both variants of a
//! run are timed back to back on the same worker thread.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::{
    alignment::winner,
    board::{Board, Player},
    difficulty::DifficultyTable,
    error::{ConfigError, SearchError},
    solver::{SearchConfig, SearchResult, Solver},
    HEIGHT, WIDTH,
};

/// The player the benchmark searches for
pub const BENCHMARK_PLAYER: Player = Player::Two;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub runs_per_depth: usize,
    pub depths: Vec<usize>,
    /// Inclusive range of random moves played before each search
    pub min_moves: usize,
    pub max_moves: usize,
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs_per_depth: 15,
            depths: vec![2, 4, 5],
            min_moves: 5,
            max_moves: 25,
            seed: 0x0C4,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs_per_depth == 0 {
            return Err(ConfigError::Validation(
                "benchmark.runs_per_depth must be > 0".into(),
            ));
        }
        if self.depths.is_empty() || self.depths.contains(&0) {
            return Err(ConfigError::Validation(
                "benchmark.depths must be non-empty and every depth > 0".into(),
            ));
        }
        if self.min_moves > self.max_moves {
            return Err(ConfigError::Validation(
                "benchmark.min_moves must be <= benchmark.max_moves".into(),
            ));
        }
        // leave room on the board so an undecided position is always reachable
        if self.max_moves > WIDTH * (HEIGHT - 1) {
            return Err(ConfigError::Validation(format!(
                "benchmark.max_moves must be <= {}",
                WIDTH * (HEIGHT - 1)
            )));
        }
        Ok(())
    }
}

/// Plays up to `moves` random columns, each for a random player
///
/// Stops early once either player has a 4-in-a-row, so the result may
/// already be decided.
pub fn random_board<R: Rng>(rng: &mut R, moves: usize) -> Board {
    let mut board = Board::new();
    for _ in 0..moves {
        let column = match board.legal_columns().choose(rng) {
            Some(&column) => column,
            None => break,
        };
        let player = if rng.gen::<bool>() {
            Player::One
        } else {
            Player::Two
        };
        board = board.play(column, player);
        if winner(&board).is_some() {
            break;
        }
    }
    board
}

/// Draws random boards until one has no winner
pub fn undecided_board<R: Rng>(rng: &mut R, moves: usize) -> Board {
    loop {
        let board = random_board(rng, moves);
        if winner(&board).is_none() {
            return board;
        }
    }
}

/// One paired measurement on one board
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub run: usize,
    pub depth: usize,
    pub moves: usize,
    pub column_pruned: Option<usize>,
    pub column_unpruned: Option<usize>,
    pub time_pruned: Duration,
    pub time_unpruned: Duration,
    pub nodes_pruned: usize,
    pub nodes_unpruned: usize,
    /// unpruned time / pruned time, 0 when the pruned search was too fast to measure
    pub speedup: f64,
}

fn timed_search(
    board: Board,
    depth: usize,
    config: SearchConfig,
) -> Result<(SearchResult, Duration, usize), SearchError> {
    let mut solver = Solver::new(board, BENCHMARK_PLAYER).with_config(config);
    let start = Instant::now();
    let result = solver.search(depth)?;
    Ok((result, start.elapsed(), solver.node_count))
}

/// Searches `board` with and without pruning and records both timings
pub fn measure(
    run: usize,
    depth: usize,
    board: Board,
    config: SearchConfig,
) -> Result<RunRecord, SearchError> {
    let (pruned, time_pruned, nodes_pruned) = timed_search(board, depth, config)?;
    let (unpruned, time_unpruned, nodes_unpruned) =
        timed_search(board, depth, config.without_pruning())?;

    let speedup = if time_pruned > Duration::from_secs(0) {
        time_unpruned.as_secs_f64() / time_pruned.as_secs_f64()
    } else {
        0.0
    };

    Ok(RunRecord {
        run,
        depth,
        moves: board.num_moves(),
        column_pruned: pruned.column,
        column_unpruned: unpruned.column,
        time_pruned,
        time_unpruned,
        nodes_pruned,
        nodes_unpruned,
        speedup,
    })
}

/// Per-depth averages over all runs at that depth
#[derive(Debug, Clone, PartialEq)]
pub struct DepthSummary {
    pub depth: usize,
    pub tier: String,
    pub runs: usize,
    pub avg_time_pruned: Duration,
    pub avg_time_unpruned: Duration,
    pub avg_speedup: f64,
    /// runs where both variants chose the same column
    pub agreeing: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub runs: Vec<RunRecord>,
    pub summary: Vec<DepthSummary>,
}

impl Report {
    /// Groups records by depth (in first-seen order) and averages them
    pub fn new(runs: Vec<RunRecord>, table: &DifficultyTable) -> Self {
        let mut depths: Vec<usize> = Vec::new();
        for record in runs.iter() {
            if !depths.contains(&record.depth) {
                depths.push(record.depth);
            }
        }

        let summary = depths
            .into_iter()
            .map(|depth| {
                let records: Vec<&RunRecord> =
                    runs.iter().filter(|record| record.depth == depth).collect();
                let count = records.len();
                DepthSummary {
                    depth,
                    tier: table.name_for_depth(depth).unwrap_or("custom").to_string(),
                    runs: count,
                    avg_time_pruned: records.iter().map(|r| r.time_pruned).sum::<Duration>()
                        / count as u32,
                    avg_time_unpruned: records.iter().map(|r| r.time_unpruned).sum::<Duration>()
                        / count as u32,
                    avg_speedup: records.iter().map(|r| r.speedup).sum::<f64>() / count as f64,
                    agreeing: records
                        .iter()
                        .filter(|r| r.column_pruned == r.column_unpruned)
                        .count(),
                }
            })
            .collect();

        Self { runs, summary }
    }

    /// Writes one CSV line per run
    pub fn write_runs_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(
            out,
            "run,depth,board_moves,column_with_pruning,column_without_pruning,\
             time_with_pruning_s,time_without_pruning_s,nodes_with_pruning,\
             nodes_without_pruning,speedup"
        )?;
        for record in self.runs.iter() {
            writeln!(
                out,
                "{},{},{},{},{},{:.6},{:.6},{},{},{:.3}",
                record.run,
                record.depth,
                record.moves,
                csv_column(record.column_pruned),
                csv_column(record.column_unpruned),
                record.time_pruned.as_secs_f64(),
                record.time_unpruned.as_secs_f64(),
                record.nodes_pruned,
                record.nodes_unpruned,
                record.speedup
            )?;
        }
        Ok(())
    }

    /// Writes one CSV line per depth
    pub fn write_summary_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(
            out,
            "depth,difficulty,runs,avg_time_with_pruning_s,avg_time_without_pruning_s,avg_speedup,agreeing"
        )?;
        for depth in self.summary.iter() {
            writeln!(
                out,
                "{},{},{},{:.6},{:.6},{:.3},{}",
                depth.depth,
                depth.tier,
                depth.runs,
                depth.avg_time_pruned.as_secs_f64(),
                depth.avg_time_unpruned.as_secs_f64(),
                depth.avg_speedup,
                depth.agreeing
            )?;
        }
        Ok(())
    }
}

fn csv_column(column: Option<usize>) -> String {
    column.map(|c| c.to_string()).unwrap_or_default()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(80);
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{:<10} {:<6} {:<15} {:<15} {:<8}",
            "Difficulty", "Depth", "Avg W/ Pruning", "Avg W/o Pruning", "Speedup"
        )?;
        writeln!(f, "{}", rule)?;
        for depth in self.summary.iter() {
            writeln!(
                f,
                "{:<10} {:<6} {:<15.6} {:<15.6} {:.2}x",
                depth.tier,
                depth.depth,
                depth.avg_time_pruned.as_secs_f64(),
                depth.avg_time_unpruned.as_secs_f64(),
                depth.avg_speedup
            )?;
        }
        write!(f, "{}", rule)
    }
}

/// Runs the whole benchmark described by `config`
pub fn run(
    config: &BenchmarkConfig,
    search: SearchConfig,
    table: &DifficultyTable,
    show_progress: bool,
) -> Result<Report, SearchError> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut jobs = Vec::with_capacity(config.depths.len() * config.runs_per_depth);
    for &depth in config.depths.iter() {
        for run in 1..=config.runs_per_depth {
            let moves = rng.gen_range(config.min_moves..=config.max_moves);
            jobs.push((run, depth, undecided_board(&mut rng, moves)));
        }
    }
    info!(
        "benchmarking {} boards over depths {:?} (seed {})",
        jobs.len(),
        config.depths,
        config.seed
    );

    let progress = if show_progress {
        ProgressBar::new(jobs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Benchmarking: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let records = jobs
        .par_iter()
        .map(|&(run, depth, board)| {
            let record = measure(run, depth, board, search);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>, _>>();
    progress.finish_and_clear();

    let report = Report::new(records?, table);
    for depth in report.summary.iter() {
        info!(
            "depth {}: {:.2}x average speedup, {}/{} runs agree",
            depth.depth, depth.avg_speedup, depth.agreeing, depth.runs
        );
    }
    Ok(report)
}
