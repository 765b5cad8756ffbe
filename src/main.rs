use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use log::warn;

use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Stdin, Write};
use std::path::{Path, PathBuf};
use std::thread;

use connect4_minimax::{
    benchmark,
    board::Player,
    config::AppConfig,
    difficulty::{Tier, TierSelector},
    game::{Game, GameState},
    solver::Solver,
    WIDTH,
};

mod display;

/// Play Connect 4 against a minimax computer opponent.
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against a minimax computer opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "connect4.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game in the terminal (the default)
    Play {
        /// Difficulty tier, by name or 1-based number
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Who moves first
        #[arg(long, value_enum, default_value_t = First::Human)]
        first: First,
    },
    /// Time the search with and without alpha-beta pruning
    Bench {
        /// Override the number of boards searched per depth
        #[arg(long)]
        runs: Option<usize>,

        /// Override the depths to benchmark, e.g. 2,4,5
        #[arg(long, value_delimiter = ',')]
        depths: Option<Vec<usize>>,

        /// Override the random seed for board generation
        #[arg(long)]
        seed: Option<u64>,

        /// Per-run CSV report
        #[arg(long, default_value = "connect4_performance_results.csv")]
        out: PathBuf,

        /// Per-depth CSV summary
        #[arg(long, default_value = "connect4_performance_summary.csv")]
        summary: PathBuf,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum First {
    Human,
    Computer,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        None => play(&config, "medium", First::Human),
        Some(Command::Play { difficulty, first }) => play(&config, &difficulty, first),
        Some(Command::Bench {
            runs,
            depths,
            seed,
            out,
            summary,
            quiet,
        }) => {
            let mut bench_config = config.benchmark.clone();
            if let Some(runs) = runs {
                bench_config.runs_per_depth = runs;
            }
            if let Some(depths) = depths {
                bench_config.depths = depths;
            }
            if let Some(seed) = seed {
                bench_config.seed = seed;
            }
            bench_config.validate()?;

            println!("Starting Connect Four AI Performance Testing...");
            let search = config.search.to_search_config()?;
            let report = benchmark::run(&bench_config, search, &config.difficulty, !quiet)?;

            report.write_runs_csv(create(&out)?)?;
            println!("Results saved to {}", out.display());
            report.write_summary_csv(create(&summary)?)?;
            println!("Summary saved to {}", summary.display());

            println!("\nPerformance Summary:\n{}", report);
            Ok(())
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn play(config: &AppConfig, difficulty: &str, first: First) -> Result<()> {
    let table = &config.difficulty;
    let mut tier: Tier = table.select(&difficulty.parse::<TierSelector>()?)?.clone();
    let computer = match first {
        First::Human => Player::Two,
        First::Computer => Player::One,
    };
    let mut game = Game::new(Player::One, computer, tier.depth)
        .with_search_config(config.search.to_search_config()?);

    let stdin = stdin();

    println!("Welcome to Connect 4\n");
    println!(
        "Difficulty: {} (depth {}). You are {}.",
        tier.name,
        tier.depth,
        computer.other()
    );

    // game loop
    loop {
        display::draw(game.board())?;

        match game.state() {
            GameState::Playing => {}
            // end states
            over => {
                match over {
                    GameState::Won(player) if player == computer => println!("Computer wins!"),
                    GameState::Won(_) => println!("You win!"),
                    _ => println!("Draw!"),
                }
                if ask_yes_no(&stdin, "Play again? y/n: ")? {
                    game.reset();
                    continue;
                }
                break;
            }
        }

        if game.is_computer_turn() {
            let column = think(&game)?;
            println!("Computer plays column {}", column);
            game.play(column)?;
            continue;
        }

        print!(
            "Move input (0-{}, n = new game, d <tier> = difficulty, q = quit) > ",
            WIDTH - 1
        );
        stdout().flush().expect("Failed to flush to stdout!");
        let mut input_str = String::new();
        if stdin.read_line(&mut input_str)? == 0 {
            break;
        }

        match input_str.trim() {
            "q" => break,
            "n" => game.reset(),
            command if command.starts_with("d ") => {
                match table.select(&command[2..].parse::<TierSelector>()?) {
                    Ok(selected) => {
                        tier = selected.clone();
                        game.set_depth(tier.depth);
                        game.reset();
                        println!("Difficulty: {} (depth {}), new game", tier.name, game.depth());
                    }
                    Err(err) => println!("{}", err),
                }
            }
            input => match input.parse::<usize>() {
                Err(_) => println!("Invalid number: {}", input),
                Ok(column) => {
                    if let Err(err) = game.play(column) {
                        println!("Invalid move, {}", err);
                    }
                }
            },
        }
    }
    Ok(())
}

/// Runs the computer's search on a worker thread while a spinner ticks
fn think(game: &Game) -> Result<usize> {
    let snapshot = game.clone();
    let worker = thread::spawn(move || snapshot.computer_move());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Computer is thinking...");
    spinner.enable_steady_tick(100);
    let outcome = worker
        .join()
        .map_err(|_| anyhow!("search thread panicked"))?;
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            warn!("{}, falling back to a one-ply search", err);
            Solver::new(*game.board(), game.computer())
                .with_config(game.search_config().without_limits())
                .search(1)?
        }
    };
    if result.is_forced_win() {
        println!("Computer can force a win.");
    } else if result.is_forced_loss() {
        println!("You can force a win.");
    }
    result
        .column
        .ok_or_else(|| anyhow!("no legal move left for the computer"))
}

fn ask_yes_no(stdin: &Stdin, prompt: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{}", prompt);
        stdout().flush().expect("failed to flush to stdout!");
        if stdin.read_line(&mut buffer)? == 0 {
            return Ok(false);
        }
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}
