//! Draughts-Search: command-line driver.
//!
//! ## Usage
//!
//! - `draughts-search` - Play a short engine-vs-engine game
//! - `draughts-search selfplay` - Play an engine-vs-engine game
//! - `draughts-search analyze` - Score every move of the opening position

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use draughts_search::board::Player;
use draughts_search::config::{OpponentModel, SearchConfig, Traversal};
use draughts_search::constants::{DEFAULT_COLS, DEFAULT_DEPTH_LIMIT, DEFAULT_ROWS};
use draughts_search::engine::{Engine, Outcome};
use draughts_search::state::GameState;

/// Draughts-Search: minimax move recommendations for checkers
#[derive(Parser)]
#[command(name = "draughts-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the engine play both sides
    Selfplay {
        #[command(flatten)]
        game: GameArgs,
        /// Stop after this many plies
        #[arg(long, default_value_t = 40)]
        turns: usize,
    },
    /// List every move of the starting position with its score
    Analyze {
        #[command(flatten)]
        game: GameArgs,
    },
}

#[derive(Args, Clone)]
struct GameArgs {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
    /// Plies searched below the current position
    #[arg(short, long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    depth: usize,
    #[arg(long, value_enum, default_value_t = Opponent::Adversarial)]
    opponent: Opponent,
    /// Side to move first
    #[arg(long, value_enum, default_value_t = First::Bottom)]
    first: First,
    /// Seed for `--first random`
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = TraversalArg::Auto)]
    traversal: TraversalArg,
    /// Keep up to this many memoized states between turns
    #[arg(long)]
    retain_memo: Option<usize>,
}

impl Default for GameArgs {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            depth: 4,
            opponent: Opponent::Adversarial,
            first: First::Bottom,
            seed: None,
            traversal: TraversalArg::Auto,
            retain_memo: None,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Opponent {
    Adversarial,
    Chance,
}

#[derive(Copy, Clone, ValueEnum)]
enum First {
    Top,
    Bottom,
    Random,
}

#[derive(Copy, Clone, ValueEnum)]
enum TraversalArg {
    Recursive,
    Iterative,
    Auto,
}

impl GameArgs {
    fn config(&self) -> SearchConfig {
        let opponent = match self.opponent {
            Opponent::Adversarial => OpponentModel::Adversarial,
            Opponent::Chance => OpponentModel::Chance,
        };
        let traversal = match self.traversal {
            TraversalArg::Recursive => Traversal::Recursive,
            TraversalArg::Iterative => Traversal::Iterative,
            TraversalArg::Auto => Traversal::Auto,
        };
        SearchConfig::default()
            .with_depth_limit(self.depth)
            .with_opponent(opponent)
            .with_traversal(traversal)
            .with_memo_retention(self.retain_memo)
    }

    fn first_player(&self) -> Player {
        match self.first {
            First::Top => Player::Top,
            First::Bottom => Player::Bottom,
            First::Random => {
                let mut rng = match self.seed {
                    Some(seed) => fastrand::Rng::with_seed(seed),
                    None => fastrand::Rng::new(),
                };
                Player::random(&mut rng)
            }
        }
    }

    fn engine(&self) -> Result<Engine> {
        let state = GameState::standard(self.rows, self.cols, self.first_player())
            .with_context(|| format!("creating a {}x{} board", self.rows, self.cols))?;
        Engine::new(state, self.config()).context("configuring the search")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Some(Commands::Selfplay { game, turns }) => run_selfplay(&game, turns),
        Some(Commands::Analyze { game }) => run_analyze(&game),
        None => run_selfplay(&GameArgs::default(), 10),
    }
}

fn run_selfplay(game: &GameArgs, turns: usize) -> Result<()> {
    let mut engine = game.engine()?;
    info!(
        "self-play on {}x{}, depth {}, {} moves first",
        game.rows,
        game.cols,
        game.depth,
        engine.state().turn()
    );

    for ply in 1..=turns {
        let mover = engine.state().turn();
        match engine.play_best()? {
            Some(rec) => println!("{ply}:\t{mover}\t{} [Score: {}]", rec.mv, rec.score),
            None => break,
        }
    }

    match engine.outcome() {
        Outcome::Ongoing => println!("Stopped after {} plies", engine.history().len()),
        Outcome::Winner(p) => println!("Winner: {p}"),
        Outcome::Stalled(p) => println!("{p} has no legal move"),
        Outcome::Empty => println!("No pieces left"),
    }
    Ok(())
}

fn run_analyze(game: &GameArgs) -> Result<()> {
    let mut engine = game.engine()?;
    println!("{} to move", engine.state().turn());
    for rec in engine.recommend()? {
        let marker = if rec.winning_move { " (wins)" } else { "" };
        println!("{}:\t{} [Score: {}]{marker}", rec.index + 1, rec.mv, rec.score);
    }
    Ok(())
}
