//! Bot-vs-bot arena: plays series of games between two configured agents, and
//! trains the Q-learning agent against a fixed opponent.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;
use tracing_subscriber::EnvFilter;

use baduk_ai::agent::qlearn::{QLearnParams, QTable};
use baduk_ai::agent::spec::check_board_size;
use baduk_ai::agent::{AgentSpec, QLearnAgent};
use baduk_ai::arena::{self, DEFAULT_MAX_MOVES};
use baduk_ai::board::GoBoard;
use baduk_ai::error::ConfigError;
use baduk_ai::player::Player;

#[derive(Parser)]
#[command(name = "arena", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a series of games between two agents and print the tally.
    Play {
        /// Agent spec for Black, e.g. "random", "alpha_beta:3", "monte_carlo:200:1.5".
        #[arg(long, default_value = "random", value_parser = parse_agent_spec)]
        black: AgentSpec,
        /// Agent spec for White.
        #[arg(long, default_value = "random", value_parser = parse_agent_spec)]
        white: AgentSpec,
        /// Board size (edge length).
        #[arg(long, default_value_t = 9, value_parser = parse_size)]
        size: u8,
        /// Number of games, per side if --both-sides is set.
        #[arg(long, default_value_t = 10)]
        games: u32,
        /// Also play every game with colors swapped.
        #[arg(long)]
        both_sides: bool,
        /// Base RNG seed; every game derives its own agent seeds from it.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Adjudicate by score after this many moves.
        #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
        max_moves: u32,
    },
    /// Train the Q-learning agent against a fixed opponent.
    Train {
        /// Agent spec for the fixed opponent.
        #[arg(long, default_value = "random", value_parser = parse_agent_spec)]
        opponent: AgentSpec,
        /// Color the learner plays.
        #[arg(long, default_value = "black", value_parser = parse_player)]
        color: Player,
        #[arg(long, default_value_t = 5, value_parser = parse_size)]
        size: u8,
        #[arg(long, default_value_t = 1000)]
        episodes: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
        max_moves: u32,
        /// Learning rate.
        #[arg(long, default_value_t = 0.3)]
        alpha: f32,
        /// Discount factor.
        #[arg(long, default_value_t = 0.9)]
        gamma: f32,
        /// Initial exploration rate, decayed per episode.
        #[arg(long, default_value_t = 1.0)]
        epsilon: f32,
        /// Start from a previously saved table instead of an empty one.
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write the trained table to this file as JSON.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn parse_agent_spec(s: &str) -> Result<AgentSpec, ConfigError> {
    s.parse()
}

fn parse_size(s: &str) -> Result<u8, String> {
    let size: u32 = s.parse().map_err(|_| format!("invalid size {:?}", s))?;
    check_board_size(size).map_err(|e| e.to_string())
}

fn parse_player(s: &str) -> Result<Player, String> {
    match s {
        "black" | "b" => Ok(Player::Black),
        "white" | "w" => Ok(Player::White),
        _ => Err(format!("invalid color {:?}, expected black or white", s)),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Play {
            black,
            white,
            size,
            games,
            both_sides,
            seed,
            max_moves,
        } => play(black, white, size, games, both_sides, seed, max_moves),
        Command::Train {
            opponent,
            color,
            size,
            episodes,
            seed,
            max_moves,
            alpha,
            gamma,
            epsilon,
            load,
            save,
        } => train(
            opponent, color, size, episodes, seed, max_moves, alpha, gamma, epsilon, load, save,
        ),
    }
}

fn play(
    black: AgentSpec,
    white: AgentSpec,
    size: u8,
    games: u32,
    both_sides: bool,
    seed: u64,
    max_moves: u32,
) -> anyhow::Result<()> {
    info!(%black, %white, size, games, both_sides, "starting series");

    // every constructed agent gets a distinct seed derived from the base seed
    let next_seed = AtomicU64::new(0);
    let derive_seed = || seed.wrapping_add(next_seed.fetch_add(1, Ordering::Relaxed));

    let result = arena::run(
        || GoBoard::new(size),
        || black.build(derive_seed()),
        || white.build(derive_seed()),
        games,
        both_sides,
        max_moves,
        |_, _| {},
    );

    println!("{:?}", result);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn train(
    opponent: AgentSpec,
    color: Player,
    size: u8,
    episodes: u32,
    seed: u64,
    max_moves: u32,
    alpha: f32,
    gamma: f32,
    epsilon: f32,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    let table = match &load {
        None => QTable::new(),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let table = QTable::load_json(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?;
            info!(entries = table.len(), path = %path.display(), "loaded table");
            table
        }
    };

    let params = QLearnParams {
        alpha,
        gamma,
        epsilon,
        ..QLearnParams::default()
    };
    let mut learner = QLearnAgent::new(params, table, Xoshiro256PlusPlus::seed_from_u64(seed));
    let mut opponent = opponent.build(seed.wrapping_add(1));

    let result = arena::train(&mut learner, &mut opponent, color, size, episodes, max_moves);
    println!("{:?}", result);

    if let Some(path) = save {
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        learner
            .table()
            .save_json(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(entries = learner.table().len(), path = %path.display(), "saved table");
    }

    Ok(())
}
