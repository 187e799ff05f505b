//! nrow-ai: computer opponent for N-in-a-row on 3x3 to 9x9 boards.
//!
//! ## Usage
//!
//! - `nrow-ai` - Show a demo game
//! - `nrow-ai serve` - Answer JSON move requests line by line on stdin/stdout
//! - `nrow-ai move [FILE]` - Answer a single JSON request from FILE or stdin
//! - `nrow-ai demo --size 7 --x hard --o medium` - Watch two tiers play

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nrow_ai::board::{Board, Mark, Move, Outcome};
use nrow_ai::engine::Engine;
use nrow_ai::protocol::{MoveRequest, Server};
use nrow_ai::strategy::Difficulty;

/// nrow-ai: an N-in-a-row move engine
#[derive(Parser)]
#[command(name = "nrow-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for all random choices (entropy when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer newline-delimited JSON move requests on stdin
    Serve,
    /// Answer one JSON move request read from FILE (or stdin)
    Move {
        file: Option<PathBuf>,
    },
    /// Play a game between two difficulty tiers and print every position
    Demo {
        /// Board side length (3 to 9)
        #[arg(long, default_value_t = 5)]
        size: usize,
        /// Difficulty playing x
        #[arg(long, default_value = "hard", value_parser = Difficulty::parse)]
        x: Difficulty,
        /// Difficulty playing o
        #[arg(long, default_value = "medium", value_parser = Difficulty::parse)]
        o: Difficulty,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = match cli.seed {
        Some(seed) => Engine::with_seed(seed),
        None => Engine::new(),
    };

    match cli.command {
        Some(Commands::Serve) => {
            let mut server = Server::new(engine);
            server
                .run(io::stdin().lock(), io::stdout().lock())
                .context("serving requests")?;
        }
        Some(Commands::Move { file }) => {
            let text = match &file {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading request from stdin")?;
                    buf
                }
            };
            let request: MoveRequest =
                serde_json::from_str(&text).context("parsing move request")?;
            let response = Server::new(engine).respond(request);
            println!("{}", serde_json::to_string(&response)?);
        }
        Some(Commands::Demo { size, x, o }) => run_demo(engine, size, x, o)?,
        None => run_demo(engine, 5, Difficulty::Hard, Difficulty::Medium)?,
    }
    Ok(())
}

fn run_demo(mut engine: Engine, size: usize, x: Difficulty, o: Difficulty) -> Result<()> {
    println!("nrow-ai: {size}x{size}, x={x} vs o={o}\n");

    let mut board = Board::square(size);
    let mut last: Option<Move> = None;
    let mut mark = Mark::X;
    loop {
        let difficulty = if mark == Mark::X { x } else { o };
        let result = engine
            .play(board, Some(mark), difficulty, last)
            .with_context(|| format!("{mark} to move"))?;
        board = result.board;
        last = result.mv;
        if let Some(mv) = result.mv {
            println!("{mark} plays ({}, {})", mv.row, mv.column);
        }
        println!("{board}");

        match result.outcome {
            Outcome::Win(winner) => {
                println!("{winner} wins");
                break;
            }
            Outcome::Draw => {
                println!("draw");
                break;
            }
            Outcome::InProgress => mark = mark.opponent(),
        }
    }
    Ok(())
}
