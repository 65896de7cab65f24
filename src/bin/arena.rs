//! Strategy Arena
//!
//! Plays a series of headless games between two AI configurations and
//! reports the tally. Seats alternate every game so neither side keeps the
//! first-move advantage.
//!
//! Usage:
//!   cargo run --release --bin arena -- <difficulty[:personality]> <difficulty[:personality]> [games] [seed]
//!
//! Example:
//!   cargo run --release --bin arena -- hard:aggressive medium 20 7

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

use connect_five::cancel::CancelToken;
use connect_five::config::Config;
use connect_five::state::GameState;
use connect_five::strategy::{create_strategy, DecisionStrategy};
use connect_five::types::{AiDifficulty, AiPersonality, Player, PlayerId};

#[derive(Debug, Clone, Copy)]
struct Contender {
    difficulty: AiDifficulty,
    personality: Option<AiPersonality>,
}

impl Contender {
    fn parse(arg: &str) -> Result<Self, String> {
        let mut parts = arg.split(':');
        let difficulty = parts
            .next()
            .and_then(AiDifficulty::parse)
            .ok_or_else(|| format!("Invalid difficulty in '{}'", arg))?;
        let personality = match parts.next() {
            Some(p) => Some(
                AiPersonality::parse(p).ok_or_else(|| format!("Invalid personality in '{}'", arg))?,
            ),
            None => None,
        };
        Ok(Contender {
            difficulty,
            personality,
        })
    }

    fn label(&self) -> String {
        match self.personality {
            Some(p) => format!("{}:{}", self.difficulty.as_str(), p.as_str()),
            None => self.difficulty.as_str().to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    first_wins: usize,
    second_wins: usize,
    draws: usize,
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <difficulty[:personality]> <difficulty[:personality]> [games] [seed]",
            args[0]
        );
        eprintln!("Example: {} hard:aggressive medium 20 7", args[0]);
        std::process::exit(1);
    }

    let contenders = match (Contender::parse(&args[1]), Contender::parse(&args[2])) {
        (Ok(a), Ok(b)) => [a, b],
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let games = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0u64);

    let config = Config::load_or_default();
    let mut tally = Tally::default();

    for game in 0..games {
        // Swap seats on odd games
        let seats = if game % 2 == 0 {
            [contenders[0], contenders[1]]
        } else {
            [contenders[1], contenders[0]]
        };

        let mut strategies: Vec<Box<dyn DecisionStrategy>> = seats
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let rng = StdRng::seed_from_u64(seed.wrapping_mul(31).wrapping_add((game * 2 + i) as u64));
                create_strategy(c.difficulty, c.personality, &config, rng, CancelToken::new())
            })
            .collect();

        let final_state = match play_game(&seats, &mut strategies) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Game {} aborted: {}", game + 1, e);
                continue;
            }
        };

        let winner_index = final_state.winner().map(|w| match w {
            PlayerId::One => game % 2,
            PlayerId::Two => (game + 1) % 2,
        });
        match winner_index {
            Some(0) => tally.first_wins += 1,
            Some(_) => tally.second_wins += 1,
            None => tally.draws += 1,
        }

        info!(
            "Game {}: {:?} in {} moves",
            game + 1,
            final_state.status(),
            final_state.board().piece_count()
        );
    }

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    ARENA REPORT");
    println!("═══════════════════════════════════════════════════════════");
    println!("Games:          {}", games);
    println!("{:<15} {} wins", contenders[0].label(), tally.first_wins);
    println!("{:<15} {} wins", contenders[1].label(), tally.second_wins);
    println!("Draws:          {}", tally.draws);
    println!("═══════════════════════════════════════════════════════════\n");
}

/// Plays one game to completion with `strategies[0]` as player 1
fn play_game(
    seats: &[Contender; 2],
    strategies: &mut [Box<dyn DecisionStrategy>],
) -> Result<GameState, connect_five::error::GameError> {
    let mut state = GameState::new(
        Player::ai(PlayerId::One, &seats[0].label(), seats[0].difficulty),
        Player::ai(PlayerId::Two, &seats[1].label(), seats[1].difficulty),
    );

    while !state.is_terminal() {
        let seat = match state.current_player_id() {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        };
        let column = strategies[seat].next_move(&state);
        state = state.apply_move(column)?;
    }

    Ok(state)
}
