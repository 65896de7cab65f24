// Terminal session: a human (X) against an AI opponent (O)
//
// Usage: connect-five [easy|medium|hard] [balanced|aggressive|defensive|tricky] [--seed N]

use log::info;
use std::env;
use std::io::{self, BufRead, Write};

use connect_five::config::Config;
use connect_five::service::GameService;
use connect_five::types::{AiDifficulty, AiPersonality};

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut difficulty = AiDifficulty::Medium;
    let mut personality = AiPersonality::Balanced;
    let mut seed = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--seed" {
            seed = iter.next().and_then(|s| s.parse::<u64>().ok());
        } else if let Some(d) = AiDifficulty::parse(arg) {
            difficulty = d;
        } else if let Some(p) = AiPersonality::parse(arg) {
            personality = p;
        } else {
            eprintln!(
                "Usage: connect-five [easy|medium|hard] [balanced|aggressive|defensive|tricky] [--seed N]"
            );
            std::process::exit(1);
        }
    }

    if let Err(e) = run(difficulty, personality, seed).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(
    difficulty: AiDifficulty,
    personality: AiPersonality,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration once at startup
    let mut service = GameService::new(Config::load_or_default());
    if let Some(seed) = seed {
        service = service.with_seed(seed);
    }

    let mut state =
        service.start_new_game("You", "Computer", true, Some(difficulty), Some(personality))?;
    info!("Playing {} ({})", difficulty.as_str(), personality.as_str());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !state.is_terminal() {
        println!("\n{}", state.board());

        let column = if state.current_player().is_ai() {
            let column = service.get_ai_move_async(&state).await?;
            println!("Computer plays column {}", column);
            column
        } else {
            println!(
                "Your move (win probability {:.0}%), column 0-8:",
                service.win_probability(&state)
            );
            io::stdout().flush()?;
            match lines.next() {
                Some(line) => match line?.trim().parse::<usize>() {
                    Ok(column) => column,
                    Err(_) => {
                        println!("Please enter a column number");
                        continue;
                    }
                },
                None => return Ok(()),
            }
        };

        match service.make_move(&state, column) {
            Ok(next) => state = next,
            Err(e) => println!("{}", e),
        }
    }

    println!("\n{}", state.board());
    match state.winner() {
        Some(winner) => println!("{} wins!", state.player(winner).name),
        None => println!("Draw."),
    }

    Ok(())
}
