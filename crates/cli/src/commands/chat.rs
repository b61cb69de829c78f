//! `leasebot chat`: Talk to the bot in the terminal.

use leasebot_agent::DialogueMachine;
use leasebot_config::BotData;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{load_config, open_store};

/// Words that end the session. `exit` is a dialogue keyword, so it is not one of them.
const QUIT_WORDS: &[&str] = &["quit", "/quit", "/exit", ":q"];

pub async fn run(state: Option<String>, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let bot_data = Arc::new(BotData::load(&config.dialogue)?);
    let store = open_store(&config);

    let mut machine = DialogueMachine::new(bot_data, store.clone());
    if let Some(seed) = seed.or(config.dialogue.seed) {
        machine = machine.with_seed(seed);
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Leasebot — Interactive Chat         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Storage:   {}", store.name());
    println!("  Dates:     DD-MM-YYYY");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'quit' or Ctrl+C to leave.");
    println!();

    let opening = match state {
        Some(name) => machine.restore_state(&name),
        None => machine.greet(),
    };
    print_reply(&opening);
    prompt()?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if QUIT_WORDS.contains(&line) {
            break;
        }

        let reply = machine.respond(line);
        let snapshot = machine.snapshot();
        debug!(
            state = %snapshot.state,
            previous = %snapshot.previous,
            complete = snapshot.data.is_complete(),
            "Dialogue position"
        );

        print_reply(&reply);
        prompt()?;
    }

    println!();
    println!("  👋 Goodbye!");
    Ok(())
}

fn print_reply(reply: &str) {
    let mut lines = reply.lines();
    if let Some(first) = lines.next() {
        println!("  Leasebot > {first}");
    }
    for line in lines {
        println!("             {line}");
    }
    println!();
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
