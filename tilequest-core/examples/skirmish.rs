//! Drive a short headless skirmish and print what happened.
//!
//! Run with: `RUST_LOG=tilequest_core=debug cargo run -p tilequest-core --example skirmish`

use tilequest_core::headless::{Command, HeadlessGame};
use tilequest_core::{Direction, GameConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Skirmish ===\n");

    let mut game = HeadlessGame::new(GameConfig::new().with_seed(42))?;
    println!("{}\n", game.zone_view().render());

    // Arm up first
    if let Some(sword) = game
        .inventory_view()
        .and_then(|inv| inv.items.iter().find(|e| e.name == "Regular Sword").map(|e| e.id))
    {
        game.send(Command::Equip(sword))?;
    }

    let plan = [
        Command::Move(Direction::SouthEast),
        Command::Move(Direction::SouthEast),
        Command::Move(Direction::South),
        Command::EndTurn,
        Command::Move(Direction::South),
        Command::EndTurn,
    ];

    for (turn, command) in plan.into_iter().enumerate() {
        match game.send(command) {
            Ok(response) => println!(
                "{:>2}. HP {}/{}  AP {}  {}",
                turn + 1,
                response.current_hp,
                response.max_hp,
                response.action_points,
                response.messages.join(" | ")
            ),
            Err(e) => println!("{:>2}. rejected: {e}", turn + 1),
        }
        if !game.game().is_player_alive() {
            break;
        }
    }

    println!("\n{}", game.zone_view().render());
    println!("\nRounds played: {}", game.rounds());
    println!("Message log:");
    for message in game.messages() {
        println!("  {message}");
    }
    Ok(())
}
