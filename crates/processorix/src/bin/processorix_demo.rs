//! # Processorix Demo
//!
//! Drives a full board flow headlessly: open a session, register
//! players, draw docked lines, move a player, and show the propagated
//! state.
//!
//! ```bash
//! # Create a fresh board
//! ./processorix_demo
//!
//! # Join (or materialize) a specific code
//! ./processorix_demo --session QX7B
//!
//! # Load settings from a file
//! ./processorix_demo --config board.toml
//! ```

use std::path::Path;
use std::process::ExitCode;

use processorix::{BoardApp, BoardConfig};
use processorix_model::{FreeLine, Player, Position};

fn parse_args() -> Result<BoardConfig, String> {
    let mut config: Option<BoardConfig> = None;
    let mut session: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let loaded = BoardConfig::load(Path::new(&path)).map_err(|e| e.to_string())?;
                config = Some(loaded);
            }
            "--session" => {
                session = Some(args.next().ok_or("--session needs a code")?);
            }
            "--help" | "-h" => {
                return Err("usage: processorix_demo [--config PATH] [--session CODE]".to_string());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    let mut config = config.unwrap_or_default();
    if let Some(session) = session {
        config.session = session;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    PROCESSORIX DEMO v0.1.0");
    println!("                        HEADLESS MODE");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    // === OPEN BOARD ===
    let app = match BoardApp::open(config) {
        Ok(app) => app,
        Err(error) => {
            eprintln!("   ✗ FATAL: failed to open board: {error}");
            return ExitCode::FAILURE;
        }
    };
    println!("🗂  Board open");
    println!("   Session code: {}", app.session());
    println!("   View mode:    {:?}", app.config().view_mode);
    println!();

    // === PALETTE DEFAULTS ===
    app.settle().await;
    let objects = app.coordinator().objects();
    println!("🎨 Palette seeded: {} objects", objects.len());
    for object in &objects {
        println!("   {} {} ({})", object.icon, object.name, object.category.tag());
    }
    println!();

    // === REGISTER PLAYERS ===
    let coordinator = app.coordinator();
    let mut rng = rand::thread_rng();

    let clerk = Player::new(&mut rng, "Avery", "Clerk", "#4a90d9", "🧾");
    let customer = Player::new(&mut rng, "Sam", "Customer", "#2bb673", "🙂");
    let clerk_id = clerk.id.clone();
    let customer_id = customer.id.clone();
    if let Err(error) = coordinator.add_player(clerk) {
        eprintln!("   ✗ FATAL: {error}");
        return ExitCode::FAILURE;
    }
    if let Err(error) = coordinator.add_player(customer) {
        eprintln!("   ✗ FATAL: {error}");
        return ExitCode::FAILURE;
    }
    app.settle().await;
    println!("👥 Players registered: {}", coordinator.players().len());

    // === PLACE AND CONNECT ===
    let placed = coordinator.update_player_position(&customer_id, Position::new(80.0, 80.0));
    if let Err(error) = placed {
        eprintln!("   ✗ FATAL: {error}");
        return ExitCode::FAILURE;
    }
    app.settle().await;

    let line = FreeLine::new(
        &mut rng,
        Position::new(10.0, 10.0),
        Position::new(80.0, 80.0),
        "#5c5c5c",
    )
    .docked_from(clerk_id.clone())
    .docked_to(customer_id.clone());
    let line_id = line.id.clone();
    if let Err(error) = coordinator.add_free_line(line) {
        eprintln!("   ✗ FATAL: {error}");
        return ExitCode::FAILURE;
    }

    let card = coordinator.add_card(
        Some(clerk_id.clone()),
        Some(customer_id.clone()),
        "Hand over the signed form",
    );
    match card {
        Ok(Some(id)) => println!("🪪 Process step created: {id}"),
        Ok(None) => println!("🪪 Process step dropped (no session)"),
        Err(error) => {
            eprintln!("   ✗ FATAL: {error}");
            return ExitCode::FAILURE;
        }
    }
    app.settle().await;

    // === MOVE A PLAYER, WATCH THE LINE FOLLOW ===
    println!();
    println!("🚚 Moving Avery to (30, 40)...");
    if let Err(error) = coordinator.update_player_position(&clerk_id, Position::new(30.0, 40.0)) {
        eprintln!("   ✗ FATAL: {error}");
        return ExitCode::FAILURE;
    }
    app.settle().await;

    for line in coordinator.free_lines() {
        if line.id == line_id {
            println!(
                "   Line {}: start ({}, {}) end ({}, {})",
                line.id,
                line.start_position.x,
                line.start_position.y,
                line.end_position.x,
                line.end_position.y
            );
        }
    }
    for player in coordinator.players() {
        let place = if player.on_board { "on board" } else { "waiting" };
        println!("   Player {} [{place}]: {:?}", player.name, player.position);
    }

    println!();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                         DEMO COMPLETE");
    println!("═══════════════════════════════════════════════════════════════════");

    app.close();
    ExitCode::SUCCESS
}
