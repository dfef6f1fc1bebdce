//! End-to-end board flow: two clients on one session, placement,
//! docked-line propagation, and palette seeding.

use std::sync::Arc;

use processorix::{BoardApp, BoardConfig};
use processorix_model::{FreeLine, Player, Position};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn join_config(code: &str) -> BoardConfig {
    BoardConfig {
        session: code.to_string(),
        ..BoardConfig::default()
    }
}

#[tokio::test]
async fn test_placement_propagates_to_docked_lines_across_clients() {
    let facilitator = BoardApp::open(join_config("ABCD")).unwrap();
    let participant =
        BoardApp::open_on(join_config("ABCD"), Arc::clone(facilitator.store())).unwrap();
    facilitator.settle().await;

    let mut rng = StdRng::seed_from_u64(7);

    // Register a player in the waiting area.
    let player = Player::new(&mut rng, "Avery", "Clerk", "#4a90d9", "A");
    let player_id = player.id.clone();
    facilitator.coordinator().add_player(player).unwrap();
    facilitator.settle().await;

    let cached = facilitator.coordinator().players();
    assert_eq!(cached.len(), 1);
    assert!(!cached[0].on_board);
    assert!(cached[0].position.is_none());

    // Draw a line docked to the player at its provisional position.
    let line = FreeLine::new(
        &mut rng,
        Position::new(10.0, 10.0),
        Position::new(50.0, 50.0),
        "#5c5c5c",
    )
    .docked_from(player_id.clone());
    let line_id = line.id.clone();
    facilitator.coordinator().add_free_line(line).unwrap();
    facilitator.settle().await;

    // First drag: position and placement flag land in one write, and
    // the docked endpoint follows.
    facilitator
        .coordinator()
        .update_player_position(&player_id, Position::new(30.0, 40.0))
        .unwrap();
    facilitator.settle().await;
    participant.settle().await;

    for coordinator in [facilitator.coordinator(), participant.coordinator()] {
        let players = coordinator.players();
        assert!(players[0].on_board);
        assert_eq!(players[0].position, Some(Position::new(30.0, 40.0)));

        let lines = coordinator.free_lines();
        let line = lines.iter().find(|l| l.id == line_id).unwrap();
        assert_eq!(line.start_position, Position::new(30.0, 40.0));
        // The free side is untouched.
        assert_eq!(line.end_position, Position::new(50.0, 50.0));
    }

    participant.close();
    facilitator.close();
}

#[tokio::test]
async fn test_palette_defaults_seed_exactly_once_per_board() {
    let facilitator = BoardApp::open(join_config("WXYZ")).unwrap();
    let participant =
        BoardApp::open_on(join_config("WXYZ"), Arc::clone(facilitator.store())).unwrap();

    facilitator.settle().await;
    participant.settle().await;

    // Both clients observed the empty board, but only the first
    // reconciliation found anything to seed.
    assert_eq!(facilitator.coordinator().objects().len(), 8);
    assert_eq!(participant.coordinator().objects().len(), 8);

    participant.close();
    facilitator.close();
}

#[tokio::test]
async fn test_closing_one_client_leaves_the_board_alive() {
    let facilitator = BoardApp::open(join_config("KLMN")).unwrap();
    let participant =
        BoardApp::open_on(join_config("KLMN"), Arc::clone(facilitator.store())).unwrap();
    facilitator.settle().await;

    participant.close();

    let mut rng = StdRng::seed_from_u64(7);
    facilitator
        .coordinator()
        .add_player(Player::new(&mut rng, "Avery", "Clerk", "#4a90d9", "A"))
        .unwrap();
    facilitator.settle().await;

    assert_eq!(facilitator.coordinator().players().len(), 1);
    facilitator.close();
}
