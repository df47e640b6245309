//! Integration tests for the turn cycle: rounds, action points, status
//! effects and NPC behaviour between player commands.
//!
//! Run with: `cargo test -p tilequest-core --test turn_cycle`

use tilequest_core::config::NpcKind;
use tilequest_core::events::EventKind;
use tilequest_core::headless::{Command, HeadlessGame};
use tilequest_core::testing::{assert_ap, assert_at, assert_hp, TestHarness};
use tilequest_core::{
    Character, Coordinate, Direction, Game, GameConfig, ScriptedChooser,
};

// =============================================================================
// TEST 1: Action points drive rounds
// =============================================================================

#[test]
fn test_single_step_runs_one_round() {
    let mut harness = TestHarness::new().expect("harness should build");

    harness
        .game
        .move_player(Direction::East)
        .expect("move should succeed");

    assert_eq!(harness.game.rounds(), 1);
    assert_ap(&harness, 100);
    assert_eq!(harness.player_position(), Some(Coordinate::new(0, 1)));
    assert_eq!(harness.log.state_changes(), 1);
    assert_eq!(harness.log.count(EventKind::TurnOver), 0);
}

#[test]
fn test_two_attacks_per_round() {
    let mut harness = TestHarness::new().expect("harness should build");
    let dummy = harness
        .spawn(Character::npc("Dummy"), Coordinate::new(0, 1))
        .expect("free tile");
    // Zero speed: the dummy never gets AP to hit back
    harness.character_mut(dummy).expect("dummy").stats.speed.current = 0;

    harness.game.attack(dummy).expect("first attack");
    assert_eq!(harness.game.rounds(), 0);
    assert_ap(&harness, 50);

    harness.game.attack(dummy).expect("second attack");
    assert_eq!(harness.game.rounds(), 1);
    assert_ap(&harness, 100);
    assert_eq!(harness.character(dummy).expect("dummy").health(), 60.0);
}

#[test]
fn test_voluntary_end_turn() {
    let mut harness = TestHarness::new().expect("harness should build");
    harness.game.end_turn().expect("end turn");
    harness.game.end_turn().expect("end turn");
    assert_eq!(harness.game.rounds(), 2);
    assert_ap(&harness, 100);
    assert_eq!(harness.log.state_changes(), 2);
}

#[test]
fn test_overspent_ap_recovers_over_rounds() {
    let mut harness = TestHarness::new().expect("harness should build");
    harness.player_mut().expect("player").stats.action_points = -220;

    harness.game.end_turn().expect("end turn");

    // -220 -> -120 -> -20 -> 80
    assert_eq!(harness.game.rounds(), 3);
    assert_ap(&harness, 80);
    assert_eq!(harness.log.state_changes(), 1);
}

// =============================================================================
// TEST 2: Status effects tick at turn start
// =============================================================================

#[test]
fn test_potion_heals_each_round_until_spent() {
    let mut harness = TestHarness::with_config(GameConfig::new().without_npcs())
        .expect("harness should build");
    assert_hp(&harness, 50.0);

    let potion = harness
        .player()
        .expect("player")
        .inventory
        .items()
        .iter()
        .find(|i| i.as_consumable().is_some())
        .map(|i| i.id)
        .expect("starting potion");
    harness.game.consume(potion).expect("drink");

    for expected in [55.0, 60.0, 65.0, 70.0, 75.0, 75.0] {
        harness.game.end_turn().expect("end turn");
        assert_hp(&harness, expected);
    }
    assert!(harness.player().expect("player").status_effects.is_empty());
}

#[test]
fn test_heal_stops_at_max() {
    let mut harness = TestHarness::new().expect("harness should build");
    harness
        .game
        .add_item(tilequest_core::items::health_potion(30.0, 3.0))
        .expect("fits");
    let potion = harness.player().expect("player").inventory.items()[0].id;
    harness.player_mut().expect("player").stats.health.current = 60.0;

    harness.game.consume(potion).expect("drink");
    harness.game.end_turn().expect("end turn");
    assert_hp(&harness, 90.0);
    harness.game.end_turn().expect("end turn");
    assert_hp(&harness, 100.0);
}

// =============================================================================
// TEST 3: NPC behaviour between commands
// =============================================================================

#[test]
fn test_swordsman_closes_in_then_strikes() {
    // Default scenario: player at (0, 0), swordsman at (4, 2)
    let mut harness = TestHarness::with_config(GameConfig::new().with_player_health(100.0))
        .expect("harness should build");
    let npc = harness.game.zone().npc_ids()[0];

    harness.game.end_turn().expect("round 1");
    assert_at(&harness, npc, Coordinate::new(3, 1));

    harness.game.end_turn().expect("round 2");
    assert_at(&harness, npc, Coordinate::new(2, 0));

    harness.game.end_turn().expect("round 3");
    assert_at(&harness, npc, Coordinate::new(1, 0));
    assert_hp(&harness, 100.0);

    harness.game.end_turn().expect("round 4");
    assert_hp(&harness, 30.0);
    assert_eq!(harness.log.count(EventKind::Move), 3);
}

#[test]
fn test_npcs_act_in_placement_order() {
    let config = GameConfig::empty()
        .with_player_health(100.0)
        .with_npc(NpcKind::Swordsman, Coordinate::new(1, 0));
    let mut harness = TestHarness::with_config(config).expect("harness should build");
    harness
        .spawn(Character::npc("Brawler"), Coordinate::new(1, 1))
        .expect("free tile");

    harness.game.end_turn().expect("round");

    assert_eq!(
        harness.messages(),
        vec![
            "Swordsman deals 35 damage to you.",
            "Swordsman deals 35 damage to you.",
            "Brawler deals 20 damage to you.",
            "Brawler deals 20 damage to you.",
            "You have died.",
        ]
    );
    assert!(!harness.game.is_player_alive());
    assert_hp(&harness, 0.0);
}

#[test]
fn test_wanderers_without_player() {
    let mut game = Game::new(GameConfig::empty().with_npc(NpcKind::Swordsman, Coordinate::new(5, 5)))
        .expect("valid config")
        .with_chooser(ScriptedChooser::new([7, 0]));
    game.initialize().expect("initialize");
    let player = game.player_id().expect("player");
    game.zone_mut().take_character(player);
    let npc = game.zone().npc_ids()[0];

    game.take_turn().expect("round");
    assert_eq!(
        game.zone().character(npc).expect("npc").position(),
        Some(Coordinate::new(6, 6))
    );

    game.take_turn().expect("round");
    assert_eq!(
        game.zone().character(npc).expect("npc").position(),
        Some(Coordinate::new(5, 5))
    );
}

// =============================================================================
// TEST 4: Headless play
// =============================================================================

#[test]
fn test_headless_session_stays_bounded() {
    let mut game = HeadlessGame::new(GameConfig::new().with_seed(1234)).expect("game");

    let keys = ["Numpad3", "Numpad3", "KeyS", "Space", "KeyD", "Numpad5"];
    for key in keys {
        let command = Command::from_key(key).expect("mapped key");
        // Walking into the wall or acting after death is allowed to fail
        if let Ok(response) = game.send(command) {
            assert!(response.action_points <= 100);
        }
    }

    assert!(game.rounds() <= 6 * game.game().config().round_limit);
    let view = game.zone_view();
    assert_eq!(view.rows.len(), 10);
    assert!(view.render().contains('S') || !game.messages().is_empty());
}

#[test]
fn test_headless_player_view_tracks_equipment() {
    let mut game = HeadlessGame::new(GameConfig::new().without_npcs()).expect("game");
    let sword = game
        .inventory_view()
        .expect("inventory")
        .items
        .iter()
        .find(|e| e.name == "Regular Sword")
        .map(|e| e.id)
        .expect("starting sword");

    game.send(Command::Equip(sword)).expect("equip");
    let view = game.player_view().expect("player");
    assert_eq!(
        view.equipped(tilequest_core::EquipSlot::Weapon),
        Some("Regular Sword")
    );
    assert_eq!(game.inventory_view().expect("inventory").names(), vec!["Health Potion"]);
}
