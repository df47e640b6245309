//! Integration tests for combat through the public game API.
//!
//! Run with: `cargo test -p tilequest-core --test combat_flow`

use tilequest_core::config::NpcKind;
use tilequest_core::events::{EventKind, RED, WHITE};
use tilequest_core::items::{breastplate, helmet, sword, ArmorSlot};
use tilequest_core::testing::{assert_alive, assert_dead, assert_hp, assert_message, TestHarness};
use tilequest_core::{
    Character, Coordinate, Direction, EquipSlot, GameConfig, GameError, GameEvent, Item,
    MoveOutcome, Quality,
};

fn harness_with_swordsman_at(at: Coordinate) -> TestHarness {
    TestHarness::with_config(GameConfig::empty().with_npc(NpcKind::Swordsman, at))
        .expect("harness should build")
}

// =============================================================================
// TEST 1: Damage formula end to end
// =============================================================================

#[test]
fn test_armed_player_deals_full_damage_to_unarmored() {
    let mut harness = harness_with_swordsman_at(Coordinate::new(0, 1));
    harness
        .player_mut()
        .expect("player")
        .equip_item(sword(Quality::Regular))
        .expect("sword equips");

    let npc = harness.game.zone().npc_ids()[0];
    let damage = harness.game.attack(npc).expect("attack should resolve");

    assert_eq!(damage, 35.0);
    assert_eq!(harness.character(npc).expect("npc").health(), 65.0);
    assert_message(&harness, "You deal 35 damage to Swordsman.");
}

#[test]
fn test_armor_cap_lets_a_fifth_through() {
    let mut harness = TestHarness::new().expect("harness should build");
    let mut tank = Character::swordsman();
    tank.equip_item(Item::armor("Tower Plate", ArmorSlot::Shirt, 56.0))
        .expect("armor equips");
    let tank = harness.spawn(tank, Coordinate::new(1, 0)).expect("free tile");

    harness
        .player_mut()
        .expect("player")
        .equip_item(sword(Quality::Regular))
        .expect("sword equips");
    let damage = harness.game.attack(tank).expect("attack should resolve");

    assert_eq!(damage, 7.0);
    assert_message(&harness, "You deal 7 damage to Swordsman.");
}

#[test]
fn test_worn_armor_softens_npc_blows() {
    let mut harness = harness_with_swordsman_at(Coordinate::new(1, 1));
    {
        let player = harness.player_mut().expect("player");
        player.equip_item(helmet()).expect("helmet equips");
        player.equip_item(breastplate()).expect("breastplate equips");
        assert_eq!(player.calc_defense(), 30.0);
    }

    harness.game.end_turn().expect("round should run");

    // 35 * (1 - 30/70) = 20, twice
    assert_hp(&harness, 60.0);
    assert_message(&harness, "Swordsman deals 20 damage to you.");
}

// =============================================================================
// TEST 2: Moving into a character attacks it
// =============================================================================

#[test]
fn test_bump_attack_does_not_move() {
    let mut harness = harness_with_swordsman_at(Coordinate::new(1, 1));
    let npc = harness.game.zone().npc_ids()[0];

    let outcome = harness
        .game
        .move_player(Direction::SouthEast)
        .expect("bump should resolve");

    assert_eq!(
        outcome,
        MoveOutcome::Attacked {
            target: npc,
            damage: 20.0
        }
    );
    assert_eq!(harness.player_position(), Some(Coordinate::new(0, 0)));
    assert_eq!(harness.player_ap(), 50);
}

// =============================================================================
// TEST 3: Death sequencing
// =============================================================================

#[test]
fn test_kill_sequence_and_corpse() {
    let mut harness = harness_with_swordsman_at(Coordinate::new(0, 1));
    let npc = harness.game.zone().npc_ids()[0];
    harness.character_mut(npc).expect("npc").stats.health.current = 20.0;

    harness.game.attack(npc).expect("attack should resolve");

    assert_dead(&harness, npc);
    assert!(harness.game.zone().npc_ids().is_empty());
    assert!(harness.game.zone().character_at(Coordinate::new(0, 1)).is_none());

    let messages: Vec<GameEvent> = harness
        .log
        .events()
        .into_iter()
        .filter(|e| e.kind() == EventKind::Message)
        .collect();
    assert_eq!(
        messages,
        vec![
            GameEvent::message(WHITE, "You deal 20 damage to Swordsman."),
            GameEvent::message(RED, "Swordsman has died."),
        ]
    );

    // The corpse cannot be attacked again
    assert!(matches!(
        harness.game.attack(npc),
        Err(GameError::CharacterDead(name)) if name == "Swordsman"
    ));

    // The tile is free to walk into now
    let outcome = harness.game.move_player(Direction::East).expect("move");
    assert_eq!(outcome, MoveOutcome::Moved(Coordinate::new(0, 1)));
}

#[test]
fn test_player_death_ends_control() {
    let config = GameConfig::empty()
        .with_player_health(35.0)
        .with_npc(NpcKind::Swordsman, Coordinate::new(1, 0));
    let mut harness = TestHarness::with_config(config).expect("harness should build");
    let player = harness.game.player_id().expect("player");

    harness.game.end_turn().expect("round should run");

    assert_dead(&harness, player);
    assert_message(&harness, "You have died.");
    assert_eq!(
        harness
            .log
            .messages()
            .iter()
            .filter(|m| m.as_str() == "You have died.")
            .count(),
        1
    );
    assert!(matches!(
        harness.game.end_turn(),
        Err(GameError::CharacterDead(_))
    ));
}

#[test]
fn test_wounded_npc_survives_glancing_blow() {
    let mut harness = harness_with_swordsman_at(Coordinate::new(0, 1));
    let npc = harness.game.zone().npc_ids()[0];
    harness.character_mut(npc).expect("npc").stats.health.current = 21.0;

    harness.game.attack(npc).expect("attack should resolve");
    assert_alive(&harness, npc);
    assert_eq!(harness.character(npc).expect("npc").health(), 1.0);
}

// =============================================================================
// TEST 4: Equipment through commands
// =============================================================================

#[test]
fn test_swap_weapons_returns_old_one_to_pack() {
    let mut harness = TestHarness::new().expect("harness should build");
    let regular = sword(Quality::Regular);
    let fine = sword(Quality::Fine);
    let (regular_id, fine_id) = (regular.id, fine.id);
    harness.game.add_item(regular).expect("fits");
    harness.game.add_item(fine).expect("fits");

    harness.game.equip(regular_id).expect("equip regular");
    harness.game.equip(fine_id).expect("equip fine");

    let player = harness.player().expect("player");
    assert_eq!(
        player.equipped(EquipSlot::Weapon).map(|i| i.id),
        Some(fine_id)
    );
    assert!(player.inventory.contains(regular_id));
    assert!(!player.inventory.contains(fine_id));
    assert!((player.inventory.current_weight() - 10.0).abs() < 1e-9);
}

#[test]
fn test_equipping_a_potion_is_rejected() {
    let mut harness = TestHarness::with_config(GameConfig::new().without_npcs())
        .expect("harness should build");
    let potion = harness
        .player()
        .expect("player")
        .inventory
        .items()
        .iter()
        .find(|i| i.as_consumable().is_some())
        .map(|i| i.id)
        .expect("starting potion");

    assert!(matches!(
        harness.game.equip(potion),
        Err(GameError::Inventory(_))
    ));
    assert!(harness.player().expect("player").inventory.contains(potion));
}

#[test]
fn test_loot_picked_up_from_tile_can_be_worn() {
    let mut harness = TestHarness::new().expect("harness should build");
    let loot = helmet();
    let loot_id = loot.id;
    harness
        .drop_on(Coordinate::new(0, 1), loot)
        .expect("tile in bounds");

    // Nothing to pick up where the player stands
    assert!(matches!(
        harness.game.pick_up(loot_id),
        Err(GameError::Zone(_))
    ));

    harness.game.move_player(Direction::East).expect("move");
    harness.game.pick_up(loot_id).expect("pick up");
    assert!(harness
        .game
        .zone()
        .get_tile(Coordinate::new(0, 1))
        .expect("tile")
        .items()
        .is_empty());

    harness.game.equip(loot_id).expect("equip helmet");
    let player = harness.player().expect("player");
    assert_eq!(player.calc_defense(), 10.0);
    assert_eq!(
        player.equipped(EquipSlot::Headwear).map(|i| i.id),
        Some(loot_id)
    );
}
