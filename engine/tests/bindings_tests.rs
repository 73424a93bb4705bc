//! Bindings Tests - Per-Player Lookup, Merging, and Persistence
//!
//! Exercises binding resolution through the public API the way a settings
//! screen and the controls dispatcher use it.

use std::collections::HashSet;

use stride_engine::entity::Archetype;
use stride_engine::input::{
    ActionObject, Bindings, BindingsObject, InputDevice, InputType, KeyId, codes, names,
};

fn names_of(bindings: &Bindings, key: &KeyId, player: Option<u8>) -> Vec<String> {
    bindings
        .get_actions_for_key(key, player)
        .iter()
        .map(|action| action.name().to_string())
        .collect()
}

fn split_screen_bindings() -> Bindings {
    let json = r#"{
        "FIRE": {
            "keys": { "controller": ["buttons7", "buttons5"], "keyboard": 70 },
            "splitScreen": true
        },
        "RELOAD": { "keys": { "controller": "buttons5" } }
    }"#;
    let object: BindingsObject = serde_json::from_str(json).unwrap();
    Bindings::from_object("shooter", &object)
}

// ============================================================================
// Per-Player Resolution
// ============================================================================

#[test]
fn test_same_button_means_different_things_per_player() {
    let bindings = split_screen_bindings();
    let buttons5 = KeyId::button(5);

    // Player 1 fires with buttons5, and RELOAD is shared by everyone.
    assert_eq!(names_of(&bindings, &buttons5, Some(1)), vec!["FIRE", "RELOAD"]);
    // Player 0 fires with buttons7, so buttons5 only reloads.
    assert_eq!(names_of(&bindings, &buttons5, Some(0)), vec!["RELOAD"]);
    assert_eq!(names_of(&bindings, &KeyId::button(7), Some(0)), vec!["FIRE"]);
}

#[test]
fn test_lookup_without_player_ignores_player_keys() {
    let bindings = split_screen_bindings();

    assert!(names_of(&bindings, &KeyId::button(7), None).is_empty());
    assert_eq!(names_of(&bindings, &KeyId::Code(codes::F), None), vec!["FIRE"]);
}

#[test]
fn test_explicit_player_input_type() {
    let object: BindingsObject = serde_json::from_str(
        r#"{ "JUMP": { "keys": { "controller-2": "buttons3" } } }"#,
    )
    .unwrap();
    let bindings = Bindings::from_object("character", &object);

    assert_eq!(names_of(&bindings, &KeyId::button(3), Some(2)), vec!["JUMP"]);
    assert!(names_of(&bindings, &KeyId::button(3), Some(0)).is_empty());
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_merge_keeps_existing_keys() {
    let mut overrides = BindingsObject::new();
    overrides.insert(
        names::JUMP.to_string(),
        ActionObject::default().key("keyboard", codes::E),
    );
    let mut bindings = Bindings::from_object("character", &overrides);

    bindings.merge(&Archetype::Character.default_bindings());

    let jump = bindings.action(names::JUMP).unwrap();
    assert_eq!(jump.key(&InputType::KEYBOARD), Some(&KeyId::Code(codes::E)));
    assert_eq!(jump.key(&InputType::CONTROLLER), Some(&KeyId::button(0)));
    assert!(names_of(&bindings, &KeyId::Code(codes::SPACE), None).is_empty());

    // Actions the overrides never mentioned come from the defaults.
    assert_eq!(names_of(&bindings, &KeyId::Code(codes::W), None), vec![names::FORWARD]);
    assert_eq!(bindings.len(), Archetype::Character.default_bindings().len());
}

#[test]
fn test_merge_is_idempotent() {
    let mut bindings = Archetype::FreeRoam.default_bindings();
    let before = bindings.to_object();

    bindings.merge(&Archetype::FreeRoam.default_bindings());
    assert_eq!(bindings.to_object(), before);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_object_round_trip_preserves_lookups() {
    let original = split_screen_bindings();
    let json = serde_json::to_string(&original.to_object()).unwrap();

    let object: BindingsObject = serde_json::from_str(&json).unwrap();
    let restored = Bindings::from_object("shooter", &object);

    let indexed = |bindings: &Bindings| -> HashSet<(KeyId, Option<u8>)> {
        bindings
            .indexed_keys()
            .map(|(key, player)| (key.clone(), player))
            .collect()
    };
    assert_eq!(indexed(&restored), indexed(&original));

    for player in [None, Some(0), Some(1)] {
        for key in [KeyId::button(5), KeyId::button(7), KeyId::Code(codes::F)] {
            assert_eq!(
                names_of(&restored, &key, player),
                names_of(&original, &key, player),
                "lookup of {key} for {player:?} changed"
            );
        }
    }
}

#[test]
fn test_round_trip_writes_explicit_player_types() {
    let json = serde_json::to_value(split_screen_bindings().to_object()).unwrap();

    assert_eq!(json["FIRE"]["keys"]["controller-0"], "buttons7");
    assert_eq!(json["FIRE"]["keys"]["controller-1"], "buttons5");
    assert_eq!(json["FIRE"]["keys"]["keyboard"], 70);
}

#[test]
fn test_default_bindings_cover_movement() {
    for archetype in Archetype::ALL {
        let bindings = archetype.default_bindings();
        for name in [names::FORWARD, names::BACKWARD, names::LEFT, names::RIGHT, names::SPRINT] {
            let action = bindings
                .action(name)
                .unwrap_or_else(|| panic!("{archetype} has no {name}"));
            assert!(action.key(&InputType::KEYBOARD).is_some());
            assert!(action
                .key(&InputType::shared(InputDevice::Controller))
                .is_some());
        }
    }
}
