//! Entity Archetypes
//!
//! Each archetype names a controls ID and ships the default bindings
//! installed the first time an entity of that kind is spawned.
//!
//! | Action   | Keyboard | Controller |
//! |----------|----------|------------|
//! | FORWARD  | W        | `-axes1`   |
//! | BACKWARD | S        | `+axes1`   |
//! | LEFT     | A        | `-axes0`   |
//! | RIGHT    | D        | `+axes0`   |
//! | JUMP     | Space    | `buttons0` |
//! | SPRINT   | Shift    | `buttons10`|
//!
//! Free-roam entities fly instead of jumping: UP is Space / `buttons0` and
//! DOWN is Q / `buttons1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::action::{names, Action};
use crate::input::bindings::Bindings;
use crate::input::keys::{codes, InputType, KeyId};

/// Kind of entity, selecting its controls ID and capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    /// Physics-driven walking character
    Character,
    /// Flying camera-relative entity with no physics body
    FreeRoam,
}

impl Archetype {
    pub const ALL: [Archetype; 2] = [Archetype::Character, Archetype::FreeRoam];

    /// Namespace this archetype's bindings are stored under.
    pub fn controls_id(&self) -> &'static str {
        match self {
            Archetype::Character => "character",
            Archetype::FreeRoam => "free-roam",
        }
    }

    /// Built-in bindings for this archetype.
    pub fn default_bindings(&self) -> Bindings {
        let mut bindings = Bindings::new(self.controls_id());

        for action in movement_actions() {
            bindings.add_action(action);
        }
        bindings.add_action(action(names::SPRINT, codes::SHIFT, KeyId::button(10)));

        match self {
            Archetype::Character => {
                bindings.add_action(action(names::JUMP, codes::SPACE, KeyId::button(0)));
            }
            Archetype::FreeRoam => {
                bindings.add_action(action(names::UP, codes::SPACE, KeyId::button(0)));
                bindings.add_action(action(names::DOWN, codes::Q, KeyId::button(1)));
            }
        }
        bindings
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.controls_id())
    }
}

fn action(name: &str, key: u32, controller: KeyId) -> Action {
    Action::new(name)
        .with_key(InputType::KEYBOARD, key)
        .with_key(InputType::CONTROLLER, controller)
}

fn movement_actions() -> [Action; 4] {
    [
        action(names::FORWARD, codes::W, KeyId::signed_axis(1, false)),
        action(names::BACKWARD, codes::S, KeyId::signed_axis(1, true)),
        action(names::LEFT, codes::A, KeyId::signed_axis(0, false)),
        action(names::RIGHT, codes::D, KeyId::signed_axis(0, true)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_ids() {
        assert_eq!(Archetype::Character.controls_id(), "character");
        assert_eq!(Archetype::FreeRoam.to_string(), "free-roam");
    }

    #[test]
    fn test_character_defaults() {
        let bindings = Archetype::Character.default_bindings();
        assert_eq!(bindings.controls_id(), "character");
        assert_eq!(bindings.len(), 6);

        let jump = bindings.action(names::JUMP).unwrap();
        assert_eq!(jump.key(&InputType::KEYBOARD), Some(&KeyId::Code(32)));
        assert_eq!(jump.key(&InputType::CONTROLLER), Some(&KeyId::button(0)));

        let forward = bindings.action(names::FORWARD).unwrap();
        assert_eq!(forward.key(&InputType::CONTROLLER), Some(&KeyId::from("-axes1")));
    }

    #[test]
    fn test_free_roam_flies_instead_of_jumping() {
        let bindings = Archetype::FreeRoam.default_bindings();
        assert!(bindings.action(names::JUMP).is_none());
        assert!(bindings.action(names::UP).is_some());
        assert_eq!(
            bindings.action(names::DOWN).unwrap().key(&InputType::KEYBOARD),
            Some(&KeyId::Code(codes::Q))
        );
    }
}
