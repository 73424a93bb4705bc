//! Character States

use std::fmt;

use serde::{Deserialize, Serialize};

/// Locomotion state of a character. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Sprinting,
    Jumping,
    Falling,
    Landing,
}

impl CharacterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterState::Idle => "idle",
            CharacterState::Walking => "walking",
            CharacterState::Sprinting => "sprinting",
            CharacterState::Jumping => "jumping",
            CharacterState::Falling => "falling",
            CharacterState::Landing => "landing",
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, CharacterState::Jumping | CharacterState::Falling)
    }
}

impl fmt::Display for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change of state reported by one controller update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: CharacterState,
    pub to: CharacterState,
}
