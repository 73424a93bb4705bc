//! Actions
//!
//! An [`Action`] is a named logical input ("JUMP") decoupled from any physical
//! key. It owns at most one [`KeyId`] per [`InputType`].

use std::collections::BTreeMap;

use super::keys::{InputType, KeyId};

/// Action names shared by the built-in archetypes.
pub mod names {
    pub const FORWARD: &str = "FORWARD";
    pub const BACKWARD: &str = "BACKWARD";
    pub const LEFT: &str = "LEFT";
    pub const RIGHT: &str = "RIGHT";
    pub const JUMP: &str = "JUMP";
    pub const SPRINT: &str = "SPRINT";
    pub const UP: &str = "UP";
    pub const DOWN: &str = "DOWN";
}

/// A named logical input and the physical keys that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    keys: BTreeMap<InputType, KeyId>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Builder form of [`Action::add_key`].
    pub fn with_key(mut self, input_type: InputType, key: impl Into<KeyId>) -> Self {
        self.add_key(input_type, key);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key bound for an input type, if any.
    pub fn key(&self, input_type: &InputType) -> Option<&KeyId> {
        self.keys.get(input_type)
    }

    pub fn keys(&self) -> impl Iterator<Item = (&InputType, &KeyId)> {
        self.keys.iter()
    }

    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Bind `key` for `input_type`, replacing any previous key of that type.
    pub fn add_key(&mut self, input_type: InputType, key: impl Into<KeyId>) {
        self.keys.insert(input_type, key.into());
    }

    /// Remove the key bound for `input_type`. Returns the removed key.
    pub fn clear_input_type(&mut self, input_type: &InputType) -> Option<KeyId> {
        self.keys.remove(input_type)
    }

    /// Copy keys from `other` for input types this action does not bind yet.
    ///
    /// Existing input types are never overwritten.
    pub fn merge_keys(&mut self, other: &Action) {
        for (input_type, key) in &other.keys {
            self.keys
                .entry(*input_type)
                .or_insert_with(|| key.clone());
        }
    }
}
