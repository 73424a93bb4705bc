//! Input Bindings Module
//!
//! Maps physical keys to logical [`Action`]s for one controls ID (one entity
//! archetype). The forward map `name → Action` is the source of truth; a
//! reverse index `(key, player) → [action names]` is rebuilt in full after
//! every mutation so lookups never see a stale view.
//!
//! Bindings round-trip through a plain serde object:
//!
//! ```json
//! {
//!   "JUMP": { "keys": { "keyboard": 32, "controller": "buttons0" } },
//!   "FIRE": { "keys": { "controller": ["buttons7", "buttons5"] }, "splitScreen": true }
//! }
//! ```
//!
//! A split-screen array is rewritten at load time so that index `i` becomes
//! input type `controller-i`, correlating directly with gamepad index `i`.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::keys::{InputType, KeyId};
use crate::error::BindingError;

/// One key or, for split-screen actions, one key per player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Single(KeyId),
    PerPlayer(Vec<KeyId>),
}

/// Serialized form of one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionObject {
    /// Input-type tag (`keyboard`, `controller`, `controller-1`, ...) to key.
    #[serde(default)]
    pub keys: BTreeMap<String, KeySpec>,
    /// Allows per-player key arrays.
    #[serde(default, rename = "splitScreen", skip_serializing_if = "is_false")]
    pub split_screen: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ActionObject {
    pub fn key(mut self, input_type: &str, key: impl Into<KeyId>) -> Self {
        self.keys
            .insert(input_type.to_string(), KeySpec::Single(key.into()));
        self
    }

    pub fn split_screen(mut self, input_type: &str, keys: Vec<KeyId>) -> Self {
        self.split_screen = true;
        self.keys
            .insert(input_type.to_string(), KeySpec::PerPlayer(keys));
        self
    }
}

/// Serialized bindings of one controls ID: action name to action object.
pub type BindingsObject = BTreeMap<String, ActionObject>;

/// Persisted binding overrides for every controls ID.
pub type BindingOverrides = BTreeMap<String, BindingsObject>;

/// Reverse index key. Keyboard and mouse codes share one numeric space.
type IndexKey = (KeyId, Option<u8>);

/// Key to action mapping owned by one controls ID.
#[derive(Debug, Clone)]
pub struct Bindings {
    controls_id: String,
    actions: BTreeMap<String, Action>,
    index: HashMap<IndexKey, Vec<String>>,
}

impl Bindings {
    /// Create empty bindings for a controls ID.
    pub fn new(controls_id: impl Into<String>) -> Self {
        Self {
            controls_id: controls_id.into(),
            actions: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    /// Build bindings from a serialized object.
    pub fn from_object(controls_id: impl Into<String>, object: &BindingsObject) -> Self {
        let mut bindings = Self::new(controls_id);
        bindings.load(object);
        bindings
    }

    pub fn controls_id(&self) -> &str {
        &self.controls_id
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Load actions from a serialized object.
    ///
    /// Keys are added to existing actions of the same name (replacing the key
    /// of a repeated input type). Unknown input types and per-player arrays on
    /// actions not flagged `splitScreen` are logged and dropped.
    pub fn load(&mut self, object: &BindingsObject) {
        for (name, action_object) in object {
            let action = self
                .actions
                .entry(name.clone())
                .or_insert_with(|| Action::new(name.clone()));

            for (tag, spec) in &action_object.keys {
                if let Err(err) = apply_key_spec(action, tag, spec, action_object.split_screen) {
                    warn!("bindings `{}`: {}", self.controls_id, err);
                }
            }
        }
        self.rebuild_index();
    }

    /// Export to a serialized object. Per-player keys are written under their
    /// explicit input type (`controller-1`), so no split-screen arrays are
    /// produced.
    pub fn to_object(&self) -> BindingsObject {
        self.actions
            .iter()
            .map(|(name, action)| {
                let keys = action
                    .keys()
                    .map(|(input_type, key)| (input_type.to_string(), KeySpec::Single(key.clone())))
                    .collect();
                (
                    name.clone(),
                    ActionObject {
                        keys,
                        split_screen: false,
                    },
                )
            })
            .collect()
    }

    /// Insert or replace an action.
    pub fn add_action(&mut self, action: Action) {
        self.actions.insert(action.name().to_string(), action);
        self.rebuild_index();
    }

    /// Remove an action by name.
    pub fn remove_action(&mut self, name: &str) -> Option<Action> {
        let removed = self.actions.remove(name);
        if removed.is_some() {
            self.rebuild_index();
        }
        removed
    }

    /// Bind a key on an existing action.
    pub fn add_key(
        &mut self,
        name: &str,
        input_type: InputType,
        key: impl Into<KeyId>,
    ) -> Result<(), BindingError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| BindingError::UnknownAction(name.to_string()))?;
        action.add_key(input_type, key);
        self.rebuild_index();
        Ok(())
    }

    /// Unbind an input type on an existing action.
    pub fn clear_input_type(
        &mut self,
        name: &str,
        input_type: &InputType,
    ) -> Result<Option<KeyId>, BindingError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| BindingError::UnknownAction(name.to_string()))?;
        let removed = action.clear_input_type(input_type);
        self.rebuild_index();
        Ok(removed)
    }

    /// Merge `other` into these bindings.
    ///
    /// Actions already present keep their keys; only input types they do not
    /// bind yet are copied over. Actions missing here are added whole.
    pub fn merge(&mut self, other: &Bindings) {
        for (name, action) in &other.actions {
            match self.actions.get_mut(name) {
                Some(existing) => existing.merge_keys(action),
                None => {
                    self.actions.insert(name.clone(), action.clone());
                }
            }
        }
        self.rebuild_index();
    }

    /// Actions bound to `key`.
    ///
    /// With a player number, player-specific matches come first, followed by
    /// the player-agnostic ones; player bindings never suppress shared ones.
    /// Without a player number only player-agnostic matches are returned.
    pub fn get_actions_for_key(&self, key: &KeyId, player: Option<u8>) -> Vec<&Action> {
        let mut found = Vec::new();

        if let Some(player) = player {
            self.collect(&(key.clone(), Some(player)), &mut found);
        }
        self.collect(&(key.clone(), None), &mut found);

        found
    }

    /// Every key present in the reverse index, with its player number.
    pub fn indexed_keys(&self) -> impl Iterator<Item = (&KeyId, Option<u8>)> {
        self.index.keys().map(|(key, player)| (key, *player))
    }

    fn collect<'a>(&'a self, index_key: &IndexKey, found: &mut Vec<&'a Action>) {
        if let Some(names) = self.index.get(index_key) {
            found.extend(names.iter().filter_map(|name| self.actions.get(name)));
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (name, action) in &self.actions {
            for (input_type, key) in action.keys() {
                self.index
                    .entry((key.clone(), input_type.player))
                    .or_default()
                    .push(name.clone());
            }
        }
    }
}

fn apply_key_spec(
    action: &mut Action,
    tag: &str,
    spec: &KeySpec,
    split_screen: bool,
) -> Result<(), BindingError> {
    let input_type: InputType = tag.parse()?;

    match spec {
        KeySpec::Single(key) => action.add_key(input_type, key.clone()),
        KeySpec::PerPlayer(keys) => {
            if !split_screen {
                return Err(BindingError::NotSplitScreen {
                    action: action.name().to_string(),
                    input_type: tag.to_string(),
                });
            }
            for (player, key) in keys.iter().enumerate() {
                let Ok(player) = u8::try_from(player) else {
                    break;
                };
                action.add_key(InputType::for_player(input_type.device, player), key.clone());
            }
        }
    }
    Ok(())
}
