//! Settings Store
//!
//! User-adjustable settings (controller deadzone, mouse sensitivity, physics
//! debug view) and saved binding overrides. Every change that alters a value
//! is announced to subscribers. The whole store persists as one JSON file:
//!
//! ```json
//! {
//!   "deadzone": 0.2,
//!   "mouseSensitivity": 0.003,
//!   "debugPhysics": false,
//!   "bindings": { "character": { "JUMP": { "keys": { "keyboard": 69 } } } }
//! }
//! ```

use std::fmt;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ControlsConfig;
use crate::error::SettingsError;
use crate::events::{ListenerId, Listeners};
use crate::input::bindings::{BindingOverrides, Bindings, BindingsObject};

/// Named setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Deadzone,
    MouseSensitivity,
    DebugPhysics,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Deadzone => "deadzone",
            SettingKey::MouseSensitivity => "mouseSensitivity",
            SettingKey::DebugPhysics => "debugPhysics",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Float(f32),
}

impl SettingValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            SettingValue::Float(value) => Some(*value),
            SettingValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            SettingValue::Float(_) => None,
        }
    }
}

/// Notification sent to subscribers after a setting changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingChange {
    pub key: SettingKey,
    pub value: SettingValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsFile {
    deadzone: f32,
    mouse_sensitivity: f32,
    debug_physics: bool,
    bindings: BindingOverrides,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let controls = ControlsConfig::default();
        Self {
            deadzone: controls.deadzone,
            mouse_sensitivity: controls.mouse_sensitivity,
            debug_physics: false,
            bindings: BindingOverrides::new(),
        }
    }
}

/// In-memory settings store with change notification.
#[derive(Debug, Default)]
pub struct Settings {
    values: SettingsFile,
    listeners: Listeners<SettingChange>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from the controls config.
    pub fn from_controls(controls: &ControlsConfig) -> Self {
        let mut settings = Self::new();
        settings.values.deadzone = controls.deadzone;
        settings.values.mouse_sensitivity = controls.mouse_sensitivity;
        settings
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::Deadzone => SettingValue::Float(self.values.deadzone),
            SettingKey::MouseSensitivity => SettingValue::Float(self.values.mouse_sensitivity),
            SettingKey::DebugPhysics => SettingValue::Bool(self.values.debug_physics),
        }
    }

    /// Write a setting. Subscribers are notified only if the value changed.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        let changed = match (key, value) {
            (SettingKey::Deadzone, SettingValue::Float(v)) => replace(&mut self.values.deadzone, v),
            (SettingKey::MouseSensitivity, SettingValue::Float(v)) => {
                replace(&mut self.values.mouse_sensitivity, v)
            }
            (SettingKey::DebugPhysics, SettingValue::Bool(v)) => {
                replace(&mut self.values.debug_physics, v)
            }
            (SettingKey::DebugPhysics, _) => {
                return Err(SettingsError::TypeMismatch {
                    key: key.as_str(),
                    expected: "bool",
                });
            }
            (_, _) => {
                return Err(SettingsError::TypeMismatch {
                    key: key.as_str(),
                    expected: "float",
                });
            }
        };

        if changed {
            self.listeners.emit(&SettingChange { key, value });
        }
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SettingChange) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Saved binding overrides for a controls ID.
    pub fn bindings(&self, controls_id: &str) -> Option<&BindingsObject> {
        self.values.bindings.get(controls_id)
    }

    pub fn binding_overrides(&self) -> &BindingOverrides {
        &self.values.bindings
    }

    /// Save the current state of some bindings as their override.
    pub fn store_bindings(&mut self, bindings: &Bindings) {
        self.values
            .bindings
            .insert(bindings.controls_id().to_string(), bindings.to_object());
    }

    pub fn clear_bindings(&mut self, controls_id: &str) -> bool {
        self.values.bindings.remove(controls_id).is_some()
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }

    /// Replace all values from JSON. Subscribers are kept but not notified.
    pub fn load_json(&mut self, json: &str) -> Result<(), SettingsError> {
        self.values = serde_json::from_str(json)?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved settings to {}", path.display());
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_json(&json)?;
        info!("loaded settings from {}", path.display());
        Ok(())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
