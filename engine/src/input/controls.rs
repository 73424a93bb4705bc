//! Controls Dispatcher
//!
//! Owns the registry of entities currently receiving input and the
//! [`Bindings`] of every controls ID. All physical input (keyboard and mouse
//! events, polled gamepads) enters through [`Controls::set_actions`], which
//! resolves the key against each entity's own bindings and writes the value
//! into every matched action.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;
use log::{debug, info, warn};
use uuid::Uuid;

use super::bindings::{Bindings, BindingsObject};
use super::entity_input::{EntityInput, InputFrame};
use super::gamepad::{apply_deadzone, AxisHistory, GamepadSource};
use super::keys::{InputDevice, KeyId};
use crate::camera::CameraView;
use crate::config::ControlsConfig;
use crate::entity::Archetype;

/// Input dispatcher shared by every entity that receives input.
#[derive(Debug)]
pub struct Controls {
    config: ControlsConfig,
    enabled: bool,
    bindings: HashMap<String, Bindings>,
    receivers: BTreeMap<Uuid, EntityInput>,
    primary: Option<Uuid>,
    history: AxisHistory,
    connected: HashSet<u8>,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(ControlsConfig::default())
    }
}

impl Controls {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            config,
            enabled: true,
            bindings: HashMap::new(),
            receivers: BTreeMap::new(),
            primary: None,
            history: AxisHistory::new(),
            connected: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable all input.
    ///
    /// Disabling resets the primary entity's input so no key stays held
    /// across a pause. Re-enabling forgets the gamepad history, so the next
    /// poll dispatches every pad value, zeros included.
    pub fn set_enabled(&mut self, enabled: bool) {
        let resumed = enabled && !self.enabled;
        self.enabled = enabled;
        if resumed {
            self.history.clear();
        } else if let Some(input) = self.primary.and_then(|uuid| self.receivers.get_mut(&uuid)) {
            input.reset();
        }
        debug!("controls {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_deadzone(&mut self, deadzone: f32) {
        self.config.deadzone = deadzone.clamp(0.0, 1.0);
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.config.mouse_sensitivity = sensitivity.max(0.0);
    }

    /// Install an archetype's default bindings.
    ///
    /// The first registration of a controls ID starts from the user's saved
    /// overrides (if any) and merges the defaults underneath them, so custom
    /// keys win per input type. Later registrations merge the defaults into
    /// the existing bindings without replacing anything.
    pub fn register_bindings(
        &mut self,
        archetype: Archetype,
        overrides: Option<&BindingsObject>,
    ) -> &Bindings {
        let defaults = archetype.default_bindings();

        match self.bindings.entry(defaults.controls_id().to_string()) {
            Entry::Occupied(entry) => {
                let bindings = entry.into_mut();
                bindings.merge(&defaults);
                bindings
            }
            Entry::Vacant(entry) => {
                let mut bindings = match overrides {
                    Some(object) => Bindings::from_object(entry.key().clone(), object),
                    None => Bindings::new(entry.key().clone()),
                };
                bindings.merge(&defaults);
                info!(
                    "registered bindings `{}` ({} actions)",
                    bindings.controls_id(),
                    bindings.len()
                );
                entry.insert(bindings)
            }
        }
    }

    pub fn bindings(&self, controls_id: &str) -> Option<&Bindings> {
        self.bindings.get(controls_id)
    }

    pub fn bindings_mut(&mut self, controls_id: &str) -> Option<&mut Bindings> {
        self.bindings.get_mut(controls_id)
    }

    /// Start routing input to an entity.
    ///
    /// The controls ID must have registered bindings. The first entity
    /// registered becomes the primary one. Returns whether the entity was
    /// registered.
    pub fn register_entity(&mut self, uuid: Uuid, controls_id: &str, player: Option<u8>) -> bool {
        if !self.bindings.contains_key(controls_id) {
            warn!("cannot register {uuid}: no bindings for controls `{controls_id}`");
            return false;
        }

        self.receivers
            .insert(uuid, EntityInput::new(uuid, controls_id, player));
        if self.primary.is_none() {
            self.primary = Some(uuid);
        }
        info!("registered {uuid} for controls `{controls_id}` (player {player:?})");
        true
    }

    /// Stop routing input to an entity and clear its actions.
    pub fn unregister_entity(&mut self, uuid: Uuid) -> bool {
        let Some(mut input) = self.receivers.remove(&uuid) else {
            warn!("cannot unregister {uuid}: not registered");
            return false;
        };
        input.clear();

        if self.primary == Some(uuid) {
            self.primary = None;
        }
        info!("unregistered {uuid}");
        true
    }

    pub fn is_registered(&self, uuid: Uuid) -> bool {
        self.receivers.contains_key(&uuid)
    }

    pub fn primary(&self) -> Option<Uuid> {
        self.primary
    }

    /// Choose the entity whose input is reset when controls are disabled.
    pub fn set_primary(&mut self, uuid: Uuid) -> bool {
        if !self.receivers.contains_key(&uuid) {
            warn!("cannot make {uuid} primary: not registered");
            return false;
        }
        self.primary = Some(uuid);
        true
    }

    pub fn entity(&self, uuid: Uuid) -> Option<&EntityInput> {
        self.receivers.get(&uuid)
    }

    pub fn entity_mut(&mut self, uuid: Uuid) -> Option<&mut EntityInput> {
        self.receivers.get_mut(&uuid)
    }

    /// Feed one physical input value into the registered entities.
    ///
    /// Undirected controller axes (`axesN`) are split into `+axesN` and
    /// `-axesN` so bindings can tell the two directions apart. Controller
    /// input reaches only the entity driven by that pad; keyboard and mouse
    /// input reaches every entity.
    pub fn set_actions(&mut self, key: &KeyId, value: f32, device: InputDevice, player: Option<u8>) {
        if !self.enabled {
            return;
        }

        if device == InputDevice::Controller {
            if let Some(axis) = key.undirected_axis() {
                let positive = if value > 0.0 { value.abs() } else { 0.0 };
                let negative = if value < 0.0 { value.abs() } else { 0.0 };
                self.dispatch(&KeyId::signed_axis(axis, true), positive, device, player);
                self.dispatch(&KeyId::signed_axis(axis, false), negative, device, player);
                return;
            }
        }

        self.dispatch(key, value, device, player);
    }

    fn dispatch(&mut self, key: &KeyId, value: f32, device: InputDevice, player: Option<u8>) {
        let pad = match device {
            InputDevice::Controller => Some(player.unwrap_or(0)),
            InputDevice::Keyboard | InputDevice::Mouse => None,
        };

        for input in self.receivers.values_mut() {
            if pad.is_some_and(|pad| input.effective_player() != pad) {
                continue;
            }
            let Some(bindings) = self.bindings.get(input.controls_id()) else {
                continue;
            };
            for action in bindings.get_actions_for_key(key, pad.or(player)) {
                input.set_action(action.name(), value);
            }
        }
    }

    /// Poll every connected gamepad and dispatch changed values.
    ///
    /// Axes below the deadzone become exactly zero. A zero is dispatched once
    /// when a key settles and then suppressed until the value changes.
    /// While disabled, pads are only tracked for connection.
    pub fn poll_gamepads(&mut self, source: &dyn GamepadSource) {
        let pads = source.gamepads();

        let disconnected: Vec<u8> = self
            .connected
            .iter()
            .copied()
            .filter(|index| !pads.iter().any(|pad| pad.index == *index))
            .collect();
        for index in disconnected {
            self.connected.remove(&index);
            self.history.forget_pad(index);
            info!("gamepad {index} disconnected");
        }

        for pad in pads {
            if self.connected.insert(pad.index) {
                info!("gamepad {} connected", pad.index);
            }
        }

        if !self.enabled {
            return;
        }

        let deadzone = self.config.deadzone;
        for pad in pads {
            for (i, raw) in pad.axes.iter().enumerate() {
                let key = KeyId::axis(i);
                let value = apply_deadzone(*raw, deadzone);
                if self.history.should_emit(pad.index, &key, value) {
                    self.set_actions(&key, value, InputDevice::Controller, Some(pad.index));
                }
            }

            for (i, value) in pad.buttons.iter().enumerate() {
                let key = KeyId::button(i);
                if self.history.should_emit(pad.index, &key, *value) {
                    self.set_actions(&key, *value, InputDevice::Controller, Some(pad.index));
                }
            }
        }
    }

    /// Accumulate a raw mouse delta, scaled by sensitivity, on every entity.
    pub fn mouse_move(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }

        let delta = Vec2::new(dx, dy) * self.config.mouse_sensitivity;
        for input in self.receivers.values_mut() {
            input.add_mouse_movement(delta);
        }
    }

    /// Consume this tick's input for an entity.
    ///
    /// Unregistered entities get an empty frame.
    pub fn take_frame(&mut self, uuid: Uuid, camera: &dyn CameraView) -> InputFrame {
        let Some(input) = self.receivers.get_mut(&uuid) else {
            return InputFrame::default();
        };
        let has_bindings = self.bindings.contains_key(input.controls_id());
        input.take_frame(camera, has_bindings)
    }
}
