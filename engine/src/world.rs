//! World
//!
//! The application object. It owns every service (controls, settings,
//! physics, camera, clock, per-entity animators) and runs the per-frame
//! tick in a fixed order:
//!
//! 1. poll gamepads into the controls dispatcher
//! 2. take each entity's input frame for this tick
//! 3. run character state machines and free-roam movers
//! 4. step physics (clamped and sub-stepped)
//! 5. advance animation
//! 6. turn the camera by the primary entity's mouse delta and follow it
//!
//! Input resolution must precede aggregation, and aggregation must precede
//! the state machine, so every tick acts on its own input.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::animation::{AnimationMixer, Animator};
use crate::camera::OrbitCamera;
use crate::character::{CharacterController, CharacterState};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::entity::{Archetype, Entity, EntityKind, FreeRoamMover};
use crate::error::SettingsError;
use crate::events::{ListenerId, Listeners};
use crate::input::{Controls, GamepadSource};
use crate::physics::{KinematicWorld, PhysicsWorld, RigidBody};
use crate::settings::{SettingChange, SettingKey, SettingValue, Settings};

/// Something that happened in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned { uuid: Uuid, archetype: Archetype },
    Despawned { uuid: Uuid },
    StateChanged {
        uuid: Uuid,
        from: CharacterState,
        to: CharacterState,
    },
}

/// Owner of all entities and services.
pub struct World<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
    physics: KinematicWorld,
    controls: Controls,
    settings: Settings,
    setting_changes: Rc<RefCell<Vec<SettingChange>>>,
    camera: OrbitCamera,
    entities: Vec<Entity>,
    animators: HashMap<Uuid, AnimationMixer>,
    clips: Vec<(String, f32)>,
    registered: HashSet<Archetype>,
    events: Listeners<WorldEvent>,
    last_tick: Option<Duration>,
}

impl World<SystemClock> {
    /// World driven by real time.
    pub fn with_system_clock(config: EngineConfig) -> Self {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> World<C> {
    pub fn new(config: EngineConfig, clock: C) -> Self {
        let mut settings = Settings::from_controls(&config.controls);
        let setting_changes = watch_settings(&mut settings);
        Self {
            physics: KinematicWorld::new(config.physics),
            controls: Controls::new(config.controls),
            camera: OrbitCamera::new(config.camera),
            settings,
            setting_changes,
            config,
            clock,
            entities: Vec::new(),
            animators: HashMap::new(),
            clips: Vec::new(),
            registered: HashSet::new(),
            events: Listeners::new(),
            last_tick: None,
        }
    }

    /// Replace the settings store and apply its values to the controls.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self.setting_changes = watch_settings(&mut self.settings);
        for key in [SettingKey::Deadzone, SettingKey::MouseSensitivity] {
            let value = self.settings.get(key);
            self.apply_setting(key, value);
        }
        self
    }

    /// Animation clips `(name, seconds)` given to every spawned character.
    pub fn with_clips<'a>(mut self, clips: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        self.clips = clips
            .into_iter()
            .map(|(name, duration)| (name.to_string(), duration))
            .collect();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Direct access to the settings store. Changes made here reach the
    /// running services on the next tick.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn physics(&self) -> &KinematicWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut KinematicWorld {
        &mut self.physics
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, uuid: Uuid) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.uuid() == uuid)
    }

    pub fn entity_mut(&mut self, uuid: Uuid) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.uuid() == uuid)
    }

    pub fn animator(&self, uuid: Uuid) -> Option<&AnimationMixer> {
        self.animators.get(&uuid)
    }

    /// World-space position of an entity.
    pub fn position(&self, uuid: Uuid) -> Option<Vec3> {
        self.entity(uuid)?.position(&self.physics)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&WorldEvent) + 'static) -> ListenerId {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Spawn a physics-driven character standing at `position`.
    pub fn spawn_character(&mut self, position: Vec3, player: Option<u8>) -> Uuid {
        let config = self.config.character.clone();
        let body = self.physics.add_body(RigidBody::capsule(
            position,
            config.radius,
            config.half_height,
        ));

        let mut character = CharacterController::new(body, config, self.clock.now());
        let mut mixer = AnimationMixer::with_clips(
            self.clips
                .iter()
                .map(|(name, duration)| (name.as_str(), *duration)),
        );
        character.start(&mut mixer);

        let entity = Entity::new(Archetype::Character, player, EntityKind::Character(character));
        self.animators.insert(entity.uuid(), mixer);
        self.attach(entity)
    }

    /// Spawn a flying free-roam entity at `position`.
    pub fn spawn_free_roam(&mut self, position: Vec3, player: Option<u8>) -> Uuid {
        let mover = FreeRoamMover::new(position, self.config.free_roam);
        self.attach(Entity::new(Archetype::FreeRoam, player, EntityKind::FreeRoam(mover)))
    }

    fn attach(&mut self, entity: Entity) -> Uuid {
        let uuid = entity.uuid();
        let archetype = entity.archetype();

        if self.registered.insert(archetype) {
            let overrides = self.settings.bindings(archetype.controls_id());
            self.controls.register_bindings(archetype, overrides);
        }
        self.controls
            .register_entity(uuid, archetype.controls_id(), entity.player_number());

        self.entities.push(entity);
        info!("spawned {archetype} {uuid}");
        self.events.emit(&WorldEvent::Spawned { uuid, archetype });
        uuid
    }

    /// Remove an entity, its body and its animator.
    pub fn despawn(&mut self, uuid: Uuid) -> bool {
        let Some(index) = self.entities.iter().position(|entity| entity.uuid() == uuid) else {
            warn!("cannot despawn {uuid}: no such entity");
            return false;
        };
        let entity = self.entities.remove(index);

        self.controls.unregister_entity(uuid);
        if let Some(character) = entity.character() {
            self.physics.remove_body(character.body());
        }
        self.animators.remove(&uuid);

        info!("despawned {uuid}");
        self.events.emit(&WorldEvent::Despawned { uuid });
        true
    }

    /// Change a setting and apply it to the running services.
    pub fn set_setting(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        self.settings.set(key, value)?;
        self.apply_setting_changes();
        Ok(())
    }

    /// Apply every change announced by the settings store since last time.
    fn apply_setting_changes(&mut self) {
        let changes = std::mem::take(&mut *self.setting_changes.borrow_mut());
        for change in changes {
            self.apply_setting(change.key, change.value);
        }
    }

    fn apply_setting(&mut self, key: SettingKey, value: SettingValue) {
        match (key, value) {
            (SettingKey::Deadzone, SettingValue::Float(deadzone)) => {
                self.controls.set_deadzone(deadzone);
            }
            (SettingKey::MouseSensitivity, SettingValue::Float(sensitivity)) => {
                self.controls.set_mouse_sensitivity(sensitivity);
            }
            (SettingKey::DebugPhysics, SettingValue::Bool(enabled)) => {
                debug!("physics debug view {}", if enabled { "on" } else { "off" });
            }
            _ => {}
        }
    }

    pub fn debug_physics(&self) -> bool {
        self.settings
            .get(SettingKey::DebugPhysics)
            .as_bool()
            .unwrap_or(false)
    }

    /// Persist the current bindings of a controls ID as the user override.
    pub fn save_bindings(&mut self, controls_id: &str) -> bool {
        match self.controls.bindings(controls_id) {
            Some(bindings) => {
                self.settings.store_bindings(bindings);
                true
            }
            None => {
                warn!("no bindings for controls `{controls_id}`");
                false
            }
        }
    }

    /// Run one frame.
    pub fn tick(&mut self, gamepads: &dyn GamepadSource) {
        let now = self.clock.now();
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);
        let dt = elapsed.as_secs_f32();

        self.apply_setting_changes();
        self.controls.poll_gamepads(gamepads);

        let primary = self.controls.primary();
        let mut look = Vec2::ZERO;
        let mut transitions = Vec::new();

        for entity in &mut self.entities {
            let uuid = entity.uuid();
            let frame = self.controls.take_frame(uuid, &self.camera);
            if Some(uuid) == primary {
                look = frame.mouse_delta;
            }

            match &mut entity.kind {
                EntityKind::Character(character) => {
                    let Some(mixer) = self.animators.get_mut(&uuid) else {
                        continue;
                    };
                    if let Some(transition) = character.update(now, &frame, &mut self.physics, mixer) {
                        transitions.push(WorldEvent::StateChanged {
                            uuid,
                            from: transition.from,
                            to: transition.to,
                        });
                    }
                }
                EntityKind::FreeRoam(mover) => mover.update(&frame, dt),
            }
        }

        self.physics.step(dt);

        for mixer in self.animators.values_mut() {
            mixer.update(dt);
        }

        self.camera.apply_mouse_delta(look);
        let target = primary.and_then(|uuid| self.position(uuid));
        if let Some(target) = target {
            self.camera.follow(target);
        }

        for event in &transitions {
            self.events.emit(event);
        }
    }
}

/// Queue the store's change notifications for the world to apply.
fn watch_settings(settings: &mut Settings) -> Rc<RefCell<Vec<SettingChange>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    settings.subscribe(move |change| sink.borrow_mut().push(*change));
    changes
}
