//! Entity Module
//!
//! An [`Entity`] pairs an identity and archetype with the capability set
//! for its kind. Kinds are a closed set of variants rather than a type
//! hierarchy: a character owns a state machine over a physics body, a
//! free-roam entity owns a simple flying mover.

pub mod archetypes;
pub mod free_roam;

pub use archetypes::Archetype;
pub use free_roam::FreeRoamMover;

use glam::Vec3;
use uuid::Uuid;

use crate::character::{CharacterController, CharacterState};
use crate::physics::PhysicsWorld;

/// Capability set of an entity.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Character(CharacterController),
    FreeRoam(FreeRoamMover),
}

/// A spawned entity.
#[derive(Debug, Clone)]
pub struct Entity {
    uuid: Uuid,
    archetype: Archetype,
    player_number: Option<u8>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(archetype: Archetype, player_number: Option<u8>, kind: EntityKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            archetype,
            player_number,
            kind,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn player_number(&self) -> Option<u8> {
        self.player_number
    }

    pub fn character(&self) -> Option<&CharacterController> {
        match &self.kind {
            EntityKind::Character(character) => Some(character),
            EntityKind::FreeRoam(_) => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut CharacterController> {
        match &mut self.kind {
            EntityKind::Character(character) => Some(character),
            EntityKind::FreeRoam(_) => None,
        }
    }

    /// Locomotion state, for characters.
    pub fn state(&self) -> Option<CharacterState> {
        self.character().map(CharacterController::state)
    }

    /// Render position: the interpolated body position for characters.
    pub fn position(&self, physics: &dyn PhysicsWorld) -> Option<Vec3> {
        match &self.kind {
            EntityKind::Character(character) => physics.position(character.body()),
            EntityKind::FreeRoam(mover) => Some(mover.position()),
        }
    }
}
