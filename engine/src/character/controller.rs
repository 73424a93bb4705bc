//! Character Controller
//!
//! Timing-gated locomotion state machine for a physics-driven character.
//! Each tick it probes for ground, steers the body's horizontal velocity
//! toward the camera-relative input, and picks one state in fixed priority
//! order:
//!
//! 1. frozen (after a landing): velocity untouched, state held
//! 2. falling: airborne for longer than the fall threshold
//! 3. jumping: JUMP pressed while grounded or within the coyote window
//! 4. landing: touchdown after a long enough, slow enough fall
//! 5. jump cooldown: movement states deferred until `jump_min` elapses
//! 6. idle / walking / sprinting from the input magnitude and SPRINT
//!
//! All timers compare against the `now` passed in by the caller.

use std::time::Duration;

use glam::{Quat, Vec3};
use log::debug;

use super::state::{CharacterState, StateTransition};
use crate::animation::{Animator, ClipHandle, LoopMode};
use crate::config::CharacterConfig;
use crate::input::action::names;
use crate::input::InputFrame;
use crate::physics::{BodyId, PhysicsWorld};

/// Ground contact as it was before this tick's probe.
#[derive(Debug, Clone, Copy)]
struct PriorContact {
    was_grounded: bool,
    air_time: Duration,
    /// Horizontal speed going into the tick
    speed: f32,
}

/// State machine driving one character body.
#[derive(Debug, Clone)]
pub struct CharacterController {
    body: BodyId,
    config: CharacterConfig,
    state: CharacterState,
    grounded: bool,
    last_grounded: Duration,
    jump_time: Option<Duration>,
    frozen_until: Option<Duration>,
    clip: Option<ClipHandle>,
    jump_clip: Option<ClipHandle>,
}

impl CharacterController {
    /// Controller for `body`, counted as grounded at `now` so it does not
    /// start out falling.
    pub fn new(body: BodyId, config: CharacterConfig, now: Duration) -> Self {
        Self {
            body,
            config,
            state: CharacterState::Idle,
            grounded: false,
            last_grounded: now,
            jump_time: None,
            frozen_until: None,
            clip: None,
            jump_clip: None,
        }
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn last_grounded(&self) -> Duration {
        self.last_grounded
    }

    pub fn jump_time(&self) -> Option<Duration> {
        self.jump_time
    }

    pub fn frozen_until(&self) -> Option<Duration> {
        self.frozen_until
    }

    pub fn is_frozen(&self, now: Duration) -> bool {
        self.frozen_until.is_some_and(|until| now < until)
    }

    /// Freeze the character for `duration`. A new freeze replaces any
    /// pending one.
    pub fn freeze(&mut self, now: Duration, duration: Duration) {
        self.frozen_until = Some(now + duration);
    }

    pub fn unfreeze(&mut self) {
        self.frozen_until = None;
    }

    /// Start the idle clip.
    pub fn start(&mut self, animator: &mut dyn Animator) {
        self.clip = self.play(CharacterState::Idle, animator);
    }

    /// Run one tick. Returns the transition if the state changed.
    pub fn update(
        &mut self,
        now: Duration,
        input: &InputFrame,
        physics: &mut dyn PhysicsWorld,
        animator: &mut dyn Animator,
    ) -> Option<StateTransition> {
        let previous = self.state;
        let before = PriorContact {
            was_grounded: self.grounded,
            air_time: now.saturating_sub(self.last_grounded),
            speed: physics
                .body(self.body)
                .map_or(0.0, |body| body.horizontal_speed()),
        };

        self.grounded = self.probe_ground(physics);
        if self.grounded {
            self.last_grounded = now;
        }

        self.step(now, input, physics, animator, before);

        (self.state != previous).then_some(StateTransition {
            from: previous,
            to: self.state,
        })
    }

    fn step(
        &mut self,
        now: Duration,
        input: &InputFrame,
        physics: &mut dyn PhysicsWorld,
        animator: &mut dyn Animator,
        before: PriorContact,
    ) {
        if let Some(until) = self.frozen_until {
            if now < until {
                if self.state != CharacterState::Landing {
                    self.enter(CharacterState::Idle, animator);
                }
                return;
            }
            self.frozen_until = None;
        }

        let moving = input.magnitude > self.config.move_threshold;
        let sprinting = moving && input.is_active(names::SPRINT);

        if self.grounded {
            self.apply_velocity(input, sprinting, physics);
        }
        self.apply_facing(input, physics);

        let fall_threshold = self.config.fall_threshold();
        let since_grounded = now.saturating_sub(self.last_grounded);
        let jump_running = self.jump_clip.is_some_and(|clip| animator.is_running(clip));

        if !self.grounded && since_grounded > fall_threshold && !jump_running {
            self.enter(CharacterState::Falling, animator);
            return;
        }

        let can_jump = self.grounded || since_grounded <= fall_threshold;
        if input.is_active(names::JUMP) && !self.state.is_airborne() && can_jump {
            self.jump(now, physics, animator);
            return;
        }

        if !before.was_grounded
            && self.grounded
            && before.air_time > self.config.land_min_air()
            && before.speed < self.config.land_speed_threshold
        {
            self.land(now, physics, animator);
            return;
        }

        if self
            .jump_time
            .is_some_and(|jumped| now.saturating_sub(jumped) < self.config.jump_min())
        {
            return;
        }

        if self.grounded {
            let next = if !moving {
                CharacterState::Idle
            } else if sprinting {
                CharacterState::Sprinting
            } else {
                CharacterState::Walking
            };
            self.enter(next, animator);
        }
    }

    /// Cast the ground ray and pull the body toward its resting height.
    fn probe_ground(&self, physics: &mut dyn PhysicsWorld) -> bool {
        let Some(body) = physics.body(self.body) else {
            return false;
        };
        if body.velocity.y > self.config.ascend_epsilon {
            return false;
        }

        let rest = body.rest_height();
        let origin = body.position + Vec3::Y * self.config.ray_offset;
        let max_distance = self.config.ray_offset + rest + self.config.ground_tolerance;

        let Some(hit) = physics.raycast(origin, Vec3::NEG_Y, max_distance, Some(self.body)) else {
            return false;
        };

        let target_y = origin.y - hit.distance + rest;
        if let Some(body) = physics.body_mut(self.body) {
            body.position.y += (target_y - body.position.y) * self.config.ground_lerp;
            body.velocity.y = 0.0;
        }
        true
    }

    fn apply_velocity(&self, input: &InputFrame, sprinting: bool, physics: &mut dyn PhysicsWorld) {
        let Some(body) = physics.body_mut(self.body) else {
            return;
        };

        let multiplier = if sprinting { self.config.sprint_multiplier } else { 1.0 };
        let target = input.direction * self.config.base_speed * multiplier;
        let k = self.config.velocity_lerp;

        body.velocity.x += (target.x - body.velocity.x) * k;
        body.velocity.z += (target.z - body.velocity.z) * k;
    }

    fn apply_facing(&self, input: &InputFrame, physics: &mut dyn PhysicsWorld) {
        let direction = Vec3::new(input.direction.x, 0.0, input.direction.z);
        if direction.length_squared() < 1e-6 {
            return;
        }
        let Some(body) = physics.body_mut(self.body) else {
            return;
        };

        let target = Quat::from_rotation_y(direction.x.atan2(direction.z));
        body.quaternion = body
            .quaternion
            .slerp(target, self.config.rotation_lerp)
            .normalize();
    }

    fn jump(&mut self, now: Duration, physics: &mut dyn PhysicsWorld, animator: &mut dyn Animator) {
        self.jump_time = Some(now);
        self.grounded = false;
        if let Some(body) = physics.body_mut(self.body) {
            body.velocity.y = self.config.jump_velocity;
        }
        self.jump_clip = self.enter(CharacterState::Jumping, animator);
    }

    fn land(&mut self, now: Duration, physics: &mut dyn PhysicsWorld, animator: &mut dyn Animator) {
        if let Some(body) = physics.body_mut(self.body) {
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }

        let clip = self.enter(CharacterState::Landing, animator);
        let clip_duration = clip
            .and_then(|clip| animator.clip_duration(clip))
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
            .unwrap_or_default();

        let freeze = clip_duration.saturating_sub(self.config.land_mix_threshold());
        if !freeze.is_zero() {
            self.freeze(now, freeze);
        }
    }

    /// Switch state and start its clip. Re-entering the current state keeps
    /// the running clip.
    fn enter(&mut self, state: CharacterState, animator: &mut dyn Animator) -> Option<ClipHandle> {
        if self.state == state {
            return self.clip;
        }
        debug!("character {:?}: {} -> {}", self.body, self.state, state);
        self.state = state;
        self.clip = self.play(state, animator);
        self.clip
    }

    fn play(&self, state: CharacterState, animator: &mut dyn Animator) -> Option<ClipHandle> {
        let clips = &self.config.clips;
        let name = match state {
            CharacterState::Idle => &clips.idle,
            CharacterState::Walking => &clips.walk,
            CharacterState::Sprinting => &clips.sprint,
            CharacterState::Jumping => &clips.jump,
            CharacterState::Falling => &clips.fall,
            CharacterState::Landing => &clips.land,
        };

        let Some(handle) = animator.play(name, self.config.fade_duration) else {
            debug!("no clip `{name}` for state {state}");
            return None;
        };

        match state {
            CharacterState::Jumping | CharacterState::Landing => {
                animator.set_loop(handle, LoopMode::Once);
                animator.set_clamp_when_finished(handle, true);
            }
            _ => animator.set_loop(handle, LoopMode::Repeat),
        }
        Some(handle)
    }
}
