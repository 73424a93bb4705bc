//! Animation Module
//!
//! The character state machine drives animation through the [`Animator`]
//! contract: start a clip by name with a cross-fade, configure how it loops,
//! and ask whether it is still running.
//!
//! [`AnimationMixer`] implements it over a table of named clip durations.
//! Playback state is kept per clip (one cached action per name), so
//! replaying a clip reuses its action instead of allocating a new one.

use std::collections::HashMap;

use log::debug;

/// Handle to a clip action inside an animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle(pub usize);

/// What a clip does when it reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Wrap around and keep playing.
    #[default]
    Repeat,
    /// Play through once and stop.
    Once,
}

/// Animation services used by the character controller.
pub trait Animator {
    /// Start `name`, cross-fading from the current clip over `fade` seconds.
    /// Returns `None` if no clip has that name.
    fn play(&mut self, name: &str, fade: f32) -> Option<ClipHandle>;
    fn is_running(&self, handle: ClipHandle) -> bool;
    /// Clip length in seconds.
    fn clip_duration(&self, handle: ClipHandle) -> Option<f32>;
    fn set_loop(&mut self, handle: ClipHandle, mode: LoopMode);
    /// Hold the last frame after a `Once` clip finishes instead of fading out.
    fn set_clamp_when_finished(&mut self, handle: ClipHandle, clamp: bool);
    fn update(&mut self, dt: f32);
}

#[derive(Debug, Clone)]
struct ClipAction {
    name: String,
    duration: f32,
    time: f32,
    weight: f32,
    target_weight: f32,
    fade_rate: f32,
    loop_mode: LoopMode,
    clamp_when_finished: bool,
    running: bool,
}

impl ClipAction {
    fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            time: 0.0,
            weight: 0.0,
            target_weight: 0.0,
            fade_rate: 0.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            running: false,
        }
    }

    fn fade_to(&mut self, target: f32, fade: f32) {
        self.target_weight = target;
        if fade > 0.0 {
            self.fade_rate = 1.0 / fade;
        } else {
            self.weight = target;
            self.fade_rate = 0.0;
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.running {
            self.time += dt;
            if self.duration > 0.0 && self.time >= self.duration {
                match self.loop_mode {
                    LoopMode::Repeat => self.time %= self.duration,
                    LoopMode::Once => {
                        self.time = self.duration;
                        self.running = false;
                        if !self.clamp_when_finished {
                            self.target_weight = 0.0;
                            self.weight = 0.0;
                        }
                    }
                }
            }
        }

        if self.fade_rate > 0.0 {
            let step = self.fade_rate * dt;
            let delta = self.target_weight - self.weight;
            if delta.abs() <= step {
                self.weight = self.target_weight;
                self.fade_rate = 0.0;
            } else {
                self.weight += step * delta.signum();
            }
        }
    }
}

/// Cross-fading clip player.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    durations: HashMap<String, f32>,
    actions: Vec<ClipAction>,
    by_name: HashMap<String, ClipHandle>,
    current: Option<ClipHandle>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mixer with the given `(name, duration)` clips.
    pub fn with_clips<'a>(clips: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        let mut mixer = Self::new();
        for (name, duration) in clips {
            mixer.add_clip(name, duration);
        }
        mixer
    }

    /// Register a clip (replacing the duration of an existing one).
    pub fn add_clip(&mut self, name: &str, duration: f32) {
        let duration = duration.max(0.0);
        self.durations.insert(name.to_string(), duration);
        if let Some(handle) = self.by_name.get(name) {
            if let Some(action) = self.actions.get_mut(handle.0) {
                action.duration = duration;
            }
        }
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.durations.contains_key(name)
    }

    /// Clip most recently started.
    pub fn current(&self) -> Option<ClipHandle> {
        self.current
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current
            .and_then(|handle| self.actions.get(handle.0))
            .map(|action| action.name.as_str())
    }

    pub fn handle(&self, name: &str) -> Option<ClipHandle> {
        self.by_name.get(name).copied()
    }

    pub fn weight(&self, handle: ClipHandle) -> f32 {
        self.actions.get(handle.0).map_or(0.0, |a| a.weight)
    }

    pub fn time(&self, handle: ClipHandle) -> f32 {
        self.actions.get(handle.0).map_or(0.0, |a| a.time)
    }

    fn action_for(&mut self, name: &str) -> Option<ClipHandle> {
        if let Some(handle) = self.by_name.get(name) {
            return Some(*handle);
        }
        let duration = *self.durations.get(name)?;
        let handle = ClipHandle(self.actions.len());
        self.actions.push(ClipAction::new(name, duration));
        self.by_name.insert(name.to_string(), handle);
        Some(handle)
    }
}

impl Animator for AnimationMixer {
    fn play(&mut self, name: &str, fade: f32) -> Option<ClipHandle> {
        let Some(handle) = self.action_for(name) else {
            debug!("animation clip `{name}` not found");
            return None;
        };

        for (index, action) in self.actions.iter_mut().enumerate() {
            if index == handle.0 {
                action.time = 0.0;
                action.running = true;
                action.fade_to(1.0, fade);
            } else if action.target_weight > 0.0 || action.weight > 0.0 {
                action.fade_to(0.0, fade);
            }
        }

        self.current = Some(handle);
        Some(handle)
    }

    fn is_running(&self, handle: ClipHandle) -> bool {
        self.actions.get(handle.0).is_some_and(|a| a.running)
    }

    fn clip_duration(&self, handle: ClipHandle) -> Option<f32> {
        self.actions.get(handle.0).map(|a| a.duration)
    }

    fn set_loop(&mut self, handle: ClipHandle, mode: LoopMode) {
        if let Some(action) = self.actions.get_mut(handle.0) {
            action.loop_mode = mode;
        }
    }

    fn set_clamp_when_finished(&mut self, handle: ClipHandle, clamp: bool) {
        if let Some(action) = self.actions.get_mut(handle.0) {
            action.clamp_when_finished = clamp;
        }
    }

    fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.advance(dt);
        }
    }
}
