//! Frame-driven animation loop
//!
//! One logical loop is alive at a time. Each scheduled frame carries a
//! [`FrameToken`]; restarting, stopping or disposing the loop replaces or
//! cancels the token, and a frame whose token is not current is dropped
//! without ticking.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AnimationConfig;
use crate::platform::{FrameHandle, FrameScheduler};
use crate::render::ResourceRegistry;
use crate::scene::{fan_blades, ObjectKind, SceneGraph, SceneNode, VisualObjectIndex};

/// Uniform random source in `[0, 1)` driving light flicker
pub trait FlickerRng {
    /// Next sample in `[0, 1)`
    fn next_unit(&mut self) -> f32;
}

impl FlickerRng for StdRng {
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Entropy-seeded default random source
pub fn default_rng() -> Box<dyn FlickerRng> {
    Box::new(StdRng::from_entropy())
}

/// Deterministic random source for reproducible sessions
pub fn seeded_rng(seed: u64) -> Box<dyn FlickerRng> {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Random source replaying a fixed sequence
///
/// Cycles through `values`. An empty script yields a value just below one,
/// which never triggers a flicker.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    values: VecDeque<f32>,
}

impl ScriptedRng {
    /// Replay `values` in order, wrapping around
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl FlickerRng for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        match self.values.pop_front() {
            Some(value) => {
                self.values.push_back(value);
                value
            }
            None => 1.0 - f32::EPSILON,
        }
    }
}

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame scheduled
    Stopped,
    /// A frame is scheduled and the loop reschedules itself
    Running,
    /// Terminal; the loop never runs again
    Disposed,
}

/// Identity of the currently scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    /// Bumped on every (re)start
    pub generation: u64,
    /// Host handle of the scheduled callback
    pub handle: FrameHandle,
}

/// Single cancellable frame loop
#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    token: Option<FrameToken>,
    generation: u64,
    ticks: u64,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationLoop {
    /// Create a stopped loop
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            token: None,
            generation: 0,
            ticks: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Currently scheduled frame, if any
    pub fn token(&self) -> Option<FrameToken> {
        self.token
    }

    /// Frames ticked since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// (Re)start the loop, canceling any frame already scheduled
    ///
    /// Returns `false` once disposed.
    pub fn begin(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.state == LoopState::Disposed {
            log::warn!("Animation loop is disposed; not starting");
            return false;
        }
        if let Some(token) = self.token.take() {
            scheduler.cancel_frame(token.handle);
            log::trace!("Replaced animation frame of generation {}", token.generation);
        }

        self.generation += 1;
        self.token = Some(FrameToken {
            generation: self.generation,
            handle: scheduler.request_frame(),
        });
        if self.state == LoopState::Stopped {
            log::info!("Animation loop started");
        }
        self.state = LoopState::Running;
        true
    }

    /// Whether `handle` is the current frame of a running loop
    pub fn accept(&self, handle: FrameHandle) -> bool {
        self.state == LoopState::Running && self.token.is_some_and(|token| token.handle == handle)
    }

    /// Schedule the next frame of the current generation
    pub fn reschedule(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.state != LoopState::Running {
            return;
        }
        self.token = Some(FrameToken {
            generation: self.generation,
            handle: scheduler.request_frame(),
        });
    }

    /// Stop the loop, canceling its scheduled frame
    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel_frame(token.handle);
        }
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            log::info!("Animation loop stopped");
        }
    }

    /// Stop the loop for good
    pub fn mark_disposed(&mut self, scheduler: &mut impl FrameScheduler) {
        self.cancel(scheduler);
        self.state = LoopState::Disposed;
    }

    /// Advance transient presentation by one frame
    ///
    /// Spinning fans turn their blade group; while overloaded, each lit bulb
    /// may get a random emissive intensity.
    pub fn tick(
        &mut self,
        graph: &mut SceneGraph,
        resources: &mut ResourceRegistry,
        index: &VisualObjectIndex,
        overloaded: bool,
        config: &AnimationConfig,
        rng: &mut dyn FlickerRng,
    ) {
        self.ticks += 1;

        for (_, fan) in index.nodes_of_kind(ObjectKind::Fan) {
            if !graph.node(fan).is_some_and(|node| node.spinning) {
                continue;
            }
            let Some(blades) = fan_blades(graph, fan) else {
                continue;
            };
            if let Some(blades) = graph.node_mut(blades) {
                blades.transform.rotation.y += config.fan_rotation_step;
            }
        }

        if !overloaded {
            return;
        }

        for (light_id, bulb) in index.nodes_of_kind(ObjectKind::Light) {
            let Some(key) = graph.node(bulb).and_then(SceneNode::material) else {
                continue;
            };
            let Some(material) = resources.material_mut(key) else {
                continue;
            };
            if !material.is_emissive() {
                continue;
            }
            if rng.next_unit() < config.flicker_probability {
                material.emissive_intensity = rng.next_unit() * config.flicker_max_intensity;
                log::trace!("Light '{light_id}' flickered to {:.3}", material.emissive_intensity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Rect;
    use crate::platform::HeadlessHost;

    fn host() -> HeadlessHost {
        HeadlessHost::new(Rect::new(0.0, 0.0, 640.0, 480.0))
    }

    #[test]
    fn test_restart_keeps_one_frame() {
        let mut host = host();
        let mut animation = AnimationLoop::new();

        assert!(animation.begin(&mut host));
        let first = animation.token().unwrap();
        assert!(animation.begin(&mut host));
        let second = animation.token().unwrap();

        assert_eq!(host.pending_frame_count(), 1);
        assert!(!animation.accept(first.handle));
        assert!(animation.accept(second.handle));
        assert_eq!(second.generation, first.generation + 1);
    }

    #[test]
    fn test_cancel_and_dispose() {
        let mut host = host();
        let mut animation = AnimationLoop::new();
        animation.begin(&mut host);
        let token = animation.token().unwrap();

        animation.cancel(&mut host);
        assert_eq!(animation.state(), LoopState::Stopped);
        assert!(!animation.accept(token.handle));
        assert_eq!(host.pending_frame_count(), 0);

        animation.mark_disposed(&mut host);
        assert!(!animation.begin(&mut host));
        assert_eq!(animation.state(), LoopState::Disposed);
        assert_eq!(host.pending_frame_count(), 0);
    }

    #[test]
    fn test_reschedule_only_while_running() {
        let mut host = host();
        let mut animation = AnimationLoop::new();

        animation.reschedule(&mut host);
        assert_eq!(host.pending_frame_count(), 0);

        animation.begin(&mut host);
        let due = host.take_due_frames();
        assert!(animation.accept(due[0]));
        animation.reschedule(&mut host);
        assert_eq!(host.pending_frame_count(), 1);
        assert!(!animation.accept(due[0]));
    }

    #[test]
    fn test_scripted_rng_cycles() {
        let mut rng = ScriptedRng::new([0.1, 0.9]);
        assert!((rng.next_unit() - 0.1).abs() < f32::EPSILON);
        assert!((rng.next_unit() - 0.9).abs() < f32::EPSILON);
        assert!((rng.next_unit() - 0.1).abs() < f32::EPSILON);
        assert!(ScriptedRng::default().next_unit() < 1.0);
    }
}
