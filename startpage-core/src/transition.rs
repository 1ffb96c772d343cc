//! Exit/enter animation for page changes.
//!
//! Idle -> Exiting -> (swap content) -> Entering -> Settling -> Idle.
//! Phase changes are driven by [`TransitionTick`]s the host schedules; a tick
//! from an older transition is ignored.

use crate::pagination::Direction;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    pub exit_ms: u64,
    pub enter_delay_ms: u64,
    pub settle_ms: u64,
    /// Horizontal distance a page slides while fading.
    pub travel_px: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TransitionConfig {
            exit_ms: 150,
            enter_delay_ms: 50,
            settle_ms: 150,
            travel_px: 40.0,
        }
    }
}

impl TransitionConfig {
    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Exiting(Direction),
    Entering(Direction),
    Settling(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Exit animation done: swap in the new page's items.
    SwapContent,
    /// Start animating the new page into place.
    Settle,
    /// Back to rest.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTick {
    generation: u64,
    pub step: Step,
}

/// A tick the host must deliver back after `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub tick: TransitionTick,
    pub after: Duration,
}

/// Visual state of the page surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub opacity: f32,
    pub offset_x: f32,
}

impl Frame {
    pub const REST: Frame = Frame {
        opacity: 1.0,
        offset_x: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct Transition {
    config: TransitionConfig,
    phase: Phase,
    generation: u64,
    phase_started: Instant,
}

impl Transition {
    pub fn new(config: TransitionConfig) -> Self {
        Transition {
            config,
            phase: Phase::Idle,
            generation: 0,
            phase_started: Instant::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Start a transition. Returns `None` while another one is running.
    pub fn begin(&mut self, direction: Direction, now: Instant) -> Option<Scheduled> {
        if !self.is_idle() {
            return None;
        }
        self.generation += 1;
        self.enter_phase(Phase::Exiting(direction), now);
        Some(self.schedule(Step::SwapContent, self.config.exit()))
    }

    /// Advance on a delivered tick. Returns the next tick to schedule, if any.
    pub fn on_tick(&mut self, tick: TransitionTick, now: Instant) -> Option<Scheduled> {
        if tick.generation != self.generation {
            return None;
        }
        match (self.phase, tick.step) {
            (Phase::Exiting(direction), Step::SwapContent) => {
                self.enter_phase(Phase::Entering(direction), now);
                Some(self.schedule(Step::Settle, self.config.enter_delay()))
            }
            (Phase::Entering(direction), Step::Settle) => {
                self.enter_phase(Phase::Settling(direction), now);
                Some(self.schedule(Step::Finish, self.config.settle()))
            }
            (Phase::Settling(_), Step::Finish) => {
                self.enter_phase(Phase::Idle, now);
                None
            }
            _ => None,
        }
    }

    /// Abort any running transition and return to rest.
    pub fn reset(&mut self, now: Instant) {
        self.generation += 1;
        self.enter_phase(Phase::Idle, now);
    }

    pub fn frame_at(&self, now: Instant) -> Frame {
        let travel = self.config.travel_px;
        match self.phase {
            Phase::Idle => Frame::REST,
            Phase::Exiting(direction) => {
                let p = self.progress(now, self.config.exit());
                Frame {
                    opacity: 1.0 - p,
                    offset_x: direction.sign() * travel * p,
                }
            }
            Phase::Entering(direction) => Frame {
                opacity: 0.0,
                offset_x: -direction.sign() * travel,
            },
            Phase::Settling(direction) => {
                let p = self.progress(now, self.config.settle());
                Frame {
                    opacity: p,
                    offset_x: -direction.sign() * travel * (1.0 - p),
                }
            }
        }
    }

    fn progress(&self, now: Instant, duration: Duration) -> f32 {
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.phase_started);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn enter_phase(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        self.phase_started = now;
    }

    fn schedule(&self, step: Step, after: Duration) -> Scheduled {
        Scheduled {
            tick: TransitionTick {
                generation: self.generation,
                step,
            },
            after,
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}
