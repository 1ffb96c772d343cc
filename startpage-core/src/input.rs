//! Input routing for the paginated viewport.
//!
//! Pointer drags, wheel ticks, arrow keys and indicator clicks all reduce to a
//! single [`PageRequest`]. The router holds no timers itself: wheel debouncing
//! hands back a [`WheelTicket`] that the host fires after the debounce delay,
//! and only the newest ticket produces a request.

use crate::pagination::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Next,
    Prev,
    GoTo(usize),
}

impl From<Direction> for PageRequest {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Next => PageRequest::Next,
            Direction::Prev => PageRequest::Prev,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Where keyboard focus is when a key arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Surface,
    TextEntry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    PointerUp,
    PointerCancel,
    /// Vertical wheel delta, positive when scrolling down.
    Wheel { delta_y: f32 },
    Key { key: Key, focus: Focus },
    IndicatorClick(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouterOutput {
    Ignored,
    /// Damped drag offset to apply to the rendering surface.
    Feedback { offset: f32 },
    /// Drag finished; the offset reverts. Carries a request when the drag
    /// passed the swipe threshold.
    Released { request: Option<PageRequest> },
    Request(PageRequest),
    /// Fire `ticket` back through `GestureRouter::wheel_elapsed` after `after`.
    ScheduleWheel { ticket: WheelTicket, after: Duration },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub swipe_threshold_px: f32,
    pub drag_damping: f32,
    pub wheel_debounce_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            swipe_threshold_px: 50.0,
            drag_damping: 0.3,
            wheel_debounce_ms: 50,
        }
    }
}

impl GestureConfig {
    pub fn wheel_debounce(&self) -> Duration {
        Duration::from_millis(self.wheel_debounce_ms)
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f32,
    current_x: f32,
}

#[derive(Debug, Clone)]
pub struct GestureRouter {
    config: GestureConfig,
    drag: Option<Drag>,
    wheel_generation: u64,
    pending_wheel_delta: f32,
    /// Whether the most recent finished drag passed the swipe threshold.
    last_drag_swiped: bool,
}

impl GestureRouter {
    pub fn new(config: GestureConfig) -> Self {
        GestureRouter {
            config,
            drag: None,
            wheel_generation: 0,
            pending_wheel_delta: 0.0,
            last_drag_swiped: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current damped drag offset, zero when not dragging.
    pub fn drag_offset(&self) -> f32 {
        self.drag
            .map(|d| (d.current_x - d.start_x) * self.config.drag_damping)
            .unwrap_or(0.0)
    }

    /// True while a drag has moved past the swipe threshold, and after release
    /// until the next press. Hosts use it to keep a swipe from also counting
    /// as a click on whatever was under the pointer.
    pub fn drag_exceeded_threshold(&self) -> bool {
        match self.drag {
            Some(drag) => self.passes_threshold(drag.current_x - drag.start_x),
            None => self.last_drag_swiped,
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> RouterOutput {
        match event {
            InputEvent::PointerDown { x } => {
                self.last_drag_swiped = false;
                self.drag = Some(Drag {
                    start_x: x,
                    current_x: x,
                });
                RouterOutput::Feedback { offset: 0.0 }
            }
            InputEvent::PointerMove { x } => match self.drag.as_mut() {
                Some(drag) => {
                    drag.current_x = x;
                    RouterOutput::Feedback {
                        offset: self.drag_offset(),
                    }
                }
                None => RouterOutput::Ignored,
            },
            InputEvent::PointerUp => match self.drag.take() {
                Some(drag) => {
                    let request = self.swipe_request(drag.current_x - drag.start_x);
                    self.last_drag_swiped = request.is_some();
                    RouterOutput::Released { request }
                }
                None => RouterOutput::Ignored,
            },
            InputEvent::PointerCancel => match self.drag.take() {
                Some(_) => RouterOutput::Released { request: None },
                None => RouterOutput::Ignored,
            },
            InputEvent::Wheel { delta_y } => {
                // the burst's net direction decides, not its last tick
                self.wheel_generation += 1;
                self.pending_wheel_delta += delta_y;
                RouterOutput::ScheduleWheel {
                    ticket: WheelTicket(self.wheel_generation),
                    after: self.config.wheel_debounce(),
                }
            }
            InputEvent::Key { focus: Focus::TextEntry, .. } => RouterOutput::Ignored,
            InputEvent::Key { key, .. } => match key {
                Key::ArrowLeft => RouterOutput::Request(PageRequest::Prev),
                Key::ArrowRight => RouterOutput::Request(PageRequest::Next),
                Key::Other => RouterOutput::Ignored,
            },
            InputEvent::IndicatorClick(index) => RouterOutput::Request(PageRequest::GoTo(index)),
        }
    }

    /// A debounce timer fired. Superseded tickets yield nothing; the newest
    /// one resolves the accumulated delta and starts a fresh burst.
    pub fn wheel_elapsed(&mut self, ticket: WheelTicket) -> Option<PageRequest> {
        if ticket.0 != self.wheel_generation {
            return None;
        }
        let delta = std::mem::take(&mut self.pending_wheel_delta);
        if delta > 0.0 {
            Some(PageRequest::Next)
        } else if delta < 0.0 {
            Some(PageRequest::Prev)
        } else {
            None
        }
    }

    fn passes_threshold(&self, delta_x: f32) -> bool {
        delta_x.abs() > self.config.swipe_threshold_px
    }

    fn swipe_request(&self, delta_x: f32) -> Option<PageRequest> {
        if !self.passes_threshold(delta_x) {
            return None;
        }
        if delta_x > 0.0 {
            Some(PageRequest::Prev)
        } else {
            Some(PageRequest::Next)
        }
    }
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
