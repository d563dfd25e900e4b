use glam::Vec2;

use crate::api::types::ArrangementMode;
use crate::rules::modifiers::Modifier;

/// Player intents, in table coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Press on the table: starts pulling an anchored cue ball.
    PointerDown { x: f32, y: f32 },
    /// Release: places the cue ball when none is on the table, otherwise shoots.
    PointerUp { x: f32, y: f32 },
    /// Pointer moved while pressed.
    PointerMove { x: f32, y: f32 },
    /// A character key (`1`/`2`/`3` arrangement, `r` restart).
    Key { ch: char },
    SelectArrangement(ArrangementMode),
    PlaceCue { x: f32, y: f32 },
    Modifier(Modifier),
    Restart,
}

impl InputEvent {
    pub fn pointer(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PlaceCue { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

/// A queue of input events.
/// JS writes events into the queue; the game drains them once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via the web runner).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
