use std::collections::HashSet;

use crate::event::{ButtonKind, Event, KeyCode};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down and where the pointer is.
/// `InputFrame` holds what changed since the previous frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Drained events in queue order.
    pub events: Vec<Event>,

    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,

    pub buttons_pressed: HashSet<ButtonKind>,
    pub buttons_released: HashSet<ButtonKind>,

    /// Wheel movement accumulated over the frame.
    pub wheel_delta: i32,

    /// Last size reported this frame, if the window was resized.
    pub resized: Option<(u16, u16)>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel_delta = 0;
        self.resized = None;
    }

    pub fn push_event(&mut self, ev: Event) {
        self.events.push(ev);
    }
}
