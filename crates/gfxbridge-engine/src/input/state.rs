use std::collections::HashSet;

use crate::event::{ButtonKind, ButtonState, Event, KeyCode, ModifierSet};

use super::frame::InputFrame;

/// Host-visible input state, owned by the render thread.
///
/// Built up from drained queue events; per-frame transitions go to an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Modifiers of the most recent key event.
    pub modifiers: ModifierSet,

    /// Clamped pointer position in content coordinates.
    pub pointer: (u16, u16),

    /// Integral wheel position.
    pub wheel: i32,

    /// Content size, once the first resize has been seen.
    pub window_size: Option<(u16, u16)>,

    pub keys_down: HashSet<KeyCode>,
    pub buttons_down: HashSet<ButtonKind>,
}

impl InputState {
    /// Applies a drained event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: Event) {
        match ev {
            Event::Resize { width, height } => {
                self.window_size = Some((width, height));
                frame.resized = Some((width, height));
            }

            Event::Mouse { x, y, wheel, button } => {
                self.pointer = (x, y);
                // The wheel position saturates at the i32 bounds, so one step
                // can span the whole range.
                let delta = i64::from(frame.wheel_delta) + i64::from(wheel) - i64::from(self.wheel);
                frame.wheel_delta = delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                self.wheel = wheel;

                match button {
                    Some((button, ButtonState::Down)) => {
                        if self.buttons_down.insert(button) {
                            frame.buttons_pressed.insert(button);
                        }
                    }
                    Some((button, ButtonState::Up)) => {
                        // Synthetic releases after a resize land here for buttons
                        // that are not down; they produce no transition.
                        if self.buttons_down.remove(&button) {
                            frame.buttons_released.insert(button);
                        }
                    }
                    None => {}
                }
            }

            Event::Key { code, modifiers, state } => {
                self.modifiers = modifiers;

                match state {
                    ButtonState::Down => {
                        if self.keys_down.insert(code) {
                            frame.keys_pressed.insert(code);
                        }
                    }
                    ButtonState::Up => {
                        if self.keys_down.remove(&code) {
                            frame.keys_released.insert(code);
                        }
                    }
                }
            }

            // Consumed by the render loop before it reaches input state.
            Event::Exit => return,
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: ButtonKind) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(events: &[Event]) -> (InputState, InputFrame) {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for ev in events {
            state.apply_event(&mut frame, *ev);
        }
        (state, frame)
    }

    fn button(b: ButtonKind, s: ButtonState) -> Event {
        Event::Mouse {
            x: 4,
            y: 5,
            wheel: 0,
            button: Some((b, s)),
        }
    }

    #[test]
    fn button_press_and_release_are_tracked() {
        let (state, frame) = apply_all(&[
            button(ButtonKind::Left, ButtonState::Down),
            button(ButtonKind::Right, ButtonState::Down),
            button(ButtonKind::Right, ButtonState::Up),
        ]);

        assert!(state.button_down(ButtonKind::Left));
        assert!(!state.button_down(ButtonKind::Right));
        assert_eq!(state.pointer, (4, 5));
        assert!(frame.buttons_pressed.contains(&ButtonKind::Right));
        assert!(frame.buttons_released.contains(&ButtonKind::Right));
        assert_eq!(frame.events.len(), 3);
    }

    #[test]
    fn resize_releases_clear_held_buttons() {
        let (state, frame) = apply_all(&[
            button(ButtonKind::Left, ButtonState::Down),
            Event::Resize {
                width: 800,
                height: 600,
            },
            button(ButtonKind::Left, ButtonState::Up),
            button(ButtonKind::Right, ButtonState::Up),
        ]);

        assert!(state.buttons_down.is_empty());
        assert_eq!(state.window_size, Some((800, 600)));
        assert_eq!(frame.resized, Some((800, 600)));
        assert!(!frame.buttons_released.contains(&ButtonKind::Right));
    }

    #[test]
    fn repeated_key_down_is_one_transition() {
        let down = Event::Key {
            code: KeyCode::KeyW,
            modifiers: ModifierSet::CTRL,
            state: ButtonState::Down,
        };
        let (state, frame) = apply_all(&[down, down]);

        assert!(state.key_down(KeyCode::KeyW));
        assert_eq!(state.modifiers, ModifierSet::CTRL);
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);
    }

    fn wheel(wheel: i32) -> Event {
        Event::Mouse {
            x: 0,
            y: 0,
            wheel,
            button: None,
        }
    }

    #[test]
    fn wheel_delta_accumulates_within_frame() {
        let (state, frame) = apply_all(&[wheel(2), wheel(5), wheel(3)]);
        assert_eq!(state.wheel, 3);
        assert_eq!(frame.wheel_delta, 3);
    }

    #[test]
    fn wheel_jump_across_full_range_saturates() {
        let (state, frame) = apply_all(&[wheel(i32::MIN), wheel(i32::MAX)]);
        assert_eq!(state.wheel, i32::MAX);
        assert_eq!(frame.wheel_delta, i32::MAX);

        let (_, frame) = apply_all(&[wheel(i32::MAX), wheel(i32::MIN), wheel(i32::MIN + 1)]);
        assert_eq!(frame.wheel_delta, i32::MIN + 1);
    }

    #[test]
    fn exit_is_not_recorded() {
        let (_, frame) = apply_all(&[Event::Exit]);
        assert!(frame.events.is_empty());
    }
}
