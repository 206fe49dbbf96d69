use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::Window;

use crate::event::{ButtonKind, ButtonState};
use crate::input::{extended, PlatformEvent, PlatformModifiers};

/// Lowers winit `WindowEvent`s into [`PlatformEvent`] records.
///
/// winit reports modifiers separately from key presses, so the adapter keeps
/// the last modifier state and attaches it to each key event.
#[derive(Debug)]
pub struct WinitAdapter {
    modifiers: PlatformModifiers,
    pixels_per_line: f64,
}

impl WinitAdapter {
    /// `pixels_per_line` converts high-precision pixel scrolling into wheel lines.
    pub fn new(pixels_per_line: f64) -> Self {
        Self {
            modifiers: PlatformModifiers::empty(),
            pixels_per_line: pixels_per_line.max(1.0),
        }
    }

    pub fn lower(&mut self, window: &Window, event: &WindowEvent) -> PlatformEvent {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                PlatformEvent::Other
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical(window, *position);
                PlatformEvent::PointerMoved { x, y }
            }

            WindowEvent::MouseInput { state, button, .. } => PlatformEvent::Button {
                button: map_mouse_button(*button),
                state: map_state(*state),
            },

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
                    MouseScrollDelta::PixelDelta(p) => {
                        let (_, y) = to_logical(window, *p);
                        y / self.pixels_per_line
                    }
                };
                PlatformEvent::Wheel { delta }
            }

            WindowEvent::KeyboardInput { event, .. } => match native_key_code(&event.logical_key) {
                Some(code) => PlatformEvent::Key {
                    code,
                    modifiers: self.modifiers,
                    state: map_state(event.state),
                },
                None => PlatformEvent::Other,
            },

            WindowEvent::Resized(size) => {
                let logical = size.to_logical::<f64>(window.scale_factor());
                PlatformEvent::Resized {
                    width: logical.width.round() as u32,
                    height: logical.height.round() as u32,
                }
            }

            _ => PlatformEvent::Other,
        }
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> (f64, f64) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x, logical.y)
}

fn map_state(s: ElementState) -> ButtonState {
    match s {
        ElementState::Pressed => ButtonState::Down,
        ElementState::Released => ButtonState::Up,
    }
}

fn map_modifiers(m: ModifiersState) -> PlatformModifiers {
    let mut flags = PlatformModifiers::empty();
    flags.set(PlatformModifiers::SHIFT, m.shift_key());
    flags.set(PlatformModifiers::ALT, m.alt_key());
    flags.set(PlatformModifiers::CONTROL, m.control_key());
    flags.set(PlatformModifiers::META, m.super_key());
    flags
}

fn map_mouse_button(b: MouseButton) -> ButtonKind {
    match b {
        MouseButton::Left => ButtonKind::Left,
        MouseButton::Right => ButtonKind::Right,
        // Every other button reports as the middle button.
        MouseButton::Middle | MouseButton::Back | MouseButton::Forward | MouseButton::Other(_) => {
            ButtonKind::Middle
        }
    }
}

/// Character value for printable keys, private-use code for function and
/// navigation keys, `None` for keys with neither.
fn native_key_code(key: &Key) -> Option<u32> {
    match key {
        Key::Character(s) => s.chars().next().map(u32::from),
        Key::Named(named) => {
            let code = match named {
                NamedKey::Escape => 27,
                NamedKey::Enter => u32::from(b'\r'),
                NamedKey::Tab => u32::from(b'\t'),
                NamedKey::Backspace => 127,
                NamedKey::Space => u32::from(b' '),

                NamedKey::ArrowUp => extended::UP_ARROW,
                NamedKey::ArrowDown => extended::DOWN_ARROW,
                NamedKey::ArrowLeft => extended::LEFT_ARROW,
                NamedKey::ArrowRight => extended::RIGHT_ARROW,

                NamedKey::Home => extended::HOME,
                NamedKey::End => extended::END,
                NamedKey::PageUp => extended::PAGE_UP,
                NamedKey::PageDown => extended::PAGE_DOWN,
                NamedKey::PrintScreen => extended::PRINT_SCREEN,

                NamedKey::F1 => extended::F1,
                NamedKey::F2 => extended::F2,
                NamedKey::F3 => extended::F3,
                NamedKey::F4 => extended::F4,
                NamedKey::F5 => extended::F5,
                NamedKey::F6 => extended::F6,
                NamedKey::F7 => extended::F7,
                NamedKey::F8 => extended::F8,
                NamedKey::F9 => extended::F9,
                NamedKey::F10 => extended::F10,
                NamedKey::F11 => extended::F11,
                NamedKey::F12 => extended::F12,

                _ => return None,
            };
            Some(code)
        }
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}
