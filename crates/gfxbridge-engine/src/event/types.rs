use std::fmt;

use bitflags::bitflags;

/// Normalized key identifier.
///
/// Platform key codes are mapped into these by the key translation table.
/// Keys the table does not know are never represented; translation yields `None`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyCode {
    Esc,
    Return,
    Tab,
    Space,
    Backspace,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,
    Print,

    Plus,
    Minus,
    LeftBracket,
    RightBracket,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Backslash,
    Tilde,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
}

impl KeyCode {
    /// Letter keys in alphabetical order.
    pub const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
        KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
        KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
        KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
        KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
        KeyCode::KeyZ,
    ];

    /// Digit keys from `0` to `9`.
    pub const DIGITS: [KeyCode; 10] = [
        KeyCode::Key0, KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4,
        KeyCode::Key5, KeyCode::Key6, KeyCode::Key7, KeyCode::Key8, KeyCode::Key9,
    ];
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ButtonKind {
    Left,
    Right,
    Middle,
}

/// Pressed state shared by mouse buttons and keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ButtonState {
    Up,
    Down,
}

bitflags! {
    /// Held modifier keys, split by side.
    ///
    /// Platforms that report a modifier class without a side set both flags of
    /// that class; the renderer's input layer expects exactly that.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct ModifierSet: u8 {
        const LEFT_SHIFT  = 1 << 0;
        const RIGHT_SHIFT = 1 << 1;
        const LEFT_ALT    = 1 << 2;
        const RIGHT_ALT   = 1 << 3;
        const LEFT_CTRL   = 1 << 4;
        const RIGHT_CTRL  = 1 << 5;
        const LEFT_META   = 1 << 6;
        const RIGHT_META  = 1 << 7;

        const SHIFT = Self::LEFT_SHIFT.bits() | Self::RIGHT_SHIFT.bits();
        const ALT   = Self::LEFT_ALT.bits() | Self::RIGHT_ALT.bits();
        const CTRL  = Self::LEFT_CTRL.bits() | Self::RIGHT_CTRL.bits();
        const META  = Self::LEFT_META.bits() | Self::RIGHT_META.bits();
    }
}

/// Normalized input/lifecycle event carried by the [`EventQueue`](super::EventQueue).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Event {
    /// Window content area changed size.
    Resize { width: u16, height: u16 },

    /// Pointer update. `button` is set only for press/release transitions;
    /// plain moves and wheel updates carry `None`.
    Mouse {
        x: u16,
        y: u16,
        wheel: i32,
        button: Option<(ButtonKind, ButtonState)>,
    },

    Key {
        code: KeyCode,
        modifiers: ModifierSet,
        state: ButtonState,
    },

    /// Cooperative shutdown request. Consumers stop polling once they see it.
    Exit,
}

impl Event {
    pub fn is_exit(&self) -> bool {
        matches!(self, Event::Exit)
    }
}
