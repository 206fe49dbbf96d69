use bitflags::bitflags;

use crate::event::{KeyCode, ModifierSet};

/// Native codes for function and navigation keys.
///
/// These live in the Unicode private-use range the platform uses for
/// non-printing keys, above the 256-entry direct table.
pub mod extended {
    pub const UP_ARROW: u32 = 0xF700;
    pub const DOWN_ARROW: u32 = 0xF701;
    pub const LEFT_ARROW: u32 = 0xF702;
    pub const RIGHT_ARROW: u32 = 0xF703;
    pub const F1: u32 = 0xF704;
    pub const F2: u32 = 0xF705;
    pub const F3: u32 = 0xF706;
    pub const F4: u32 = 0xF707;
    pub const F5: u32 = 0xF708;
    pub const F6: u32 = 0xF709;
    pub const F7: u32 = 0xF70A;
    pub const F8: u32 = 0xF70B;
    pub const F9: u32 = 0xF70C;
    pub const F10: u32 = 0xF70D;
    pub const F11: u32 = 0xF70E;
    pub const F12: u32 = 0xF70F;
    pub const HOME: u32 = 0xF729;
    pub const END: u32 = 0xF72B;
    pub const PAGE_UP: u32 = 0xF72C;
    pub const PAGE_DOWN: u32 = 0xF72D;
    pub const PRINT_SCREEN: u32 = 0xF72E;
}

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

/// Maps native key codes to [`KeyCode`].
///
/// Codes `0..256` index a direct table built from character values (both cases
/// of a letter, and both glyphs of a shifted punctuation key, share one entry).
/// Higher codes fall back to the [`extended`] function/navigation set.
#[derive(Debug, Clone)]
pub struct KeyTranslationTable {
    direct: [Option<KeyCode>; 256],
}

impl KeyTranslationTable {
    pub const fn new() -> Self {
        let mut direct = [None; 256];

        direct[27] = Some(KeyCode::Esc);
        direct[b'\n' as usize] = Some(KeyCode::Return);
        direct[b'\r' as usize] = Some(KeyCode::Return);
        direct[b'\t' as usize] = Some(KeyCode::Tab);
        direct[127] = Some(KeyCode::Backspace);
        direct[8] = Some(KeyCode::Backspace);
        direct[b' ' as usize] = Some(KeyCode::Space);

        direct[b'+' as usize] = Some(KeyCode::Plus);
        direct[b'=' as usize] = Some(KeyCode::Plus);
        direct[b'_' as usize] = Some(KeyCode::Minus);
        direct[b'-' as usize] = Some(KeyCode::Minus);

        direct[b'~' as usize] = Some(KeyCode::Tilde);
        direct[b'`' as usize] = Some(KeyCode::Tilde);

        direct[b':' as usize] = Some(KeyCode::Semicolon);
        direct[b';' as usize] = Some(KeyCode::Semicolon);
        direct[b'"' as usize] = Some(KeyCode::Quote);
        direct[b'\'' as usize] = Some(KeyCode::Quote);

        direct[b'{' as usize] = Some(KeyCode::LeftBracket);
        direct[b'[' as usize] = Some(KeyCode::LeftBracket);
        direct[b'}' as usize] = Some(KeyCode::RightBracket);
        direct[b']' as usize] = Some(KeyCode::RightBracket);

        direct[b'<' as usize] = Some(KeyCode::Comma);
        direct[b',' as usize] = Some(KeyCode::Comma);
        direct[b'>' as usize] = Some(KeyCode::Period);
        direct[b'.' as usize] = Some(KeyCode::Period);
        direct[b'?' as usize] = Some(KeyCode::Slash);
        direct[b'/' as usize] = Some(KeyCode::Slash);
        direct[b'|' as usize] = Some(KeyCode::Backslash);
        direct[b'\\' as usize] = Some(KeyCode::Backslash);

        let mut i = 0;
        while i < KeyCode::DIGITS.len() {
            direct[b'0' as usize + i] = Some(KeyCode::DIGITS[i]);
            i += 1;
        }

        let mut i = 0;
        while i < KeyCode::LETTERS.len() {
            direct[b'a' as usize + i] = Some(KeyCode::LETTERS[i]);
            direct[b'A' as usize + i] = Some(KeyCode::LETTERS[i]);
            i += 1;
        }

        Self { direct }
    }

    /// Returns the key for `native`, or `None` when neither table maps it.
    pub fn translate(&self, native: u32) -> Option<KeyCode> {
        match usize::try_from(native) {
            Ok(idx) if idx < self.direct.len() => self.direct[idx],
            _ => translate_extended(native),
        }
    }
}

impl Default for KeyTranslationTable {
    fn default() -> Self {
        Self::new()
    }
}

fn translate_extended(native: u32) -> Option<KeyCode> {
    use extended::*;

    let key = match native {
        F1..=F12 => FUNCTION_KEYS[(native - F1) as usize],

        LEFT_ARROW => KeyCode::Left,
        RIGHT_ARROW => KeyCode::Right,
        UP_ARROW => KeyCode::Up,
        DOWN_ARROW => KeyCode::Down,

        PAGE_UP => KeyCode::PageUp,
        PAGE_DOWN => KeyCode::PageDown,
        HOME => KeyCode::Home,
        END => KeyCode::End,

        PRINT_SCREEN => KeyCode::Print,

        _ => return None,
    };
    Some(key)
}

bitflags! {
    /// Modifier flags as reported by the platform, without side information.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
    pub struct PlatformModifiers: u8 {
        const SHIFT   = 1 << 0;
        const ALT     = 1 << 1;
        const CONTROL = 1 << 2;
        const META    = 1 << 3;
    }
}

impl From<PlatformModifiers> for ModifierSet {
    /// Each platform flag sets both the left and the right flag of its class.
    fn from(flags: PlatformModifiers) -> Self {
        let mut set = ModifierSet::empty();
        if flags.contains(PlatformModifiers::SHIFT) {
            set |= ModifierSet::SHIFT;
        }
        if flags.contains(PlatformModifiers::ALT) {
            set |= ModifierSet::ALT;
        }
        if flags.contains(PlatformModifiers::CONTROL) {
            set |= ModifierSet::CTRL;
        }
        if flags.contains(PlatformModifiers::META) {
            set |= ModifierSet::META;
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── direct table ──────────────────────────────────────────────────────

    #[test]
    fn letter_cases_share_a_key() {
        let table = KeyTranslationTable::new();
        assert_eq!(table.translate(97), Some(KeyCode::KeyA));
        assert_eq!(table.translate(65), Some(KeyCode::KeyA));
        assert_eq!(table.translate(u32::from(b'z')), Some(KeyCode::KeyZ));
        assert_eq!(table.translate(u32::from(b'Z')), Some(KeyCode::KeyZ));
    }

    #[test]
    fn shifted_punctuation_shares_a_key() {
        let table = KeyTranslationTable::new();
        for (a, b, key) in [
            (b'+', b'=', KeyCode::Plus),
            (b'_', b'-', KeyCode::Minus),
            (b'{', b'[', KeyCode::LeftBracket),
            (b'?', b'/', KeyCode::Slash),
            (b'|', b'\\', KeyCode::Backslash),
        ] {
            assert_eq!(table.translate(u32::from(a)), Some(key));
            assert_eq!(table.translate(u32::from(b)), Some(key));
        }
    }

    #[test]
    fn control_characters() {
        let table = KeyTranslationTable::new();
        assert_eq!(table.translate(27), Some(KeyCode::Esc));
        assert_eq!(table.translate(u32::from(b'\r')), Some(KeyCode::Return));
        assert_eq!(table.translate(127), Some(KeyCode::Backspace));
        assert_eq!(table.translate(u32::from(b'5')), Some(KeyCode::Key5));
    }

    #[test]
    fn unmapped_direct_code_misses() {
        let table = KeyTranslationTable::new();
        assert_eq!(table.translate(0), None);
        assert_eq!(table.translate(u32::from(b'@')), None);
        assert_eq!(table.translate(200), None);
    }

    // ── extended table ────────────────────────────────────────────────────

    #[test]
    fn function_keys_are_contiguous() {
        let table = KeyTranslationTable::new();
        let codes = [
            extended::F1,
            extended::F2,
            extended::F3,
            extended::F4,
            extended::F5,
            extended::F6,
            extended::F7,
            extended::F8,
            extended::F9,
            extended::F10,
            extended::F11,
            extended::F12,
        ];
        for (code, key) in codes.into_iter().zip(FUNCTION_KEYS) {
            assert_eq!(table.translate(code), Some(key));
        }
        assert_eq!(table.translate(extended::F1 + 6), Some(KeyCode::F7));
    }

    #[test]
    fn navigation_keys() {
        let table = KeyTranslationTable::new();
        assert_eq!(table.translate(extended::UP_ARROW), Some(KeyCode::Up));
        assert_eq!(table.translate(extended::LEFT_ARROW), Some(KeyCode::Left));
        assert_eq!(table.translate(extended::PAGE_DOWN), Some(KeyCode::PageDown));
        assert_eq!(table.translate(extended::END), Some(KeyCode::End));
        assert_eq!(table.translate(extended::PRINT_SCREEN), Some(KeyCode::Print));
    }

    #[test]
    fn unknown_extended_code_misses() {
        let table = KeyTranslationTable::new();
        assert_eq!(table.translate(0xF72A), None);
        assert_eq!(table.translate(0x4E2D), None);
    }

    // ── modifiers ─────────────────────────────────────────────────────────

    #[test]
    fn sideless_flag_sets_both_sides() {
        let set = ModifierSet::from(PlatformModifiers::SHIFT);
        assert!(set.contains(ModifierSet::LEFT_SHIFT));
        assert!(set.contains(ModifierSet::RIGHT_SHIFT));
        assert!(!set.intersects(ModifierSet::ALT | ModifierSet::CTRL | ModifierSet::META));
    }

    #[test]
    fn combined_flags() {
        let set = ModifierSet::from(PlatformModifiers::CONTROL | PlatformModifiers::META);
        assert_eq!(set, ModifierSet::CTRL | ModifierSet::META);
        assert_eq!(ModifierSet::from(PlatformModifiers::empty()), ModifierSet::empty());
    }
}
