use device_query::Keycode;
use serde::{Deserialize, Serialize};

/// Platform-independent key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Pause,
    ScrollLock,
    Escape,
    Delete,
    Home,
    Left,
    Up,
    Right,
    Down,
    PageUp,
    PageDown,
    End,
    PrintScreen,
    Insert,
    Menu,
    NumLock,
    NumpadEnter,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEquals,
    NumpadDecimal,
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
    LShift,
    RShift,
    LControl,
    RControl,
    LAlt,
    RAlt,
    LMeta,
    RMeta,
    CapsLock,
    Space,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Equal,
    Semicolon,
    LeftBracket,
    Backslash,
    RightBracket,
    Grave,
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
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
}

/// Logical to native mapping. Keys missing here have no native code.
const NATIVE: &[(Key, Keycode)] = &[
    (Key::Backspace, Keycode::Backspace),
    (Key::Tab, Keycode::Tab),
    (Key::Enter, Keycode::Enter),
    (Key::Escape, Keycode::Escape),
    (Key::Delete, Keycode::Delete),
    (Key::Home, Keycode::Home),
    (Key::Left, Keycode::Left),
    (Key::Up, Keycode::Up),
    (Key::Right, Keycode::Right),
    (Key::Down, Keycode::Down),
    (Key::PageUp, Keycode::PageUp),
    (Key::PageDown, Keycode::PageDown),
    (Key::End, Keycode::End),
    (Key::Insert, Keycode::Insert),
    (Key::NumpadEnter, Keycode::NumpadEnter),
    (Key::Numpad0, Keycode::Numpad0),
    (Key::Numpad1, Keycode::Numpad1),
    (Key::Numpad2, Keycode::Numpad2),
    (Key::Numpad3, Keycode::Numpad3),
    (Key::Numpad4, Keycode::Numpad4),
    (Key::Numpad5, Keycode::Numpad5),
    (Key::Numpad6, Keycode::Numpad6),
    (Key::Numpad7, Keycode::Numpad7),
    (Key::Numpad8, Keycode::Numpad8),
    (Key::Numpad9, Keycode::Numpad9),
    (Key::NumpadAdd, Keycode::NumpadAdd),
    (Key::NumpadSubtract, Keycode::NumpadSubtract),
    (Key::NumpadMultiply, Keycode::NumpadMultiply),
    (Key::NumpadDivide, Keycode::NumpadDivide),
    (Key::NumpadEquals, Keycode::NumpadEquals),
    (Key::NumpadDecimal, Keycode::NumpadDecimal),
    (Key::F1, Keycode::F1),
    (Key::F2, Keycode::F2),
    (Key::F3, Keycode::F3),
    (Key::F4, Keycode::F4),
    (Key::F5, Keycode::F5),
    (Key::F6, Keycode::F6),
    (Key::F7, Keycode::F7),
    (Key::F8, Keycode::F8),
    (Key::F9, Keycode::F9),
    (Key::F10, Keycode::F10),
    (Key::F11, Keycode::F11),
    (Key::F12, Keycode::F12),
    (Key::LShift, Keycode::LShift),
    (Key::RShift, Keycode::RShift),
    (Key::LControl, Keycode::LControl),
    (Key::RControl, Keycode::RControl),
    (Key::LAlt, Keycode::LAlt),
    (Key::RAlt, Keycode::RAlt),
    (Key::LMeta, Keycode::LMeta),
    (Key::RMeta, Keycode::RMeta),
    (Key::CapsLock, Keycode::CapsLock),
    (Key::Space, Keycode::Space),
    (Key::Apostrophe, Keycode::Apostrophe),
    (Key::Comma, Keycode::Comma),
    (Key::Minus, Keycode::Minus),
    (Key::Period, Keycode::Dot),
    (Key::Slash, Keycode::Slash),
    (Key::Equal, Keycode::Equal),
    (Key::Semicolon, Keycode::Semicolon),
    (Key::LeftBracket, Keycode::LeftBracket),
    (Key::Backslash, Keycode::BackSlash),
    (Key::RightBracket, Keycode::RightBracket),
    (Key::Grave, Keycode::Grave),
    (Key::Key0, Keycode::Key0),
    (Key::Key1, Keycode::Key1),
    (Key::Key2, Keycode::Key2),
    (Key::Key3, Keycode::Key3),
    (Key::Key4, Keycode::Key4),
    (Key::Key5, Keycode::Key5),
    (Key::Key6, Keycode::Key6),
    (Key::Key7, Keycode::Key7),
    (Key::Key8, Keycode::Key8),
    (Key::Key9, Keycode::Key9),
    (Key::A, Keycode::A),
    (Key::B, Keycode::B),
    (Key::C, Keycode::C),
    (Key::D, Keycode::D),
    (Key::E, Keycode::E),
    (Key::F, Keycode::F),
    (Key::G, Keycode::G),
    (Key::H, Keycode::H),
    (Key::I, Keycode::I),
    (Key::J, Keycode::J),
    (Key::K, Keycode::K),
    (Key::L, Keycode::L),
    (Key::M, Keycode::M),
    (Key::N, Keycode::N),
    (Key::O, Keycode::O),
    (Key::P, Keycode::P),
    (Key::Q, Keycode::Q),
    (Key::R, Keycode::R),
    (Key::S, Keycode::S),
    (Key::T, Keycode::T),
    (Key::U, Keycode::U),
    (Key::V, Keycode::V),
    (Key::W, Keycode::W),
    (Key::X, Keycode::X),
    (Key::Y, Keycode::Y),
    (Key::Z, Keycode::Z),
];

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Key0,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

impl Key {
    /// Every logical key, mapped or not.
    pub const ALL: [Key; 105] = [
        Key::Backspace,
        Key::Tab,
        Key::Enter,
        Key::Pause,
        Key::ScrollLock,
        Key::Escape,
        Key::Delete,
        Key::Home,
        Key::Left,
        Key::Up,
        Key::Right,
        Key::Down,
        Key::PageUp,
        Key::PageDown,
        Key::End,
        Key::PrintScreen,
        Key::Insert,
        Key::Menu,
        Key::NumLock,
        Key::NumpadEnter,
        Key::Numpad0,
        Key::Numpad1,
        Key::Numpad2,
        Key::Numpad3,
        Key::Numpad4,
        Key::Numpad5,
        Key::Numpad6,
        Key::Numpad7,
        Key::Numpad8,
        Key::Numpad9,
        Key::NumpadAdd,
        Key::NumpadSubtract,
        Key::NumpadMultiply,
        Key::NumpadDivide,
        Key::NumpadEquals,
        Key::NumpadDecimal,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::LShift,
        Key::RShift,
        Key::LControl,
        Key::RControl,
        Key::LAlt,
        Key::RAlt,
        Key::LMeta,
        Key::RMeta,
        Key::CapsLock,
        Key::Space,
        Key::Apostrophe,
        Key::Comma,
        Key::Minus,
        Key::Period,
        Key::Slash,
        Key::Equal,
        Key::Semicolon,
        Key::LeftBracket,
        Key::Backslash,
        Key::RightBracket,
        Key::Grave,
        Key::Key0,
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
        Key::Key8,
        Key::Key9,
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];

    /// Native key code, if the platform facility can report this key.
    pub fn native(self) -> Option<Keycode> {
        NATIVE
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, code)| *code)
    }

    /// Key that produces the printable character `ch` on a US layout.
    pub fn from_char(ch: char) -> Option<Key> {
        if ch.is_ascii_alphabetic() {
            let index = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
            return Some(LETTERS[index]);
        }
        if ch.is_ascii_digit() {
            return Some(DIGITS[(ch as u8 - b'0') as usize]);
        }

        let key = match ch {
            ' ' => Key::Space,
            '\'' => Key::Apostrophe,
            ',' => Key::Comma,
            '-' => Key::Minus,
            '.' => Key::Period,
            '/' => Key::Slash,
            '=' => Key::Equal,
            ';' => Key::Semicolon,
            '[' => Key::LeftBracket,
            '\\' => Key::Backslash,
            ']' => Key::RightBracket,
            '`' => Key::Grave,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_entry_per_key() {
        for (index, (key, _)) in NATIVE.iter().enumerate() {
            assert!(
                NATIVE[index + 1..].iter().all(|(other, _)| other != key),
                "{key:?} mapped twice"
            );
            assert!(Key::ALL.contains(key));
        }
        let unmapped = Key::ALL.iter().filter(|key| key.native().is_none()).count();
        assert_eq!(unmapped, Key::ALL.len() - NATIVE.len());
    }

    #[test]
    fn characters_resolve_case_insensitively() {
        assert_eq!(Key::from_char('z'), Some(Key::Z));
        assert_eq!(Key::from_char('Z'), Some(Key::Z));
        assert_eq!(Key::from_char('7'), Some(Key::Key7));
        assert_eq!(Key::from_char('.'), Some(Key::Period));
        assert_eq!(Key::from_char('\n'), None);
    }
}
