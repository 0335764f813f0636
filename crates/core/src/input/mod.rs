//! Keyboard state queries by logical key identity.
//!
//! [`InputPoller`] wraps a [`KeyboardBackend`] that produces point-in-time
//! snapshots of the held keys. Logical [`Key`]s are translated to the
//! backend's [`Keycode`] through a static table; keys absent from the table
//! are never reported as held.

mod keys;

use device_query::{DeviceQuery, DeviceState, Keycode};

use crate::Result;

pub use keys::Key;

/// Source of keyboard state snapshots.
pub trait KeyboardBackend {
    /// Every key held at the moment of the call.
    fn pressed_keys(&self) -> Vec<Keycode>;
}

/// Production backend backed by [`device_query`].
pub struct DeviceQueryBackend {
    state: DeviceState,
}

impl DeviceQueryBackend {
    /// Connects to the platform keyboard facility.
    pub fn connect() -> Result<Self> {
        #[cfg(target_os = "linux")]
        let state = DeviceState::checked_new().ok_or_else(|| {
            crate::ToneError::InputInit("failed to open the X11 display".to_string())
        })?;
        #[cfg(not(target_os = "linux"))]
        let state = DeviceState::new();

        Ok(Self { state })
    }
}

impl KeyboardBackend for DeviceQueryBackend {
    fn pressed_keys(&self) -> Vec<Keycode> {
        self.state.get_keys()
    }
}

/// Point-in-time set of held keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pressed: Vec<Keycode>,
}

impl KeySnapshot {
    /// Wraps the native codes reported by a backend.
    pub fn new(pressed: Vec<Keycode>) -> Self {
        Self { pressed }
    }

    /// Whether `key` was held when the snapshot was taken. Keys without a
    /// native mapping report `false`.
    pub fn contains(&self, key: Key) -> bool {
        key.native()
            .map(|code| self.pressed.contains(&code))
            .unwrap_or(false)
    }

    /// True when no key at all was held.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}

/// Answers "is this key held right now?".
pub struct InputPoller<B = DeviceQueryBackend> {
    backend: B,
}

impl InputPoller<DeviceQueryBackend> {
    /// Acquires the platform keyboard facility.
    pub fn initialize() -> Result<Self> {
        let backend = DeviceQueryBackend::connect().map_err(|err| {
            tracing::error!(%err, "keyboard state unavailable");
            err
        })?;
        tracing::debug!("input poller initialised");
        Ok(Self::with_backend(backend))
    }
}

impl<B: KeyboardBackend> InputPoller<B> {
    /// Wraps an already connected backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// The backend answering the queries.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Captures the full set of held keys once.
    pub fn snapshot(&self) -> KeySnapshot {
        KeySnapshot::new(self.backend.pressed_keys())
    }

    /// Whether `key` is held. Keys without a native mapping report `false`.
    pub fn is_pressed(&self, key: Key) -> bool {
        match key.native() {
            Some(code) => self.backend.pressed_keys().contains(&code),
            None => false,
        }
    }

    /// Whether the key producing the printable character `ch` is held.
    ///
    /// Letters are matched case-insensitively. Characters with no key mapping
    /// report `false`.
    pub fn is_char_pressed(&self, ch: char) -> bool {
        Key::from_char(ch)
            .map(|key| self.is_pressed(key))
            .unwrap_or(false)
    }
}

impl<B> Drop for InputPoller<B> {
    fn drop(&mut self) {
        tracing::debug!("input poller released");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Backend whose held keys are set directly by the test.
    #[derive(Default)]
    pub(crate) struct ScriptedKeyboard {
        pub(crate) held: RefCell<Vec<Keycode>>,
    }

    impl ScriptedKeyboard {
        pub(crate) fn press(&self, code: Keycode) {
            self.held.borrow_mut().push(code);
        }

        pub(crate) fn release(&self, code: Keycode) {
            self.held.borrow_mut().retain(|held| *held != code);
        }
    }

    impl KeyboardBackend for ScriptedKeyboard {
        fn pressed_keys(&self) -> Vec<Keycode> {
            self.held.borrow().clone()
        }
    }

    #[test]
    fn nothing_held_before_any_event() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());
        assert!(Key::ALL.iter().all(|&key| !poller.is_pressed(key)));
        assert!(poller.snapshot().is_empty());
    }

    #[test]
    fn reflects_press_and_release() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());

        poller.backend().press(Keycode::Z);
        assert!(poller.is_pressed(Key::Z));
        assert!(!poller.is_pressed(Key::S));

        poller.backend().release(Keycode::Z);
        assert!(!poller.is_pressed(Key::Z));
    }

    #[test]
    fn unmapped_keys_are_never_pressed() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());
        for code in [Keycode::Escape, Keycode::A, Keycode::Space] {
            poller.backend().press(code);
        }

        for key in [Key::Pause, Key::ScrollLock, Key::PrintScreen, Key::Menu, Key::NumLock] {
            assert!(key.native().is_none());
            assert!(!poller.is_pressed(key));
            assert!(!poller.snapshot().contains(key));
        }
    }

    #[test]
    fn keypad_and_meta_keys_follow_snapshot() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());
        let pairs = [
            (Key::NumpadEnter, Keycode::NumpadEnter),
            (Key::NumpadEquals, Keycode::NumpadEquals),
            (Key::NumpadDecimal, Keycode::NumpadDecimal),
            (Key::LMeta, Keycode::LMeta),
            (Key::RMeta, Keycode::RMeta),
        ];

        for (key, code) in pairs {
            assert_eq!(key.native(), Some(code));
            assert!(!poller.is_pressed(key));

            poller.backend().press(code);
            assert!(poller.is_pressed(key), "{key:?} should be held");

            poller.backend().release(code);
            assert!(!poller.is_pressed(key), "{key:?} should be released");
        }
    }

    #[test]
    fn raw_characters_resolve_to_keys() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());
        poller.backend().press(Keycode::L);
        poller.backend().press(Keycode::Comma);

        assert!(poller.is_char_pressed('l'));
        assert!(poller.is_char_pressed('L'));
        assert!(poller.is_char_pressed(','));
        assert!(!poller.is_char_pressed('.'));
        assert!(!poller.is_char_pressed('é'));
    }

    #[test]
    fn snapshot_is_point_in_time() {
        let poller = InputPoller::with_backend(ScriptedKeyboard::default());
        poller.backend().press(Keycode::Escape);
        let snapshot = poller.snapshot();
        poller.backend().release(Keycode::Escape);

        assert!(snapshot.contains(Key::Escape));
        assert!(!poller.is_pressed(Key::Escape));
    }
}
