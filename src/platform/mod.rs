//! Host platform abstraction
//!
//! The core never talks to a window system directly. The host supplies key
//! state, a window-active gate and an exit request through this trait; the
//! pixel buffer it hands to `App::render` is the only other contact surface.

/// Abstract key identifiers the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    Escape,
    A,
    C,
    D,
    F,
    G,
    M,
    Q,
    S,
    W,
}

/// What the host environment provides every frame
pub trait Platform {
    /// Is this key currently held?
    fn is_key_held(&self, key: Key) -> bool;

    /// Input is ignored while the window/session is inactive
    fn is_active(&self) -> bool;

    /// Ask the host to shut the process down
    fn request_exit(&mut self);
}

/// In-memory platform for tests and the headless demo driver
#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    pub held: Vec<Key>,
    pub active: bool,
    pub exit_requested: bool,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            held: Vec::new(),
            active: true,
            exit_requested: false,
        }
    }

    pub fn press(&mut self, key: Key) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl Platform for ScriptedPlatform {
    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
