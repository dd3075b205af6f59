//! Application facade
//!
//! Owns the game state and the optional menu background, maps host key
//! state to per-frame simulation input and drives the phase transitions the
//! menus are responsible for. The host calls `update` then `render` once
//! per frame and otherwise never touches the simulation.

use std::path::Path;

use crate::platform::{Key, Platform};
use crate::render::{self, Background};
use crate::settings::Rules;
use crate::sim::{GameMode, GamePhase, GameState, PlayerInput, TickInput, tick};

pub struct App {
    state: GameState,
    background: Option<Background>,
    /// Previous frame's Escape level, for edge-detecting the pause toggle
    escape_was_held: bool,
}

impl App {
    pub fn new(rules: Rules, seed: u64) -> Self {
        Self {
            state: GameState::new(rules, seed),
            background: None,
            escape_was_held: false,
        }
    }

    /// One-time startup: load the optional menu background. Failure is
    /// downgraded to a warning and the menus render on plain black.
    pub fn initialize(&mut self, background_path: &Path) {
        match Background::load(background_path) {
            Ok(bg) => self.background = Some(bg),
            Err(err) => {
                log::warn!(
                    "no menu background ({}): {err}",
                    background_path.display()
                );
                self.background = None;
            }
        }
    }

    /// Teardown hook for the host; the session best is worth reporting
    pub fn shutdown(&self) {
        log::info!("session over, best score {}", self.state.high_score);
    }

    /// Advance one frame: read the host's key state, run the phase logic
    /// and, while a round is live, the simulation tick.
    pub fn update(&mut self, platform: &mut dyn Platform, dt: f32) {
        if !platform.is_active() {
            // Keep the edge detector honest across focus loss
            self.escape_was_held = platform.is_key_held(Key::Escape);
            return;
        }

        let escape_held = platform.is_key_held(Key::Escape);
        let escape_pressed = escape_held && !self.escape_was_held;
        self.escape_was_held = escape_held;

        match self.state.phase {
            GamePhase::MainMenu => {
                if platform.is_key_held(Key::S) {
                    self.state.start_game(GameMode::Single);
                } else if platform.is_key_held(Key::M) {
                    self.state.start_game(GameMode::Duo);
                } else if escape_pressed {
                    platform.request_exit();
                }
            }
            GamePhase::Playing | GamePhase::Paused => {
                if self.state.phase == GamePhase::Paused {
                    if platform.is_key_held(Key::Q) {
                        self.state.phase = GamePhase::MainMenu;
                        return;
                    }
                    if platform.is_key_held(Key::C) {
                        self.state.phase = GamePhase::Playing;
                    }
                }
                let input = TickInput {
                    players: self.read_player_input(platform),
                    pause: escape_pressed,
                };
                tick(&mut self.state, &input, dt);
            }
            GamePhase::GameOver | GamePhase::GameWin => {
                if platform.is_key_held(Key::F) {
                    self.state.start_game(self.state.mode);
                } else if platform.is_key_held(Key::Q) {
                    self.state.phase = GamePhase::MainMenu;
                }
            }
        }
    }

    /// In single-player both key sets steer the one ship; in duo the arrow
    /// keys belong to player one and the letter keys to player two.
    fn read_player_input(&self, platform: &dyn Platform) -> [PlayerInput; 2] {
        let arrows = PlayerInput {
            left: platform.is_key_held(Key::Left),
            right: platform.is_key_held(Key::Right),
            thrust: platform.is_key_held(Key::Up),
            fire: platform.is_key_held(Key::Space),
        };
        let letters = PlayerInput {
            left: platform.is_key_held(Key::A),
            right: platform.is_key_held(Key::D),
            thrust: platform.is_key_held(Key::W),
            fire: platform.is_key_held(Key::G),
        };
        match self.state.mode {
            GameMode::Single => {
                let merged = PlayerInput {
                    left: arrows.left || letters.left,
                    right: arrows.right || letters.right,
                    thrust: arrows.thrust || letters.thrust,
                    fire: arrows.fire || letters.fire,
                };
                [merged, PlayerInput::default()]
            }
            GameMode::Duo => [arrows, letters],
        }
    }

    /// Paint the current frame into the host's pixel buffer
    pub fn render(&self, buffer: &mut [u32]) {
        render::draw_frame(&self.state, self.background.as_ref(), buffer);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn scores(&self) -> Vec<u64> {
        self.state.players.iter().map(|p| p.score).collect()
    }

    pub fn lives(&self) -> Vec<u32> {
        self.state.players.iter().map(|p| p.lives).collect()
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn final_score(&self) -> u64 {
        self.state.final_score
    }
}
