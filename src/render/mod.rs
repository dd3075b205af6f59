//! Presentation adapter
//!
//! Translates simulation state into pixel writes on the host-supplied
//! buffer. Nothing in here feeds back into the simulation; the buffer is a
//! write-only sink filled once per frame on the single game thread.

pub mod background;
pub mod font;
pub mod shapes;

pub use background::{Background, BackgroundError};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{GameMode, GamePhase, GameState, SpeedClass};

use font::draw_string;
use shapes::{draw_ship, fill_circle};

/// Pixel buffer dimensions; match the simulation field one-to-one
pub const SCREEN_WIDTH: usize = FIELD_WIDTH as usize;
pub const SCREEN_HEIGHT: usize = FIELD_HEIGHT as usize;

/// Pack an opaque color as `alpha<<24 | red<<16 | green<<8 | blue`
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

const WHITE: u32 = rgb(255, 255, 255);
const BLACK: u32 = rgb(0, 0, 0);

/// Asteroid color is fixed by its speed class
fn asteroid_color(class: SpeedClass) -> u32 {
    match class {
        SpeedClass::Slow => rgb(0, 255, 0),
        SpeedClass::Medium => rgb(0, 0, 255),
        SpeedClass::Fast => rgb(255, 0, 0),
    }
}

/// Ship color by mode and player slot
fn player_color(mode: GameMode, index: usize) -> u32 {
    match (mode, index) {
        (GameMode::Single, _) => rgb(255, 0, 255),
        (GameMode::Duo, 0) => rgb(255, 255, 0),
        (GameMode::Duo, _) => rgb(0, 255, 255),
    }
}

/// Render one frame of the current state into the pixel buffer
pub fn draw_frame(state: &GameState, background: Option<&Background>, buffer: &mut [u32]) {
    debug_assert_eq!(buffer.len(), SCREEN_WIDTH * SCREEN_HEIGHT);

    let on_field = matches!(state.phase, GamePhase::Playing | GamePhase::Paused);
    if on_field {
        buffer.fill(BLACK);
        draw_field(state, buffer);
        if state.phase == GamePhase::Paused {
            draw_pause_overlay(buffer);
        } else {
            draw_hud(state, buffer);
        }
        return;
    }

    // Menu and end screens get the background image when one loaded
    match background {
        Some(bg) => bg.blit(buffer),
        None => buffer.fill(BLACK),
    }
    match state.phase {
        GamePhase::MainMenu => draw_main_menu(buffer),
        GamePhase::GameOver => draw_end_screen(state, buffer, "GAME OVER!"),
        GamePhase::GameWin => draw_end_screen(state, buffer, "UNBELIEVABLE!"),
        _ => unreachable!(),
    }
}

fn draw_field(state: &GameState, buffer: &mut [u32]) {
    for player in &state.players {
        for proj in &player.projectiles {
            fill_circle(buffer, proj.body.pos, proj.body.radius, WHITE);
        }
    }
    for asteroid in &state.asteroids {
        fill_circle(
            buffer,
            asteroid.body.pos,
            asteroid.body.radius,
            asteroid_color(asteroid.speed_class),
        );
    }
    for (idx, player) in state.players.iter().enumerate() {
        if player.is_alive() {
            draw_ship(
                buffer,
                player.pos,
                player.heading,
                player.radius,
                player_color(state.mode, idx),
            );
        }
    }
}

fn draw_hud(state: &GameState, buffer: &mut [u32]) {
    match state.mode {
        GameMode::Single => {
            let p = &state.players[0];
            draw_string(buffer, &format!("Score: {}", p.score), 10, 10, 4, WHITE);
            draw_string(
                buffer,
                &format!("Highscore: {}", state.high_score),
                400,
                10,
                4,
                WHITE,
            );
            draw_string(
                buffer,
                &format!("Lives: {}", p.lives),
                SCREEN_WIDTH as i32 - 200,
                10,
                4,
                WHITE,
            );
        }
        GameMode::Duo => {
            // Letter-key player on the left, arrow-key player on the right
            let (right, left) = (&state.players[0], &state.players[1]);
            draw_string(buffer, &format!("Score: {}", left.score), 10, 10, 4, WHITE);
            draw_string(buffer, &format!("Score: {}", right.score), 800, 10, 4, WHITE);
            draw_string(
                buffer,
                &format!("Highscore: {}", state.high_score),
                400,
                10,
                4,
                WHITE,
            );
            draw_string(buffer, &format!("Lives: {}", left.lives), 10, 60, 4, WHITE);
            draw_string(buffer, &format!("Lives: {}", right.lives), 800, 60, 4, WHITE);
        }
    }
}

fn draw_pause_overlay(buffer: &mut [u32]) {
    let mid = SCREEN_HEIGHT as i32 / 2;
    draw_string(buffer, "PAUSE", 200, mid - 50, 10, WHITE);
    draw_string(buffer, "Press Q to return to main menu!", 200, mid + 150, 4, WHITE);
    draw_string(buffer, "Press C to continue!", 200, mid + 200, 4, WHITE);
}

fn draw_main_menu(buffer: &mut [u32]) {
    let mid = SCREEN_HEIGHT as i32 / 2;
    draw_string(buffer, "COSMO BLAST", 175, 150, 10, WHITE);
    draw_string(buffer, "[S]ingleplayer or [M]ultiplayer", 200, mid - 100, 5, WHITE);
    draw_string(buffer, "Press UP or W to accelerate", 300, mid + 100, 3, WHITE);
    draw_string(buffer, "Press LEFT-RIGHT or A-D to rotate", 300, mid + 150, 3, WHITE);
    draw_string(buffer, "Press SPACE or G to shoot", 300, mid + 200, 3, WHITE);
}

fn draw_end_screen(state: &GameState, buffer: &mut [u32], title: &str) {
    let mid = SCREEN_HEIGHT as i32 / 2;
    draw_string(buffer, title, 200, mid - 50, 10, WHITE);
    draw_string(
        buffer,
        &format!("Your score: {}", state.final_score),
        200,
        mid + 50,
        4,
        WHITE,
    );
    draw_string(
        buffer,
        &format!("Your highscore: {}", state.high_score),
        200,
        mid + 100,
        4,
        WHITE,
    );
    draw_string(buffer, "Press F to replay!", 200, mid + 150, 4, WHITE);
    draw_string(buffer, "Or press Q to return to the menu", 200, mid + 200, 4, WHITE);
}
