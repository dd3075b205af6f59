//! Optional menu background image
//!
//! Loaded from a line-oriented text file of whitespace-separated integers,
//! one packed color per cell, filling the screen inside a fixed margin (the
//! format the original asset shipped in). A missing or short file is not an
//! error for the game: the caller degrades to a plain black background.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Rows and columns left untouched around the image data
const MARGIN_Y: usize = 9;
const MARGIN_X: usize = 12;

#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("failed to read background file: {0}")]
    Io(#[from] std::io::Error),
    #[error("background file contains a non-integer token: {0}")]
    Parse(String),
    #[error("background file is short: expected {expected} values, got {got}")]
    Short { expected: usize, got: usize },
}

/// A full-screen image ready to be copied into the frame buffer
#[derive(Debug, Clone)]
pub struct Background {
    pixels: Vec<u32>,
}

impl Background {
    /// Expected number of color values in a background file
    pub fn expected_values() -> usize {
        (SCREEN_HEIGHT - 2 * MARGIN_Y) * (SCREEN_WIDTH - 2 * MARGIN_X)
    }

    pub fn load(path: &Path) -> Result<Self, BackgroundError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, BackgroundError> {
        let mut pixels = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
        let mut tokens = text.split_whitespace();
        let mut filled = 0usize;

        for y in MARGIN_Y..SCREEN_HEIGHT - MARGIN_Y {
            for x in MARGIN_X..SCREEN_WIDTH - MARGIN_X {
                let token = tokens.next().ok_or(BackgroundError::Short {
                    expected: Self::expected_values(),
                    got: filled,
                })?;
                let value = token
                    .parse::<u32>()
                    .map_err(|_| BackgroundError::Parse(token.to_owned()))?;
                pixels[y * SCREEN_WIDTH + x] = value;
                filled += 1;
            }
        }
        Ok(Self { pixels })
    }

    /// Copy the image over the whole frame buffer
    pub fn blit(&self, buffer: &mut [u32]) {
        buffer.copy_from_slice(&self.pixels);
    }
}
