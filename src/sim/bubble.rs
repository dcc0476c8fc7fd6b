//! Bubble entities, the color palette, and the bubble factory
//!
//! Bubbles move in whole pixels. Each tick a bubble advances by its velocity
//! times the difficulty speed multiplier, then reflects off any arena edge it
//! has crossed. Position is not clamped, so a bubble may sit up to one step
//! outside the arena before the reflected velocity carries it back.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for GPU upload
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }

    /// CSS hex string (`#rrggbb`)
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Fixed set of bubble colors, generated once per process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Generate `PALETTE_SIZE` uniformly random colors
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let colors = (0..PALETTE_SIZE)
            .map(|_| Rgb::new(rng.random(), rng.random(), rng.random()))
            .collect();
        Self { colors }
    }

    /// Build a palette from explicit colors (must not be empty)
    pub fn from_colors(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Pick a color uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        // Constructors guarantee at least one color
        self.colors
            .choose(rng)
            .copied()
            .unwrap_or(Rgb::new(255, 255, 255))
    }
}

/// A poppable bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    /// Bounding box (the bubble is the inscribed ellipse)
    pub rect: Rect,
    /// Pixels per tick before the speed multiplier
    pub vel: IVec2,
    pub color: Rgb,
}

impl Bubble {
    /// Advance one tick and reflect off arena edges
    ///
    /// Each axis is checked independently after the move; crossing an edge
    /// negates that axis' velocity but leaves the position where it landed.
    pub fn step(&mut self, speed_multiplier: i32, arena: IVec2) {
        self.rect.pos += self.vel * speed_multiplier;

        if self.rect.left() < 0 || self.rect.right() > arena.x {
            self.vel.x = -self.vel.x;
        }
        if self.rect.top() < 0 || self.rect.bottom() > arena.y {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Create a bubble at a random position inside the arena
///
/// Position is uniform over `[0, w - size] x [0, h - size]`, each velocity
/// component is uniform over `[-MAX_VELOCITY, MAX_VELOCITY]` (a stationary
/// bubble is possible), and the color is drawn from the palette.
pub fn create_bubble<R: Rng + ?Sized>(id: u32, rng: &mut R, arena: IVec2, palette: &Palette) -> Bubble {
    let x = rng.random_range(0..=(arena.x - BUBBLE_SIZE).max(0));
    let y = rng.random_range(0..=(arena.y - BUBBLE_SIZE).max(0));
    let vx = rng.random_range(-MAX_VELOCITY..=MAX_VELOCITY);
    let vy = rng.random_range(-MAX_VELOCITY..=MAX_VELOCITY);

    Bubble {
        id,
        rect: Rect::new(x, y, BUBBLE_SIZE, BUBBLE_SIZE),
        vel: IVec2::new(vx, vy),
        color: palette.choose(rng),
    }
}
