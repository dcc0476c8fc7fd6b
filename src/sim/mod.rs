//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod bubble;
pub mod difficulty;
pub mod hit;
pub mod rect;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, Palette, Rgb, create_bubble};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use hit::hit_test;
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, Session};
pub use tick::{Command, TickInput, tick};
