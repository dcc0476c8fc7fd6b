//! Bubble Pop - A timed bubble-popping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubbles, bounce physics, hit testing, session rules)
//! - `app`: Title/session/retry state machine driving the simulation
//! - `ui`: Presentation data (HUD text, buttons, scene) for any display layer
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences
//! - `audio`: Sound effect mapping and WebAudio playback
//! - `clock`: Fixed-timestep accumulator

pub mod app;
pub mod audio;
pub mod clock;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use app::{Flow, Game, InputEvent, Key, Phase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Fixed simulation rate (updates per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions in pixels
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;
    pub const SCREEN_SIZE: IVec2 = IVec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    /// Bubbles are fixed-size squares (drawn as the inscribed ellipse)
    pub const BUBBLE_SIZE: i32 = 50;
    /// Velocity components are drawn from [-MAX_VELOCITY, MAX_VELOCITY]
    pub const MAX_VELOCITY: i32 = 5;
    /// Number of colors generated once per process
    pub const PALETTE_SIZE: usize = 10;

    /// Light blue
    pub const BACKGROUND_COLOR: [u8; 3] = [136, 187, 255];
    pub const TEXT_COLOR: [u8; 3] = [0, 0, 0];
}
