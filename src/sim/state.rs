//! Session state and core simulation types
//!
//! A `Session` is one timed round at a fixed difficulty. It owns every live
//! bubble, the score, the tick counter, and its own seeded RNG, so a session
//! replays identically from the same seed and inputs.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, Palette, create_bubble};
use super::difficulty::{Difficulty, DifficultyProfile};
use super::hit::hit_test;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bubbles move, clicks pop, the clock runs
    Playing,
    /// Everything frozen until resumed
    Paused,
    /// Time is up; waiting for retry
    GameOver,
}

/// Things that happened during a tick, for audio and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A bubble was popped; `score` is the new total
    BubblePopped { id: u32, score: u32 },
    /// A bubble was added to the field
    BubbleSpawned { id: u32 },
    Paused,
    Resumed,
    /// Time ran out
    GameOver { score: u32 },
}

/// One timed round of play
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed this session's RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    /// Colors available to spawned bubbles
    pub palette: Palette,
    /// Playfield size in pixels
    pub arena: IVec2,
    /// Live bubbles in spawn order (order decides overlapping hits)
    pub bubbles: Vec<Bubble>,
    pub score: u32,
    /// Ticks spent in `Playing`
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next bubble ID
    next_id: u32,
}

impl Session {
    /// Start a session with the difficulty's initial bubble count
    pub fn new(difficulty: Difficulty, palette: Palette, seed: u64) -> Self {
        let profile = *difficulty.profile();
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            profile,
            palette,
            arena: SCREEN_SIZE,
            bubbles: Vec::with_capacity(profile.bubble_count),
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
            next_id: 1,
        };

        for _ in 0..profile.bubble_count {
            session.spawn_bubble();
        }
        // Initial population is not interesting to listeners
        session.events.clear();

        log::info!(
            "Session started: {} ({} bubbles, x{} speed, {}s) seed {}",
            profile.name,
            profile.bubble_count,
            profile.speed_multiplier,
            profile.duration_secs,
            seed
        );

        session
    }

    /// Allocate a new bubble ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a freshly created bubble to the end of the list
    pub fn spawn_bubble(&mut self) -> u32 {
        let id = self.next_entity_id();
        let bubble = create_bubble(id, &mut self.rng, self.arena, &self.palette);
        self.bubbles.push(bubble);
        self.events.push(GameEvent::BubbleSpawned { id });
        id
    }

    /// Pop the first bubble under `point`
    ///
    /// Only effective while playing. Removes the bubble, adds one to the
    /// score, and records a `BubblePopped` event.
    pub fn pop_at(&mut self, point: IVec2) -> Option<Bubble> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let index = hit_test(&self.bubbles, point)?;
        let bubble = self.bubbles.remove(index);
        self.score += 1;
        self.events.push(GameEvent::BubblePopped {
            id: bubble.id,
            score: self.score,
        });
        log::debug!("Popped bubble {} (score {})", bubble.id, self.score);
        Some(bubble)
    }

    /// Flip between Playing and Paused (no effect after game over)
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whole seconds of play so far
    pub fn elapsed_secs(&self) -> u32 {
        (self.time_ticks / TICK_RATE as u64) as u32
    }

    /// Whole seconds left on the clock
    pub fn remaining_secs(&self) -> u32 {
        self.profile.duration_secs.saturating_sub(self.elapsed_secs())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
