//! Difficulty presets

use serde::{Deserialize, Serialize};

/// Selectable difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

/// Tuning bundle for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyProfile {
    pub name: &'static str,
    /// Bubbles spawned at session start
    pub bubble_count: usize,
    /// Velocity multiplier applied every tick
    pub speed_multiplier: i32,
    /// Session length in seconds
    pub duration_secs: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    name: "easy",
    bubble_count: 10,
    speed_multiplier: 2,
    duration_secs: 30,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    name: "medium",
    bubble_count: 20,
    speed_multiplier: 4,
    duration_secs: 45,
};

const HARD: DifficultyProfile = DifficultyProfile {
    name: "hard",
    bubble_count: 30,
    speed_multiplier: 6,
    duration_secs: 60,
};

const EXTREME: DifficultyProfile = DifficultyProfile {
    name: "extreme",
    bubble_count: 40,
    speed_multiplier: 8,
    duration_secs: 90,
};

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
            Difficulty::Extreme => &EXTREME,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.profile().name
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "medium" | "med" | "m" => Some(Difficulty::Medium),
            "hard" | "h" => Some(Difficulty::Hard),
            "extreme" | "x" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Title screen hint, e.g. "Press 'E' for Easy"
    pub fn prompt(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Press 'E' for Easy",
            Difficulty::Medium => "Press 'M' for Medium",
            Difficulty::Hard => "Press 'H' for Hard",
            Difficulty::Extreme => "Press 'X' for Extreme",
        }
    }
}
