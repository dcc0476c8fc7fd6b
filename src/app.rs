//! Top-level game flow
//!
//! TitleSelect -> Playing <-> Paused -> GameOver -> Retry -> TitleSelect,
//! with Quit reachable from anywhere. Quitting is reported to the caller as
//! `Flow::Quit` instead of ending the process, so the whole flow runs headless.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::{Command, Difficulty, GameEvent, GamePhase, Palette, Session, TickInput, tick};
use crate::ui::{pause_button, retry_button};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Easy
    E,
    /// Medium
    M,
    /// Hard
    H,
    /// Extreme
    X,
    /// Pause toggle
    P,
    /// Retry after game over
    R,
    /// Quit
    Q,
    Other,
}

impl Key {
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'e' => Key::E,
            'm' => Key::M,
            'h' => Key::H,
            'x' => Key::X,
            'p' => Key::P,
            'r' => Key::R,
            'q' => Key::Q,
            _ => Key::Other,
        }
    }

    /// Difficulty chosen by this key on the title screen
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Key::E => Some(Difficulty::Easy),
            Key::M => Some(Difficulty::Medium),
            Key::H => Some(Difficulty::Hard),
            Key::X => Some(Difficulty::Extreme),
            _ => None,
        }
    }
}

/// Raw input delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// Left button / touch down at a screen-space point
    PointerDown(IVec2),
    /// Window or tab closing
    CloseRequested,
}

/// Observable phase of the whole game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    TitleSelect,
    Playing,
    Paused,
    GameOver,
    /// Session discarded; the next update shows the title screen
    Retry,
    Quit,
}

/// Whether the frame loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Screen {
    TitleSelect,
    InSession(Session),
    Retry,
    Quit,
}

/// Game instance holding all state
pub struct Game {
    /// Process RNG seed
    pub seed: u64,
    rng: Pcg32,
    /// Bubble colors shared by every session in this process
    palette: Palette,
    screen: Screen,
    /// Session events not yet consumed by the frontend
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let palette = Palette::generate(&mut rng);
        Self {
            seed,
            rng,
            palette,
            screen: Screen::TitleSelect,
            events: Vec::new(),
        }
    }

    /// Create a game honoring the player's settings
    ///
    /// A seed pinned in settings wins over `fallback_seed`.
    pub fn from_settings(settings: &Settings, fallback_seed: u64) -> Self {
        Self::new(settings.seed.unwrap_or(fallback_seed))
    }

    pub fn phase(&self) -> Phase {
        match &self.screen {
            Screen::TitleSelect => Phase::TitleSelect,
            Screen::InSession(session) => match session.phase {
                GamePhase::Playing => Phase::Playing,
                GamePhase::Paused => Phase::Paused,
                GamePhase::GameOver => Phase::GameOver,
            },
            Screen::Retry => Phase::Retry,
            Screen::Quit => Phase::Quit,
        }
    }

    /// The live session, if one exists
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::InSession(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.screen {
            Screen::InSession(session) => Some(session),
            _ => None,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace any current session with a fresh one
    pub fn start_session(&mut self, difficulty: Difficulty) {
        let seed = self.rng.random();
        self.screen = Screen::InSession(Session::new(difficulty, self.palette.clone(), seed));
    }

    /// Pause a running session (used for focus loss); no-op otherwise
    pub fn pause_if_playing(&mut self) -> bool {
        match &mut self.screen {
            Screen::InSession(session) if session.phase == GamePhase::Playing => {
                session.toggle_pause();
                self.events.extend(session.drain_events());
                true
            }
            _ => false,
        }
    }

    /// Apply one frame of input and advance one fixed tick
    pub fn update(&mut self, inputs: &[InputEvent]) -> Flow {
        match self.screen {
            Screen::Quit => return Flow::Quit,
            Screen::Retry => {
                self.screen = Screen::TitleSelect;
                log::info!("Back to title screen");
            }
            _ => {}
        }

        let mut tick_input = TickInput::default();
        let mut retry = false;

        for event in inputs {
            // None on the title screen, Some(is_over) during a session
            let session_over = self.session().map(Session::is_over);
            match (*event, session_over) {
                (InputEvent::CloseRequested | InputEvent::Key(Key::Q), _) => {
                    log::info!("Quit requested");
                    self.screen = Screen::Quit;
                    return Flow::Quit;
                }
                (InputEvent::Key(key), None) => {
                    if let Some(difficulty) = key.difficulty() {
                        self.start_session(difficulty);
                    }
                }
                (InputEvent::Key(Key::P), Some(false)) => tick_input.push(Command::TogglePause),
                (InputEvent::Key(Key::R), Some(true)) => retry = true,
                (InputEvent::PointerDown(point), Some(true)) => {
                    retry |= retry_button().contains(point);
                }
                (InputEvent::PointerDown(point), Some(false)) => {
                    let paused = self.session().is_some_and(Session::is_paused);
                    // The button swallows the press; bubbles under it stay put
                    if pause_button(paused).contains(point) {
                        tick_input.push(Command::TogglePause);
                    } else {
                        tick_input.push(Command::Press(point));
                    }
                }
                _ => {}
            }
        }

        if retry {
            if let Screen::InSession(session) = &self.screen {
                log::info!(
                    "Retry after {} with score {}",
                    session.profile.name,
                    session.score
                );
            }
            self.screen = Screen::Retry;
            return Flow::Continue;
        }

        if let Screen::InSession(session) = &mut self.screen {
            tick(session, &tick_input);
            self.events.extend(session.drain_events());
        }

        Flow::Continue
    }

    /// Take all session events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::ui::{PAUSE_BUTTON_RECT, RETRY_BUTTON_RECT};

    fn pops(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::BubblePopped { .. }))
            .count()
    }

    #[test]
    fn test_starts_at_title() {
        let game = Game::new(1);
        assert_eq!(game.phase(), Phase::TitleSelect);
        assert!(game.session().is_none());
        assert_eq!(game.palette().colors().len(), PALETTE_SIZE);
    }

    #[test]
    fn test_difficulty_keys_start_configured_session() {
        for (key, difficulty) in [
            (Key::E, Difficulty::Easy),
            (Key::M, Difficulty::Medium),
            (Key::H, Difficulty::Hard),
            (Key::X, Difficulty::Extreme),
        ] {
            let mut game = Game::new(10);
            assert_eq!(game.update(&[InputEvent::Key(key)]), Flow::Continue);
            assert_eq!(game.phase(), Phase::Playing);
            let session = game.session().expect("session started");
            let profile = difficulty.profile();
            assert_eq!(session.difficulty, difficulty);
            assert_eq!(session.bubbles.len(), profile.bubble_count);
            assert_eq!(session.profile.speed_multiplier, profile.speed_multiplier);
            assert_eq!(session.profile.duration_secs, profile.duration_secs);
            assert_eq!(session.score, 0);
        }
    }

    #[test]
    fn test_title_ignores_other_input() {
        let mut game = Game::new(1);
        game.update(&[
            InputEvent::Key(Key::Other),
            InputEvent::Key(Key::P),
            InputEvent::Key(Key::R),
            InputEvent::PointerDown(IVec2::new(400, 300)),
        ]);
        assert_eq!(game.phase(), Phase::TitleSelect);
    }

    #[test]
    fn test_easy_session_times_out_without_clicks() {
        let mut game = Game::new(2);
        game.update(&[InputEvent::Key(Key::E)]);
        for _ in 1..(30 * TICK_RATE - 1) {
            game.update(&[]);
        }
        assert_eq!(game.phase(), Phase::Playing);
        game.update(&[]);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.session().map(|s| s.score), Some(0));
    }

    #[test]
    fn test_click_pops_bubble_once() {
        let mut game = Game::new(3);
        game.update(&[InputEvent::Key(Key::E)]);
        game.drain_events();
        let session = game.session_mut().expect("session");
        session.bubbles[0].rect.pos = IVec2::new(300, 200);
        let target = session.bubbles[0].id;

        game.update(&[InputEvent::PointerDown(IVec2::new(320, 220))]);

        let session = game.session().expect("session");
        assert_eq!(session.score, 1);
        assert_eq!(session.bubbles.len(), 9);
        assert!(session.bubbles.iter().all(|b| b.id != target));
        assert_eq!(pops(&game.drain_events()), 1);
    }

    #[test]
    fn test_pause_key_and_button() {
        let mut game = Game::new(4);
        game.update(&[InputEvent::Key(Key::M)]);
        game.update(&[InputEvent::Key(Key::P)]);
        assert_eq!(game.phase(), Phase::Paused);

        let frozen = game.session().map(|s| s.bubbles.clone());
        game.update(&[]);
        game.update(&[]);
        assert_eq!(game.session().map(|s| s.bubbles.clone()), frozen);

        // Clicking the resume button unpauses without popping anything
        game.update(&[InputEvent::PointerDown(PAUSE_BUTTON_RECT.center())]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().map(|s| s.score), Some(0));
    }

    /// Playing easy session with bubble 0 parked at a known spot
    fn parked_game(at: IVec2) -> (Game, IVec2) {
        let mut game = Game::new(11);
        game.update(&[InputEvent::Key(Key::E)]);
        if let Some(session) = game.session_mut() {
            session.bubbles[0].rect.pos = at;
            session.bubbles[0].vel = IVec2::ZERO;
        }
        game.drain_events();
        (game, at + IVec2::splat(BUBBLE_SIZE / 2))
    }

    #[test]
    fn test_click_then_pause_in_one_batch_pops() {
        let (mut game, target) = parked_game(IVec2::new(300, 200));
        game.update(&[InputEvent::PointerDown(target), InputEvent::Key(Key::P)]);
        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.session().map(|s| s.score), Some(1));
    }

    #[test]
    fn test_pause_then_click_in_one_batch_ignores_click() {
        let (mut game, target) = parked_game(IVec2::new(300, 200));
        game.update(&[InputEvent::Key(Key::P), InputEvent::PointerDown(target)]);
        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.session().map(|s| s.score), Some(0));
    }

    #[test]
    fn test_click_while_paused_then_resume_ignores_click() {
        let (mut game, target) = parked_game(IVec2::new(300, 200));
        game.update(&[InputEvent::Key(Key::P)]);
        game.update(&[InputEvent::PointerDown(target), InputEvent::Key(Key::P)]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().map(|s| s.score), Some(0));
        assert_eq!(game.session().map(|s| s.bubbles.len()), Some(10));
    }

    #[test]
    fn test_resume_then_click_in_one_batch_pops() {
        let (mut game, target) = parked_game(IVec2::new(300, 200));
        game.update(&[InputEvent::Key(Key::P)]);
        game.update(&[InputEvent::Key(Key::P), InputEvent::PointerDown(target)]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().map(|s| s.score), Some(1));
    }

    #[test]
    fn test_pause_button_does_not_pop_bubble_beneath() {
        // Bubble 0 sits over the pause button
        let (mut game, _) = parked_game(PAUSE_BUTTON_RECT.pos);
        let press = PAUSE_BUTTON_RECT.pos + IVec2::new(5, 5);
        assert!(game.session().is_some_and(|s| s.bubbles[0].rect.contains_point(press)));

        game.update(&[InputEvent::PointerDown(press)]);
        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.session().map(|s| s.score), Some(0));
        assert_eq!(game.session().map(|s| s.bubbles.len()), Some(10));
    }

    #[test]
    fn test_pause_if_playing() {
        let mut game = Game::new(4);
        assert!(!game.pause_if_playing());
        game.update(&[InputEvent::Key(Key::H)]);
        assert!(game.pause_if_playing());
        assert_eq!(game.phase(), Phase::Paused);
        assert!(!game.pause_if_playing());
        assert!(game.drain_events().contains(&GameEvent::Paused));
    }

    fn finished_game() -> Game {
        let mut game = Game::new(5);
        game.update(&[InputEvent::Key(Key::E)]);
        if let Some(session) = game.session_mut() {
            session.time_ticks = 30 * TICK_RATE as u64 - 1;
        }
        game.update(&[]);
        assert_eq!(game.phase(), Phase::GameOver);
        game
    }

    #[test]
    fn test_retry_key_returns_to_title() {
        let mut game = finished_game();
        game.update(&[InputEvent::Key(Key::R)]);
        assert_eq!(game.phase(), Phase::Retry);
        assert!(game.session().is_none());

        game.update(&[]);
        assert_eq!(game.phase(), Phase::TitleSelect);

        game.update(&[InputEvent::Key(Key::X)]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().map(|s| s.difficulty), Some(Difficulty::Extreme));
    }

    #[test]
    fn test_retry_button_click() {
        let mut game = finished_game();
        game.update(&[InputEvent::PointerDown(IVec2::new(10, 10))]);
        assert_eq!(game.phase(), Phase::GameOver);
        game.update(&[InputEvent::PointerDown(RETRY_BUTTON_RECT.center())]);
        assert_eq!(game.phase(), Phase::Retry);
    }

    #[test]
    fn test_retry_key_ignored_while_playing() {
        let mut game = Game::new(6);
        game.update(&[InputEvent::Key(Key::E)]);
        game.update(&[InputEvent::Key(Key::R)]);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_quit_from_every_phase() {
        let mut title = Game::new(7);
        assert_eq!(title.update(&[InputEvent::Key(Key::Q)]), Flow::Quit);
        assert_eq!(title.phase(), Phase::Quit);
        // Terminal
        assert_eq!(title.update(&[InputEvent::Key(Key::E)]), Flow::Quit);

        let mut playing = Game::new(7);
        playing.update(&[InputEvent::Key(Key::H)]);
        assert_eq!(playing.update(&[InputEvent::CloseRequested]), Flow::Quit);

        let mut over = finished_game();
        assert_eq!(over.update(&[InputEvent::Key(Key::Q)]), Flow::Quit);
    }

    #[test]
    fn test_sessions_share_palette_but_not_seed() {
        let mut game = Game::new(8);
        game.update(&[InputEvent::Key(Key::E)]);
        let first = game.session().map(|s| s.seed);
        game.start_session(Difficulty::Easy);
        let second = game.session().map(|s| s.seed);
        assert_ne!(first, second);
        assert_eq!(game.session().map(|s| &s.palette), Some(game.palette()));
    }

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char('E'), Key::E);
        assert_eq!(Key::from_char('x'), Key::X);
        assert_eq!(Key::from_char('z'), Key::Other);
        assert_eq!(Key::from_char('i'), Key::Other);
        assert_eq!(Key::Q.difficulty(), None);
    }
}
