//! Fixed timestep simulation tick
//!
//! Advances one session by one 60 Hz frame.

use glam::IVec2;

use super::state::{GameEvent, GamePhase, Session};

/// A player action aimed at the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer press that may pop a bubble
    Press(IVec2),
    /// Pause/resume toggle
    TogglePause,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// Advance the session by one fixed timestep
///
/// Commands apply one by one in arrival order, so a press only pops while the
/// session is Playing at that point. Then bubble movement, clock, time-up
/// check, and refilling an emptied field.
pub fn tick(session: &mut Session, input: &TickInput) {
    for command in &input.commands {
        match *command {
            Command::TogglePause => session.toggle_pause(),
            Command::Press(point) => {
                session.pop_at(point);
            }
        }
    }

    // Paused and finished sessions stay frozen
    if session.phase != GamePhase::Playing {
        return;
    }

    let speed = session.profile.speed_multiplier;
    let arena = session.arena;
    for bubble in &mut session.bubbles {
        bubble.step(speed, arena);
    }

    session.time_ticks += 1;

    if session.elapsed_secs() >= session.profile.duration_secs {
        session.phase = GamePhase::GameOver;
        session.events.push(GameEvent::GameOver {
            score: session.score,
        });
        log::info!(
            "Time up on {}: final score {}",
            session.profile.name,
            session.score
        );
        return;
    }

    // Never leave the field empty during play
    if session.bubbles.is_empty() {
        session.spawn_bubble();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::bubble::Palette;
    use crate::sim::difficulty::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn session(difficulty: Difficulty, seed: u64) -> Session {
        let mut rng = Pcg32::seed_from_u64(seed);
        Session::new(difficulty, Palette::generate(&mut rng), seed)
    }

    fn positions(s: &Session) -> Vec<IVec2> {
        s.bubbles.iter().map(|b| b.rect.pos).collect()
    }

    #[test]
    fn test_tick_moves_bubbles_and_clock() {
        let mut s = session(Difficulty::Easy, 12345);
        let before = s.bubbles.clone();
        tick(&mut s, &TickInput::default());
        assert_eq!(s.time_ticks, 1);
        for (old, new) in before.iter().zip(&s.bubbles) {
            assert_eq!(new.rect.pos, old.rect.pos + old.vel * 2);
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut s = session(Difficulty::Medium, 12345);
        let pause = TickInput {
            commands: vec![Command::TogglePause],
        };

        tick(&mut s, &pause);
        assert_eq!(s.phase, GamePhase::Paused);
        let frozen = positions(&s);
        let ticks = s.time_ticks;

        // Two steps while paused change nothing
        tick(&mut s, &TickInput::default());
        tick(&mut s, &TickInput::default());
        assert_eq!(positions(&s), frozen);
        assert_eq!(s.time_ticks, ticks);

        // Unpause
        tick(&mut s, &pause);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.time_ticks, ticks + 1);
    }

    #[test]
    fn test_clicks_ignored_while_paused() {
        let mut s = session(Difficulty::Easy, 1);
        s.toggle_pause();
        let input = TickInput {
            commands: vec![Command::Press(s.bubbles[0].rect.center())],
        };
        tick(&mut s, &input);
        assert_eq!(s.bubbles.len(), 10);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_press_before_resume_is_ignored() {
        let mut s = session(Difficulty::Easy, 1);
        s.toggle_pause();
        let target = s.bubbles[0].rect.center();
        let input = TickInput {
            commands: vec![Command::Press(target), Command::TogglePause],
        };
        tick(&mut s, &input);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.bubbles.len(), 10);
    }

    #[test]
    fn test_press_before_pause_still_pops() {
        let mut s = session(Difficulty::Easy, 1);
        let target = s.bubbles[0].rect.center();
        let input = TickInput {
            commands: vec![Command::Press(target), Command::TogglePause],
        };
        tick(&mut s, &input);
        assert_eq!(s.phase, GamePhase::Paused);
        assert_eq!(s.score, 1);
        assert_eq!(s.bubbles.len(), 9);
    }

    #[test]
    fn test_click_pops_first_bubble() {
        let mut s = session(Difficulty::Easy, 2);
        s.bubbles[0].rect.pos = IVec2::new(300, 200);
        let target = s.bubbles[0].id;
        let input = TickInput {
            commands: vec![Command::Press(IVec2::new(310, 240))],
        };

        tick(&mut s, &input);

        assert_eq!(s.score, 1);
        assert_eq!(s.bubbles.len(), 9);
        assert!(s.bubbles.iter().all(|b| b.id != target));
        let pops = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BubblePopped { .. }))
            .count();
        assert_eq!(pops, 1);
    }

    #[test]
    fn test_empty_field_respawns_one() {
        let mut s = session(Difficulty::Easy, 3);
        while let Some(point) = s.bubbles.first().map(|b| b.rect.center()) {
            s.pop_at(point);
        }
        assert!(s.bubbles.is_empty());
        assert_eq!(s.score, 10);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.bubbles.len(), 1);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.bubbles.len(), 1);
    }

    #[test]
    fn test_no_respawn_while_paused() {
        let mut s = session(Difficulty::Easy, 3);
        s.bubbles.clear();
        s.toggle_pause();
        tick(&mut s, &TickInput::default());
        assert!(s.bubbles.is_empty());
    }

    #[test]
    fn test_easy_times_out_after_thirty_seconds() {
        let mut s = session(Difficulty::Easy, 4);
        let input = TickInput::default();
        for _ in 0..(30 * TICK_RATE - 1) {
            tick(&mut s, &input);
        }
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.remaining_secs(), 1);

        tick(&mut s, &input);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.score, 0);
        assert_eq!(s.remaining_secs(), 0);
        assert!(s.events.contains(&GameEvent::GameOver { score: 0 }));

        // Finished sessions are frozen
        let frozen = positions(&s);
        tick(&mut s, &input);
        assert_eq!(positions(&s), frozen);
        assert_eq!(s.time_ticks, 30 * TICK_RATE as u64);
    }

    #[test]
    fn test_paused_time_not_counted() {
        let mut s = session(Difficulty::Easy, 4);
        s.toggle_pause();
        for _ in 0..(60 * TICK_RATE) {
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.phase, GamePhase::Paused);
        assert_eq!(s.remaining_secs(), 30);
    }

    #[test]
    fn test_determinism() {
        let mut s1 = session(Difficulty::Hard, 99999);
        let mut s2 = session(Difficulty::Hard, 99999);
        let first = s1.bubbles[0].rect.center();
        let inputs = [
            TickInput {
                commands: vec![Command::Press(IVec2::new(400, 300))],
            },
            TickInput::default(),
            TickInput {
                commands: vec![Command::Press(first), Command::TogglePause],
            },
            TickInput {
                commands: vec![Command::TogglePause],
            },
        ];
        for input in &inputs {
            tick(&mut s1, input);
            tick(&mut s2, input);
        }
        assert_eq!(s1.bubbles, s2.bubbles);
        assert_eq!(s1.score, s2.score);
    }

    proptest! {
        #[test]
        fn prop_score_tracks_pops(
            seed in any::<u64>(),
            clicks in proptest::collection::vec((0..SCREEN_WIDTH, 0..SCREEN_HEIGHT, any::<bool>()), 1..200),
        ) {
            let mut s = session(Difficulty::Medium, seed);
            let mut last_score = 0;
            let mut pops = 0;
            for (x, y, pause) in clicks {
                let before = s.bubbles.len();
                let mut input = TickInput::default();
                input.push(Command::Press(IVec2::new(x, y)));
                if pause {
                    input.push(Command::TogglePause);
                }
                tick(&mut s, &input);
                let popped = s
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::BubblePopped { .. }))
                    .count();
                prop_assert!(popped <= 1);
                prop_assert!(s.score >= last_score);
                prop_assert_eq!(s.score - last_score, popped as u32);
                if popped == 1 && before > 1 {
                    prop_assert_eq!(s.bubbles.len(), before - 1);
                }
                pops += popped as u32;
                last_score = s.score;
            }
            prop_assert_eq!(s.score, pops);
        }

        #[test]
        fn prop_bubbles_overshoot_at_most_one_step(seed in any::<u64>(), ticks in 1usize..600) {
            let mut s = session(Difficulty::Extreme, seed);
            let reach = MAX_VELOCITY * s.profile.speed_multiplier;
            for _ in 0..ticks {
                tick(&mut s, &TickInput::default());
                for b in &s.bubbles {
                    prop_assert!(b.rect.left() >= -reach);
                    prop_assert!(b.rect.right() <= SCREEN_WIDTH + reach);
                    prop_assert!(b.rect.top() >= -reach);
                    prop_assert!(b.rect.bottom() <= SCREEN_HEIGHT + reach);
                }
            }
        }
    }
}
