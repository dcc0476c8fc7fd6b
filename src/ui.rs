//! Presentation data for the display layer
//!
//! Nothing here draws. `Scene::build` turns the game state into plain data
//! (sprites, buttons, text) that the renderer and the HTML text overlay
//! consume, and the button rectangles double as click regions for input
//! dispatch.

use glam::IVec2;

use crate::app::{Game, Phase};
use crate::consts::*;
use crate::sim::{Difficulty, Rect, Rgb, Session};

/// Pause/resume button region (bottom-left)
pub const PAUSE_BUTTON_RECT: Rect = Rect::new(10, SCREEN_HEIGHT - 40, 100, 30);
/// Retry button region (center, below the final score)
pub const RETRY_BUTTON_RECT: Rect = Rect::new(SCREEN_WIDTH / 2 - 50, SCREEN_HEIGHT / 2 + 20, 100, 30);

const HUD_FONT_PX: u32 = 36;
const TITLE_FONT_PX: u32 = 45;
const PROMPT_FONT_PX: u32 = 20;

/// Map a point on a stretched canvas (CSS pixels) to playfield pixels
pub fn canvas_to_playfield(x: f32, y: f32, client_w: f32, client_h: f32) -> IVec2 {
    if client_w <= 0.0 || client_h <= 0.0 {
        return IVec2::new(x as i32, y as i32);
    }
    IVec2::new(
        (x * SCREEN_WIDTH as f32 / client_w).floor() as i32,
        (y * SCREEN_HEIGHT as f32 / client_h).floor() as i32,
    )
}

/// A clickable labelled rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub rect: Rect,
    pub fill: Rgb,
    pub text_color: Rgb,
}

impl Button {
    pub fn contains(&self, point: IVec2) -> bool {
        self.rect.contains_point(point)
    }
}

/// Red "Pause" while playing, green "Resume" while paused
pub fn pause_button(paused: bool) -> Button {
    let (label, fill) = if paused {
        ("Resume", Rgb::new(0, 255, 0))
    } else {
        ("Pause", Rgb::new(255, 0, 0))
    };
    Button {
        label,
        rect: PAUSE_BUTTON_RECT,
        fill,
        text_color: Rgb::from(TEXT_COLOR),
    }
}

pub fn retry_button() -> Button {
    Button {
        label: "Retry",
        rect: RETRY_BUTTON_RECT,
        fill: Rgb::new(0, 0, 255),
        text_color: Rgb::new(255, 255, 255),
    }
}

/// Score and countdown readouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub remaining_secs: u32,
}

impl Hud {
    pub fn from_session(session: &Session) -> Self {
        Self {
            score: session.score,
            remaining_secs: session.remaining_secs(),
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn time_text(&self) -> String {
        format!("Time: {}", self.remaining_secs)
    }
}

/// A bubble to draw as the ellipse inscribed in `rect`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub rect: Rect,
    pub color: Rgb,
}

/// Where a line of text sits on the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Top-left corner of the text
    TopLeft(IVec2),
    /// Centered in a box (button labels)
    Centered(Rect),
}

/// A line of text for the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
    pub anchor: Anchor,
    pub size_px: u32,
    pub color: Rgb,
}

impl TextItem {
    fn new(text: impl Into<String>, x: i32, y: i32, size_px: u32) -> Self {
        Self {
            text: text.into(),
            anchor: Anchor::TopLeft(IVec2::new(x, y)),
            size_px,
            color: Rgb::from(TEXT_COLOR),
        }
    }

    fn label(button: &Button) -> Self {
        Self {
            text: button.label.to_string(),
            anchor: Anchor::Centered(button.rect),
            size_px: PROMPT_FONT_PX,
            color: button.text_color,
        }
    }
}

/// Everything visible in one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub background: Rgb,
    pub sprites: Vec<Sprite>,
    pub buttons: Vec<Button>,
    pub texts: Vec<TextItem>,
}

impl Scene {
    pub fn build(game: &Game) -> Self {
        let mut scene = Scene {
            background: Rgb::from(BACKGROUND_COLOR),
            sprites: Vec::new(),
            buttons: Vec::new(),
            texts: Vec::new(),
        };

        match (game.phase(), game.session()) {
            (Phase::TitleSelect, _) => {
                scene.texts.push(TextItem::new(
                    "Bubble Wrap Popping Game",
                    SCREEN_WIDTH / 2 - 280,
                    100,
                    TITLE_FONT_PX,
                ));
                for (i, d) in Difficulty::ALL.iter().enumerate() {
                    scene.texts.push(TextItem::new(
                        d.prompt(),
                        SCREEN_WIDTH / 2 - 100,
                        250 + 50 * i as i32,
                        PROMPT_FONT_PX,
                    ));
                }
            }
            (Phase::Playing | Phase::Paused | Phase::GameOver, Some(session)) => {
                scene.sprites = session
                    .bubbles
                    .iter()
                    .map(|b| Sprite {
                        rect: b.rect,
                        color: b.color,
                    })
                    .collect();

                let hud = Hud::from_session(session);
                scene.texts.push(TextItem::new(hud.score_text(), 10, 10, HUD_FONT_PX));
                scene
                    .texts
                    .push(TextItem::new(hud.time_text(), SCREEN_WIDTH - 150, 10, HUD_FONT_PX));

                if session.is_over() {
                    scene.texts.push(TextItem::new(
                        format!("Game Over! Score: {}", session.score),
                        SCREEN_WIDTH / 2 - 200,
                        SCREEN_HEIGHT / 2 - 50,
                        HUD_FONT_PX,
                    ));
                    scene.buttons.push(retry_button());
                } else {
                    scene.buttons.push(pause_button(session.is_paused()));
                }
            }
            // Retry lasts until the next update and Quit never draws
            _ => {}
        }

        let labels: Vec<TextItem> = scene.buttons.iter().map(TextItem::label).collect();
        scene.texts.extend(labels);
        scene
    }
}
