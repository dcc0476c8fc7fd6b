//! Bubble Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use bubble_pop::audio::AudioManager;
    use bubble_pop::clock::FixedTimestep;
    use bubble_pop::consts::*;
    use bubble_pop::renderer::RenderState;
    use bubble_pop::ui::{Anchor, Scene, TextItem, canvas_to_playfield};
    use bubble_pop::{Flow, Game, InputEvent, Key, Settings};

    /// Browser-side wrapper holding the game and its platform resources
    struct App {
        game: Game,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        clock: FixedTimestep,
        last_time: f64,
        /// Input gathered since the last tick
        pending: Vec<InputEvent>,
        /// Text currently shown in the overlay
        overlay_texts: Vec<TextItem>,
        quit: bool,
    }

    impl App {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                game: Game::from_settings(&settings, seed),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                clock: FixedTimestep::new(),
                last_time: 0.0,
                pending: Vec::new(),
                overlay_texts: Vec::new(),
                quit: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                // Input is applied on the first tick of the frame only
                let inputs = std::mem::take(&mut self.pending);
                if self.game.update(&inputs) == Flow::Quit {
                    self.quit = true;
                    break;
                }
            }

            for event in self.game.drain_events() {
                self.audio.play_event(&event);
            }
        }

        /// Draw shapes on the canvas and text in the overlay
        fn render(&mut self) {
            let scene = Scene::build(&self.game);
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size();
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            self.update_overlay(&scene);
        }

        /// Mirror the scene's text into the HTML overlay
        ///
        /// The overlay is rebuilt only when the text changes.
        fn update_overlay(&mut self, scene: &Scene) {
            if self.overlay_texts == scene.texts {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(layer) = document.get_element_by_id("text-layer") else {
                return;
            };
            layer.set_inner_html("");
            for item in &scene.texts {
                let Ok(el) = document.create_element("div") else { continue };
                el.set_text_content(Some(&item.text));
                let _ = el.set_attribute("style", &overlay_style(item));
                let _ = layer.append_child(&el);
            }
            self.overlay_texts = scene.texts.clone();
        }
    }

    fn overlay_style(item: &TextItem) -> String {
        let place = match item.anchor {
            Anchor::TopLeft(pos) => format!("left:{}px;top:{}px;", pos.x, pos.y),
            Anchor::Centered(rect) => format!(
                "left:{}px;top:{}px;width:{}px;height:{}px;line-height:{}px;text-align:center;",
                rect.left(),
                rect.top(),
                rect.size.x,
                rect.size.y,
                rect.size.y
            ),
        };
        format!(
            "{}font-size:{}px;color:{};",
            place,
            item.size_px,
            item.color.to_hex()
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bubble Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store at device resolution; the playfield is stretched onto it
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(settings, seed)));
        log::info!("Game initialized with seed: {}", app.borrow().game.seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            // Text and input still work without a canvas
            Err(e) => log::error!("No GPU device, drawing disabled: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_auto_pause(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Bubble Pop running!");
    }

    /// Pointer position in playfield pixels
    fn playfield_point(canvas: &HtmlCanvasElement, x: f32, y: f32) -> glam::IVec2 {
        canvas_to_playfield(
            x,
            y,
            canvas.client_width() as f32,
            canvas.client_height() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse down (left button only)
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let point =
                    playfield_point(&canvas_clone, event.offset_x() as f32, event.offset_y() as f32);
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.pending.push(InputEvent::PointerDown(point));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let point = playfield_point(&canvas_clone, x, y);
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.pending.push(InputEvent::PointerDown(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = match event.key().as_str() {
                    "Escape" => Key::P,
                    k => {
                        let mut chars = k.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Key::from_char(c),
                            _ => Key::Other,
                        }
                    }
                };
                if key != Key::Other {
                    app.borrow_mut().pending.push(InputEvent::Key(key));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();

            if a.quit {
                log::info!("Bubble Pop stopped");
                return;
            }
        }

        request_animation_frame(app);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.settings.pause_on_blur && a.game.pause_if_playing() {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.settings.pause_on_blur && a.game.pause_if_playing() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Pop (native) starting...");
    log::info!("Native mode plays a headless round with random taps - run with `trunk serve` to play");

    let mut difficulty = bubble_pop::sim::Difficulty::Easy;
    let mut seed = None;
    let mut settings = bubble_pop::Settings::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().and_then(|s| s.parse().ok()) {
                Some(s) => seed = Some(s),
                None => log::warn!("--seed expects an integer"),
            },
            "--settings" => match args.next() {
                Some(path) => {
                    settings = bubble_pop::Settings::load_from_path(std::path::Path::new(&path))
                }
                None => log::warn!("--settings expects a path"),
            },
            other => match bubble_pop::sim::Difficulty::from_str(other) {
                Some(d) => difficulty = d,
                None => log::warn!("Ignoring unknown argument: {}", other),
            },
        }
    }

    let fallback_seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    if seed.is_some() {
        settings.seed = seed;
    }
    if let Ok(json) = settings.to_json() {
        log::debug!("Settings: {}", json);
    }

    let score = run_headless(&settings, fallback_seed, difficulty);
    println!(
        "{} round finished with {} bubbles popped",
        difficulty.as_str(),
        score
    );
}

/// Ticks between scripted taps in a headless round
#[cfg(not(target_arch = "wasm32"))]
const TAP_INTERVAL: u64 = 20;

/// Play one full round with random taps and quit; returns the final score
///
/// Taps land anywhere above the pause button, so the round always runs out
/// its clock.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(
    settings: &bubble_pop::Settings,
    seed: u64,
    difficulty: bubble_pop::sim::Difficulty,
) -> u32 {
    use bubble_pop::consts::SCREEN_WIDTH;
    use bubble_pop::ui::PAUSE_BUTTON_RECT;
    use bubble_pop::{Flow, Game, InputEvent, Key, Phase};
    use glam::IVec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    let mut game = Game::from_settings(settings, seed);
    let mut taps = Pcg32::seed_from_u64(game.seed.wrapping_add(1));
    game.start_session(difficulty);

    let mut frame = 0u64;
    while game.phase() == Phase::Playing {
        let mut inputs = Vec::new();
        if frame % TAP_INTERVAL == 0 {
            let point = IVec2::new(
                taps.random_range(0..SCREEN_WIDTH),
                taps.random_range(0..PAUSE_BUTTON_RECT.top()),
            );
            inputs.push(InputEvent::PointerDown(point));
        }
        game.update(&inputs);
        frame += 1;
        for event in game.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    let score = game.session().map(|s| s.score).unwrap_or(0);
    if game.update(&[InputEvent::Key(Key::Q)]) == Flow::Quit {
        log::info!("Headless round done after {} frames (seed {})", frame, game.seed);
    }
    score
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
