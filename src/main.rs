//! Chrono Collector entry point
//!
//! Browser builds wire the canvas, keyboard and animation loop to a
//! [`Session`]. Native builds run a headless autopilot demo through the whole
//! mode state machine and log what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use chrono_collector::audio::WebAudio;
    use chrono_collector::input::{KeyState, action_for_key};
    use chrono_collector::renderer::{RenderState, tessellate};
    use chrono_collector::{Content, Session, Settings};

    /// Browser-side game instance
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        keys: KeyState,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let delta = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            let input = self.keys.tick_input();
            self.session.advance(delta, &input);
        }

        fn render(&mut self) {
            let Some(frame) = self.session.render_frame() else {
                return;
            };
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.render(&tessellate(&frame)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Publish the HUD as JSON for the page's overlay markup
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.session.hud();
            if let Some(el) = document.get_element_by_id("hud") {
                match serde_json::to_string(&hud) {
                    Ok(json) => {
                        let _ = el.set_attribute("data-hud", &json);
                    }
                    Err(e) => log::warn!("HUD encode failed: {e}"),
                }
            }
            if let Some(body) = document.body() {
                let _ = body.set_attribute("class", &format!("mode-{:?} sub-{:?}", hud.mode, hud.sub));
            }
            if let Some(el) = document.get_element_by_id("collection") {
                if let Ok(json) = serde_json::to_string(&self.session.collection()) {
                    let _ = el.set_attribute("data-items", &json);
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Chrono Collector starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let content = Content::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = Settings::default();
        let audio = Box::new(WebAudio::new(&settings));
        let session = Session::new(
            content,
            settings,
            audio,
            Vec2::new(width as f32, height as f32),
        );

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            keys: KeyState::new(),
            last_time: 0.0,
        }));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        // Rendering is optional; the game still runs with overlays only
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::warn!("No render device: {e}"),
                        }
                    }
                    Err(e) => log::warn!("No GPU adapter: {e}"),
                }
            }
            Err(e) => log::warn!("Failed to create surface: {e}"),
        }

        setup_input_handlers(&window, game.clone());
        setup_resize(&window, canvas, game.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(game);
        log::info!("Chrono Collector running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down: movement state plus one-shot UI actions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if g.keys.set(&key, true) {
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                if let Some(action) = action_for_key(&key) {
                    g.session.apply(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.set(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost, so release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.session.resize(Vec2::new(width as f32, height as f32));
            if let Some(rs) = g.render_state.as_mut() {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chrono Collector (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use the web build to play");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring settings in {path}: {e}");
                Settings::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {path}: {e}");
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let content = match Content::builtin() {
        Ok(content) => content,
        Err(e) => {
            log::error!("Bundled content is broken: {e}");
            std::process::exit(1);
        }
    };

    demo::run(content, settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
use chrono_collector::{Content, Settings};

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use chrono_collector::audio::Silent;
    use chrono_collector::consts::FRAME_MS;
    use chrono_collector::input::UiAction;
    use chrono_collector::sim::{TickInput, autopilot};
    use chrono_collector::{Content, GameMode, Session, Settings, SubMode};

    /// One simulated hour at 60 Hz
    const MAX_FRAMES: u64 = 60 * 60 * 60;
    /// Chance the demo player knows the answer
    const ANSWER_ACCURACY: f64 = 0.7;

    pub fn run(content: Content, settings: Settings) {
        let mut session = Session::new(
            content,
            settings,
            Box::new(Silent),
            Vec2::new(1280.0, 720.0),
        );
        let mut player_rng = Pcg32::seed_from_u64(session.seed());

        session.apply(UiAction::Confirm);

        let mut frames = 0;
        while frames < MAX_FRAMES {
            frames += 1;
            let input = match session.mode() {
                GameMode::Playing => autopilot(session.world()),
                _ => TickInput::default(),
            };
            session.advance(FRAME_MS, &input);

            let progress = session.progression();
            match (progress.mode(), progress.sub()) {
                (GameMode::Playing, SubMode::QuizIntro) | (GameMode::StageClear, _) => {
                    session.apply(UiAction::Confirm);
                }
                (GameMode::Quiz, _) => {
                    let Some(quiz) = session.current_quiz() else {
                        break;
                    };
                    let choice = if player_rng.random_bool(ANSWER_ACCURACY) {
                        quiz.answer
                    } else {
                        (quiz.answer + 1) % quiz.choices.len().max(1)
                    };
                    session.apply(UiAction::Answer(choice));
                }
                (GameMode::Gacha, _) if progress.is_reward_revealed() => {
                    if let Some(item) = session.last_reward() {
                        log::info!("Drew {} [{}] {}", item.icon, item.rarity.as_str(), item.name);
                    }
                    session.apply(UiAction::Confirm);
                }
                (GameMode::Ending, _) => break,
                _ => {}
            }
        }

        let hud = session.hud();
        log::info!(
            "Demo finished after {:.1} simulated minutes: mode {:?}, score {}, stage {} ({}), collected {}/{}",
            session.now_ms() / 60_000.0,
            hud.mode,
            hud.score,
            hud.stage + 1,
            hud.stage_name,
            hud.collected,
            hud.goal
        );
    }
}
