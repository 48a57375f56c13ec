//! Nova Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use nova_strike::audio::AudioManager;
    use nova_strike::consts::*;
    use nova_strike::render::Renderer;
    use nova_strike::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use nova_strike::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Track phase so the high score is submitted once per run
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.sfx_volume);
            audio.set_muted(!settings.sfx);
            Self {
                state: GameState::new(seed),
                renderer: Renderer::new(ctx),
                audio,
                settings,
                high_score: HighScore::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                last_phase: GamePhase::Playing,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.restart = false;
            }

            self.handle_events();

            // Submit the score once when the run ends
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                if current_phase == GamePhase::GameOver {
                    let now = js_sys::Date::now();
                    if self
                        .high_score
                        .submit(self.state.score, self.state.cycle, now)
                    {
                        self.high_score.save();
                        log::info!("New high score: {}", self.high_score.score);
                    }
                }
                self.last_phase = current_phase;
            }
        }

        /// Play sound cues for this frame's events
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                self.audio.play(event);
                if event == GameEvent::BossArrived {
                    log::info!("Boss incoming at score {}", self.state.score);
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            self.renderer.draw(&self.state, &self.settings);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                if self.high_score.is_set() {
                    el.set_text_content(Some(&self.high_score.score.to_string()));
                } else {
                    el.set_text_content(Some("-"));
                }
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Nova Strike starting...");

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

        // Fixed logical playfield; CSS scales the element
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Nova Strike running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard press
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // AudioContext needs a user gesture before it can start
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "ArrowUp" | "w" | "W" => g.input.up = true,
                    "ArrowDown" | "s" | "S" => g.input.down = true,
                    " " => {
                        event.prevent_default();
                        g.input.fire = true;
                    }
                    "Escape" => g.input.pause = true,
                    "Enter" => g.input.restart = true,
                    "m" | "M" => {
                        g.settings.sfx = !g.settings.sfx;
                        let muted = !g.settings.sfx;
                        g.audio.set_muted(muted);
                        g.settings.save();
                        log::info!("Sound {}", if muted { "muted" } else { "on" });
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard release
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    "ArrowUp" | "w" | "W" => g.input.up = false,
                    "ArrowDown" | "s" | "S" => g.input.down = false,
                    " " => g.input.fire = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: fire, and restart from game over
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.fire = true;
                if g.state.phase == GamePhase::GameOver {
                    g.input.restart = true;
                }
                if let Some(touch) = event.touches().get(0) {
                    g.input.target_x = Some(canvas_x(&canvas_clone, touch.client_x() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: drag the ship toward the finger
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.input.target_x = Some(canvas_x(&canvas_clone, touch.client_x() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: stop firing and chasing
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    let mut g = game.borrow_mut();
                    g.input.fire = false;
                    g.input.target_x = None;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Map a client-space X coordinate onto the logical playfield
    fn canvas_x(canvas: &HtmlCanvasElement, client_x: f32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        let scale = FIELD_WIDTH / rect.width() as f32;
        (client_x - rect.left() as f32) * scale
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
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
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Nova Strike (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_smoke_run();
}

/// Drive the simulation for a few seconds with the fire button held and
/// report the outcome, as a quick sanity check of the sim crate
#[cfg(not(target_arch = "wasm32"))]
fn headless_smoke_run() {
    use nova_strike::consts::SIM_DT;
    use nova_strike::sim::{GameState, TickInput, tick};

    let mut state = GameState::new(0xC0FFEE);
    let input = TickInput {
        fire: true,
        ..TickInput::default()
    };

    for _ in 0..600 {
        tick(&mut state, &input, SIM_DT);
    }

    println!(
        "After 10s: score={} lives={} monsters={} phase={:?}",
        state.score,
        state.lives,
        state.monsters.len(),
        state.phase
    );
}
