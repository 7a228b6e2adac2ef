//! Scramble entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use scramble::render::{self, Canvas, Color};
    use scramble::sim::{GamePhase, GameState, tick};
    use scramble::{InputState, Key, Settings};

    /// 2D context wrapper implementing the drawing boundary
    struct Surface {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl Surface {
        fn from_element(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into()?;
            Ok(Self {
                ctx,
                width: canvas.width() as f64,
                height: canvas.height() as f64,
            })
        }

        fn trace(&self, points: &[Vec2]) {
            self.ctx.begin_path();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    self.ctx.move_to(p.x as f64, p.y as f64);
                } else {
                    self.ctx.line_to(p.x as f64, p.y as f64);
                }
            }
        }
    }

    impl Canvas for Surface {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Color) {
            self.trace(points);
            self.ctx.set_line_width(width as f64);
            self.ctx.set_stroke_style_str(color);
            self.ctx.stroke();
        }

        fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
            self.trace(points);
            self.ctx.close_path();
            self.ctx.set_fill_style_str(color);
            self.ctx.fill();
        }

        fn fill_text(&mut self, text: &str, at: Vec2, size_px: f32, color: Color) {
            self.ctx.set_font(&format!("{}px monospace", size_px));
            self.ctx.set_fill_style_str(color);
            if let Err(e) = self.ctx.fill_text(text, at.x as f64, at.y as f64) {
                log::warn!("fill_text failed: {:?}", e);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        game_canvas: Surface,
        info_canvas: Option<Surface>,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl Game {
        /// Run one simulation tick
        fn update(&mut self, dt_ms: f32) {
            let input = self.input.snapshot();
            tick(&mut self.state, &input, dt_ms);

            if self.state.phase != self.last_phase {
                log::info!(
                    "Phase {:?} -> {:?} (score {}, ships {})",
                    self.last_phase,
                    self.state.phase,
                    self.state.score,
                    self.state.ships
                );
                self.last_phase = self.state.phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            render::draw_game(&mut self.game_canvas, &self.state);
            if let Some(info) = self.info_canvas.as_mut() {
                render::draw_info(info, &self.state);
            }
        }
    }

    fn canvas_by_id(document: &web_sys::Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Scramble starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let game_element = canvas_by_id(&document, "gameCanvas")
            .ok_or_else(|| JsValue::from_str("no gameCanvas element"))?;
        let game_canvas = Surface::from_element(game_element.clone())?;
        let info_canvas = match canvas_by_id(&document, "infoCanvas") {
            Some(el) => Some(Surface::from_element(el)?),
            None => {
                log::info!("No infoCanvas; score display disabled");
                None
            }
        };

        let settings = Settings::load();
        settings.save();
        log::info!("Frame time scaling: {}", settings.dt_scaling.as_str());
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let state = GameState::new(seed, settings);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            last_phase: state.phase,
            state,
            input: InputState::default(),
            game_canvas,
            info_canvas,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &game_element, game.clone())?;

        game.borrow_mut().render();
        request_animation_frame(game);

        log::info!("Scramble running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.key_down(key);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur releases held keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click starts a game from the title screen
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.start_game() {
                    g.input.clear();
                    log::info!("Game started");
                }
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; stopping game loop");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // First frame only establishes the time base
            if g.last_time > 0.0 {
                let dt_ms = (time - g.last_time) as f32;
                g.update(dt_ms);
            }
            g.last_time = time;

            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scramble (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    let settings = scramble::Settings::load();
    let seed = settings.seed.unwrap_or(0x5C4A_B1E);
    demo::run(seed, settings, demo::FRAMES);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use scramble::Settings;
    use scramble::consts::*;
    use scramble::sim::{Boundary, EntityKind, GamePhase, GameState, TickInput, tick};

    /// Frames simulated by the demo
    pub const FRAMES: u32 = 20_000;
    /// Fixed frame time (about 60 fps)
    pub const DT_MS: f32 = 16.0;

    /// Terrain height of `boundary` at `x`, read from the edge covering it
    fn terrain_y(state: &GameState, boundary: Boundary, x: f32) -> Option<f32> {
        state.obstacles.iter().find_map(|piece| match piece.kind {
            EntityKind::TerrainEdge { boundary: b, to_y }
                if b == boundary && x >= piece.pos.x && x < piece.pos.x + COLUMN_WIDTH =>
            {
                let t = (x - piece.pos.x) / COLUMN_WIDTH;
                Some(piece.pos.y + (to_y - piece.pos.y) * t)
            }
            _ => None,
        })
    }

    /// Steer toward the middle of the tunnel a little ahead of the ship
    fn autopilot(state: &GameState, frame: u32) -> TickInput {
        let player = state.player.pos;
        let look_ahead = player.x + PLAYER_HALF_LENGTH + COLUMN_WIDTH / 2.0;
        let ceiling = terrain_y(state, Boundary::Ceiling, look_ahead).unwrap_or(0.0);
        let floor = terrain_y(state, Boundary::Floor, look_ahead).unwrap_or(SCREEN_HEIGHT);
        let target = (ceiling + floor) / 2.0;

        TickInput {
            up: player.y > target + 2.0,
            down: player.y < target - 2.0,
            left: false,
            right: false,
            fire_bullet: frame % 8 == 0,
            fire_bomb: frame % 20 == 0,
        }
    }

    pub fn run(seed: u64, settings: Settings, frames: u32) -> GameState {
        let mut state = GameState::new(seed, settings);
        let mut last_phase = state.phase;
        let mut games = 0;

        log::info!(
            "Demo seed {}, {} frames, {} scaling",
            seed,
            frames,
            state.settings.dt_scaling.as_str()
        );

        for frame in 0..frames {
            if state.phase == GamePhase::Idle && state.start_game() {
                games += 1;
                log::info!("Game {} started", games);
            }

            let input = autopilot(&state, frame);
            tick(&mut state, &input, DT_MS);

            if state.phase != last_phase {
                log::info!(
                    "Frame {}: {:?} -> {:?} (score {}, ships {})",
                    frame,
                    last_phase,
                    state.phase,
                    state.score,
                    state.ships
                );
                last_phase = state.phase;
            }
        }

        log::info!(
            "Demo finished after {} games: score {}, ships {}",
            games,
            state.score,
            state.ships
        );
        state
    }

}
