//! Tile Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use tile_rush::consts::*;
    use tile_rush::feedback::{FeedbackBoard, FeedbackKind};
    use tile_rush::persistence::LocalStorageStore;
    use tile_rush::platform::{AnimationFrameClock, Command, TickSource};
    use tile_rush::platform::{command_for_key, lane_for_key, lane_for_pointer};
    use tile_rush::sim::GamePhase;
    use tile_rush::{Difficulty, JsonLeaderboard, Session, Settings};

    type WebSession = Session<AnimationFrameClock, JsonLeaderboard<LocalStorageStore>>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        settings: Settings,
        feedback: FeedbackBoard,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        /// Re-measure the canvas; the playfield height follows the layout
        fn measure(&mut self) {
            let w = self.canvas.client_width().max(0) as u32;
            let h = self.canvas.client_height().max(0) as u32;
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
            self.session.set_playfield_height(h as f32);
        }

        /// One delivered animation frame
        fn frame(&mut self) {
            self.measure();
            self.session.on_frame();
            self.present();
        }

        fn tap(&mut self, lane: u8) {
            self.session.tap(lane);
            self.present();
        }

        fn command(&mut self, command: Command) {
            match command {
                Command::TogglePause => {
                    self.session.toggle_pause();
                }
                Command::Start => match self.session.phase() {
                    GamePhase::Menu => self.start(),
                    GamePhase::GameOver => {
                        self.feedback.clear();
                        self.session.restart();
                    }
                    _ => {}
                },
            }
            self.present();
        }

        fn start(&mut self) {
            self.measure();
            self.feedback.clear();
            self.session.start();
        }

        fn select_difficulty(&mut self, difficulty: Difficulty) {
            if self.session.select_difficulty(difficulty) {
                self.settings.difficulty = difficulty;
                if let Err(e) = self.settings.save(&mut LocalStorageStore::new()) {
                    log::warn!("Could not save settings: {}", e);
                }
            }
            self.present();
        }

        /// Feed events to the feedback board, then draw
        fn present(&mut self) {
            let now = self.session.clock().now_ms();
            for event in self.session.drain_events() {
                self.feedback.push_event(&event, now);
            }
            self.feedback.prune(now);
            self.render();
            self.update_hud();
        }

        fn render(&self) {
            let ctx = &self.ctx;
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            let lane_w = w / LANE_COUNT as f64;

            ctx.set_fill_style_str("#0b0b1a");
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.set_fill_style_str("rgba(120, 120, 255, 0.2)");
            for lane in 1..LANE_COUNT {
                ctx.fill_rect(lane as f64 * lane_w - 1.0, 0.0, 2.0, h);
            }

            if let Some(zone) = self.session.playfield().hit_zone() {
                ctx.set_fill_style_str("rgba(255, 80, 200, 0.15)");
                ctx.fill_rect(0.0, zone.top as f64, w, zone.height() as f64);
            }

            ctx.set_fill_style_str("#48d1ff");
            for tile in self.session.tiles() {
                ctx.fill_rect(
                    tile.lane as f64 * lane_w + 4.0,
                    tile.y as f64,
                    lane_w - 8.0,
                    tile.height as f64,
                );
            }

            ctx.set_font("bold 20px sans-serif");
            for fb in self.feedback.entries() {
                let color = match fb.kind {
                    FeedbackKind::Hit { perfect: true, .. } => "#ffd84a",
                    FeedbackKind::Hit { .. } => "#7dff9a",
                    FeedbackKind::Miss => "#ff5a5a",
                };
                ctx.set_fill_style_str(color);
                let x = fb.lane as f64 * lane_w + lane_w / 2.0 - 30.0;
                let y = h - (BOTTOM_PADDING + HIT_ZONE_HEIGHT) as f64 - 10.0;
                let _ = ctx.fill_text(&fb.label(), x, y);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.session.score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-combo") {
                el.set_text_content(Some(&format!("x{}", self.session.combo())));
            }

            let phase = self.session.phase();
            let overlays = [
                ("menu", GamePhase::Menu),
                ("pause-menu", GamePhase::Paused),
                ("game-over", GamePhase::GameOver),
            ];
            for (id, shown) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if phase == shown { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }

            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.session.score().to_string()));
                }
            }

            for difficulty in Difficulty::ALL {
                let id = format!("difficulty-{}", difficulty.as_str());
                if let Some(el) = document.get_element_by_id(&id) {
                    let class = if self.session.difficulty() == difficulty {
                        "selected"
                    } else {
                        ""
                    };
                    let _ = el.set_attribute("class", class);
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tile Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load(&LocalStorageStore::new());
        let clock = AnimationFrameClock::new();
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            clock.clone(),
            JsonLeaderboard::new(LocalStorageStore::new()),
            &settings,
            seed,
        );
        log::info!("Session created with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            feedback: FeedbackBoard::new(settings.feedback_duration_ms),
            settings,
            canvas: canvas.clone(),
            ctx,
        }));

        {
            let game = game.clone();
            clock.install(move || {
                if let Ok(mut g) = game.try_borrow_mut() {
                    g.frame();
                }
            });
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        {
            let mut g = game.borrow_mut();
            g.measure();
            g.present();
        }

        log::info!("Tile Rush running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer - lane under the pointer
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let width = canvas_clone.client_width() as f32;
                if let Some(lane) = lane_for_pointer(event.offset_x() as f32, width) {
                    game.borrow_mut().tap(lane);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let key = event.key();
                let mut g = game.borrow_mut();
                if let Some(lane) = lane_for_key(&key) {
                    g.tap(lane);
                } else if let Some(command) = command_for_key(&key) {
                    g.command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                action(&mut g);
                g.present();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), |g| g.start());
        on_click("resume-btn", game.clone(), |g| {
            g.session.resume();
        });
        on_click("pause-restart-btn", game.clone(), |g| {
            g.feedback.clear();
            g.session.restart();
        });
        on_click("play-again-btn", game.clone(), |g| {
            g.feedback.clear();
            g.session.restart();
        });
        on_click("pause-menu-btn", game.clone(), |g| {
            g.session.exit_to_menu();
        });
        on_click("game-over-menu-btn", game.clone(), |g| {
            g.session.exit_to_menu();
        });
        on_click("difficulty-easy", game.clone(), |g| g.select_difficulty(Difficulty::Easy));
        on_click("difficulty-medium", game.clone(), |g| g.select_difficulty(Difficulty::Medium));
        on_click("difficulty-hard", game, |g| g.select_difficulty(Difficulty::Hard));
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.pause() {
                        log::info!("Auto-paused (tab hidden)");
                        g.present();
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
                if g.session.pause() {
                    log::info!("Auto-paused (window blur)");
                    g.present();
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
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Rush (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(12345);
    let difficulty = std::env::args()
        .nth(2)
        .and_then(|arg| tile_rush::Difficulty::from_str(&arg))
        .unwrap_or_default();

    demo::run(seed, difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tile_rush::highscores::LEADERBOARD_SIZE;
    use tile_rush::persistence::MemoryStore;
    use tile_rush::platform::{ManualClock, TickSource};
    use tile_rush::sim::{GamePhase, choose_taps};
    use tile_rush::{Difficulty, JsonLeaderboard, LeaderboardStore, Session, Settings};

    /// Frame time for the demo (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this many frames (~5 minutes)
    const MAX_FRAMES: u32 = 60 * 300;
    const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Headless autoplay run
    pub fn run(seed: u64, difficulty: Difficulty) {
        let settings = Settings {
            difficulty,
            ..Default::default()
        };
        let mut session = Session::new(
            ManualClock::new(),
            JsonLeaderboard::new(MemoryStore::new()),
            &settings,
            seed,
        );
        session.set_playfield_height(PLAYFIELD_HEIGHT);
        session.start();

        let mut frames = 0;
        while session.phase() == GamePhase::Playing && frames < MAX_FRAMES {
            session.clock_mut().advance(FRAME_MS);
            if session.clock_mut().take_tick() {
                session.on_frame();
            }
            // Stop tapping near the frame budget so the run ends on a miss
            if frames < MAX_FRAMES - 120 {
                for lane in choose_taps(session.run(), session.playfield()) {
                    session.tap(lane);
                }
            }
            session.drain_events();
            frames += 1;
        }

        if session.phase() == GamePhase::Playing {
            session.pause();
        }

        log::info!(
            "Demo finished after {} frames ({:.1}s): score {}, phase {}",
            frames,
            session.clock().now_ms() / 1000.0,
            session.score(),
            session.phase().as_str()
        );
        for record in session.leaderboard().snapshot().ranked(LEADERBOARD_SIZE) {
            println!(
                "{:>8}  {:<12} {:<6} {}",
                record.score,
                record.label,
                record.difficulty.as_str(),
                record.id
            );
        }
    }
}
