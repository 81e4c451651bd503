//! Snake Horror entry point
//!
//! The browser build presents the software frame on a 2D canvas and drives
//! the game from `requestAnimationFrame`. The native build runs a headless
//! demo on a simulated clock with the autopilot at the controls.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, KeyboardEvent};

    use snake_horror::audio;
    use snake_horror::consts::LEVEL_COUNT;
    use snake_horror::persistence::LocalStore;
    use snake_horror::settings::{MAX_GLITCH_INTENSITY, QualityPreset};
    use snake_horror::{Game, GameConfig, Screen};

    const TEXT: &str = "#cc4444";
    const DIM: &str = "#777777";

    /// Browser-side state around the game
    struct Frontend {
        game: Game,
        ctx: CanvasRenderingContext2d,
        width: u32,
        height: u32,
        /// Highlighted entry on the level select screen
        selected_level: u32,
    }

    impl Frontend {
        fn on_key(&mut self, key: &str, now: f64) -> bool {
            let g = &mut self.game;
            let handled = match g.screen() {
                Screen::Menu => match key {
                    "Enter" | " " => g.start_game(),
                    "l" | "L" => {
                        self.selected_level = g.unlocks().max_level().min(LEVEL_COUNT);
                        g.go_to_levels()
                    }
                    "s" | "S" => g.go_to_settings(),
                    "t" | "T" => g.go_to_tutorial(),
                    _ => false,
                },
                Screen::Levels => match key {
                    "ArrowLeft" | "a" => {
                        self.selected_level = self.selected_level.saturating_sub(1).max(1);
                        true
                    }
                    "ArrowRight" | "d" => {
                        self.selected_level = (self.selected_level + 1).min(LEVEL_COUNT);
                        true
                    }
                    "Enter" | " " => g.select_level(self.selected_level),
                    "Escape" => {
                        g.go_to_menu();
                        true
                    }
                    _ => false,
                },
                Screen::Settings => {
                    match key {
                        "1" => g.update_settings(|s| s.sanity_fx = !s.sanity_fx),
                        "2" => g.update_settings(|s| s.random_scares = !s.random_scares),
                        "3" => g.update_settings(|s| {
                            s.quality = match s.quality {
                                QualityPreset::Low => QualityPreset::Medium,
                                QualityPreset::Medium => QualityPreset::High,
                                QualityPreset::High => QualityPreset::Low,
                            }
                        }),
                        "+" | "=" => g.update_settings(|s| {
                            s.set_glitch_intensity(s.glitch_intensity + 0.25)
                        }),
                        "-" => g.update_settings(|s| {
                            s.set_glitch_intensity(s.glitch_intensity - 0.25)
                        }),
                        "m" | "M" => g.update_settings(|s| s.muted = !s.muted),
                        "Escape" | "Enter" => g.go_to_menu(),
                        _ => return false,
                    }
                    true
                }
                Screen::Tutorial => match key {
                    "Escape" | "Enter" | " " => {
                        g.go_to_menu();
                        true
                    }
                    _ => false,
                },
                Screen::Playing => match key {
                    "Escape" => {
                        g.go_to_menu();
                        true
                    }
                    _ => g.press_key(key),
                },
                Screen::GameOver => match key {
                    "r" | "R" | "Enter" => g.retry(),
                    "Escape" => {
                        g.go_to_menu();
                        true
                    }
                    _ => false,
                },
                Screen::Win => match key {
                    "n" | "N" | "Enter" => g.next_level(),
                    "r" | "R" => g.retry(),
                    "Escape" => {
                        g.go_to_menu();
                        true
                    }
                    _ => false,
                },
            };
            if handled {
                log::debug!("Key {key} handled at {now:.0}ms");
            }
            handled
        }

        fn present(&self) {
            let frame = self.game.frame_buffer();
            match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(frame.as_bytes()),
                frame.width(),
                frame.height(),
            ) {
                Ok(image) => {
                    if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                        log::warn!("putImageData failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("ImageData creation failed: {:?}", e),
            }
        }

        fn text(&self, s: &str, x: f64, y: f64, size: u32, color: &str) {
            self.ctx.set_font(&format!("{size}px monospace"));
            self.ctx.set_fill_style_str(color);
            let _ = self.ctx.fill_text(s, x, y);
        }

        fn centered(&self, lines: &[(&str, u32, &str)]) {
            self.ctx.set_text_align("center");
            let cx = self.width as f64 / 2.0;
            let mut y = self.height as f64 / 2.0 - lines.len() as f64 * 16.0;
            for (line, size, color) in lines {
                self.text(line, cx, y, *size, color);
                y += *size as f64 + 14.0;
            }
            self.ctx.set_text_align("start");
        }

        fn blank(&self) {
            self.ctx.set_fill_style_str("#0a0a0a");
            self.ctx
                .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
        }

        fn draw_hud(&self) {
            let state = self.game.state();
            let hud = format!(
                "LVL {}   SCORE {}   SANITY {:.0}%",
                state.level, state.score, state.sanity
            );
            self.text(&hud, 12.0, 22.0, 16, TEXT);
            self.text(&state.objective_label(), 12.0, 42.0, 14, DIM);
        }

        fn draw_screen(&self) {
            let g = &self.game;
            match g.screen() {
                Screen::Playing => self.draw_hud(),
                Screen::Menu => {
                    self.blank();
                    let best = g
                        .highscores()
                        .top_score()
                        .map(|s| format!("Best: {s}"))
                        .unwrap_or_default();
                    self.centered(&[
                        ("SNAKE HORROR", 40, TEXT),
                        ("[Enter] Play   [L] Levels   [S] Settings   [T] Tutorial", 14, DIM),
                        (&best, 14, DIM),
                    ]);
                }
                Screen::Levels => {
                    self.blank();
                    let max = g.unlocks().max_level();
                    let row: String = (1..=LEVEL_COUNT)
                        .map(|l| {
                            if l == self.selected_level {
                                format!("[{l}]")
                            } else if l <= max {
                                format!(" {l} ")
                            } else {
                                " # ".to_string()
                            }
                        })
                        .collect();
                    let best = g
                        .highscores()
                        .best(self.selected_level)
                        .map(|s| format!("Best: {s}"))
                        .unwrap_or_else(|| "No record".to_string());
                    self.centered(&[
                        ("SELECT LEVEL", 28, TEXT),
                        (&row, 14, DIM),
                        (&best, 14, DIM),
                        ("[Left/Right] choose   [Enter] play   [Esc] back", 12, DIM),
                    ]);
                }
                Screen::Settings => {
                    self.blank();
                    let s = g.settings();
                    let on = |b: bool| if b { "ON" } else { "OFF" };
                    let lines = [
                        format!("[1] Sanity effects: {}", on(s.sanity_fx)),
                        format!("[2] Random scares: {}", on(s.random_scares)),
                        format!("[3] Quality: {}", s.quality.as_str()),
                        format!(
                            "[+/-] Hallucination intensity: {:.2} / {:.1}",
                            s.glitch_intensity, MAX_GLITCH_INTENSITY
                        ),
                        format!("[M] Sound: {}", on(!s.muted)),
                    ];
                    let mut rows: Vec<(&str, u32, &str)> = vec![("SETTINGS", 28, TEXT)];
                    rows.extend(lines.iter().map(|l| (l.as_str(), 14, DIM)));
                    rows.push(("[Esc] back", 12, DIM));
                    self.centered(&rows);
                }
                Screen::Tutorial => {
                    self.blank();
                    self.centered(&[
                        ("HOW TO SURVIVE", 28, TEXT),
                        ("Move with WASD or the arrow keys.", 14, DIM),
                        ("Devour the meat to feed your sanity.", 14, DIM),
                        ("Then find the key, then the door.", 14, DIM),
                        ("Walls, edges and your own body are fatal.", 14, DIM),
                        ("The darker it gets, the less you can trust.", 14, DIM),
                        ("[Enter] back", 12, DIM),
                    ]);
                }
                Screen::GameOver => {
                    let score = format!("Score: {}", g.state().score);
                    self.centered(&[
                        ("YOU DIED", 40, "#ff2222"),
                        (&score, 16, DIM),
                        ("[R] retry   [Esc] menu", 12, DIM),
                    ]);
                }
                Screen::Win => {
                    let score = if g.new_best() {
                        format!("New best: {}", g.state().score)
                    } else {
                        format!("Score: {}", g.state().score)
                    };
                    self.centered(&[
                        ("YOU ESCAPED", 40, "#dddddd"),
                        (&score, 16, DIM),
                        ("[N] next level   [R] retry   [Esc] menu", 12, DIM),
                    ]);
                }
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<Frontend>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<Frontend>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.game.frame(time) {
                a.present();
            }
            a.draw_screen();
        }
        request_animation_frame(app);
    }

    fn setup_keyboard(app: Rc<RefCell<Frontend>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let now = web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0);
            if app.borrow_mut().on_key(&event.key(), now) {
                event.prevent_default();
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Snake Horror starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig {
            seed: js_sys::Date::now() as u64,
            ..GameConfig::default()
        };
        canvas.set_width(config.width);
        canvas.set_height(config.height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let game = Game::new(config, Box::new(LocalStore::new()), audio::default_sink());
        log::info!("Game initialized with seed: {}", config.seed);

        let app = Rc::new(RefCell::new(Frontend {
            game,
            ctx,
            width: config.width,
            height: config.height,
            selected_level: 1,
        }));

        setup_keyboard(app.clone())?;
        request_animation_frame(app);

        log::info!("Snake Horror running!");
        Ok(())
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run(headless::Options::from_args(std::env::args().skip(1)));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::rc::Rc;

    use snake_horror::audio::{CueRecorder, SoundCue};
    use snake_horror::autopilot;
    use snake_horror::persistence::FileStore;
    use snake_horror::{Game, GameConfig, QualityPreset, Screen};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct Options {
        level: u32,
        seed: u64,
        max_frames: u32,
        save: PathBuf,
        quality: Option<QualityPreset>,
    }

    impl Options {
        /// `--level N --seed N --frames N --save PATH --quality low|med|high`;
        /// unknown or bad
        /// values keep their defaults.
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
            let mut opts = Self {
                level: 1,
                seed: GameConfig::default().seed,
                max_frames: 60 * 60 * 5,
                save: std::env::temp_dir().join("snake_horror_save.json"),
                quality: None,
            };
            while let Some(flag) = args.next() {
                let value = args.next();
                match (flag.as_str(), value) {
                    ("--level", Some(v)) => opts.level = v.parse().unwrap_or(opts.level),
                    ("--seed", Some(v)) => opts.seed = v.parse().unwrap_or(opts.seed),
                    ("--frames", Some(v)) => opts.max_frames = v.parse().unwrap_or(opts.max_frames),
                    ("--save", Some(v)) => opts.save = PathBuf::from(v),
                    ("--quality", Some(v)) => match QualityPreset::parse(&v) {
                        Some(q) => opts.quality = Some(q),
                        None => log::warn!("Unknown quality {v}"),
                    },
                    (other, _) => log::warn!("Ignoring argument {other}"),
                }
            }
            opts
        }
    }

    pub fn run(opts: Options) {
        log::info!("Snake Horror (native, headless) starting...");
        let recorder = Rc::new(CueRecorder::new());
        let config = GameConfig {
            seed: opts.seed,
            ..GameConfig::default()
        };
        let store = FileStore::open(&opts.save);
        let mut game = Game::new(config, Box::new(store), Box::new(recorder.clone()));
        if let Some(quality) = opts.quality {
            game.update_settings(|s| s.quality = quality);
        }

        game.go_to_levels();
        if !game.select_level(opts.level) {
            log::warn!(
                "Level {} is locked (max {}), playing level {}",
                opts.level,
                game.unlocks().max_level(),
                game.unlocks().max_level()
            );
            game.select_level(game.unlocks().max_level());
        }

        let mut now = 0.0;
        let mut frames = 0;
        while frames < opts.max_frames && game.screen() == Screen::Playing {
            if game.is_running() {
                let state = game.state();
                if let Some(dir) = autopilot::choose_direction(state, autopilot::heading(state)) {
                    game.press(dir);
                }
            }
            game.frame(now);
            now += FRAME_MS;
            frames += 1;
        }

        let state = game.state();
        let outcome = match game.screen() {
            Screen::Win => "escaped",
            Screen::GameOver => "died",
            _ => "still wandering",
        };
        log::info!(
            "Level {} {}: score {}, sanity {:.1}, {} moves, {} frames",
            state.level,
            outcome,
            state.score,
            state.sanity,
            state.moves,
            frames
        );
        log::info!(
            "Cues: {} eats, {} heartbeats, {} whispers, {} scares",
            recorder.count(SoundCue::Eat),
            recorder.count(SoundCue::Heartbeat),
            recorder.count(SoundCue::Whisper),
            recorder.count(SoundCue::SuddenNoise) + recorder.count(SoundCue::Screech),
        );
        log::info!(
            "Max level unlocked: {}, save file {}",
            game.unlocks().max_level(),
            opts.save.display()
        );
    }
}
