//! Screen state machine and the tick/frame loop
//!
//! `Game::frame` is called once per display refresh with a monotonic clock.
//! While playing it runs at most one simulation tick per call (ticks are
//! dropped, never queued), then the horror scheduler on the post-tick sanity,
//! then renders the latest state.

use crate::audio::{AudioSink, SoundCue};
use crate::consts::*;
use crate::highscores::{HighScores, LevelUnlocks};
use crate::horror::{EffectEnded, HorrorScheduler, Jumpscare};
use crate::input::DirectionalInput;
use crate::persistence::KeyValueStore;
use crate::renderer::{Canvas, Renderer};
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GameState, TickOutcome, tick};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Levels,
    Playing,
    Tutorial,
    Settings,
    GameOver,
    Win,
}

/// Startup configuration
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Base seed for level, horror and render randomness
    pub seed: u64,
    /// Frame size in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_cafe,
            width: 840,
            height: 480,
        }
    }
}

/// The whole game: screens, simulation, horror director and renderer
pub struct Game {
    screen: Screen,
    config: GameConfig,
    store: Box<dyn KeyValueStore>,
    audio: Box<dyn AudioSink>,
    input: DirectionalInput,
    settings: Settings,
    highscores: HighScores,
    unlocks: LevelUnlocks,
    sim: GameState,
    horror: HorrorScheduler,
    renderer: Renderer,
    /// Tick loop active (false once won, dead or left)
    running: bool,
    last_tick_ms: Option<f64>,
    attempts: u64,
    new_best: bool,
}

impl Game {
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>, audio: Box<dyn AudioSink>) -> Self {
        let settings = Settings::load(store.as_ref());
        let highscores = HighScores::load(store.as_ref());
        let unlocks = LevelUnlocks::load(store.as_ref());
        log::info!(
            "Snake Horror ready (max level {}, seed {:#x})",
            unlocks.max_level(),
            config.seed
        );

        Self {
            screen: Screen::Menu,
            store,
            audio,
            input: DirectionalInput::new(),
            highscores,
            unlocks,
            sim: GameState::new(1, config.seed),
            horror: HorrorScheduler::new(config.seed ^ 0x4011_0b),
            renderer: Renderer::new(config.width, config.height, config.seed, &settings),
            settings,
            config,
            running: false,
            last_tick_ms: None,
            attempts: 0,
            new_best: false,
        }
    }

    // === Accessors ===

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn unlocks(&self) -> &LevelUnlocks {
        &self.unlocks
    }

    pub fn horror(&self) -> &HorrorScheduler {
        &self.horror
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Last composited frame
    pub fn frame_buffer(&self) -> &Canvas {
        self.renderer.frame()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the last finished attempt set a new best for its level
    pub fn new_best(&self) -> bool {
        self.new_best
    }

    // === Input ===

    pub fn press(&mut self, dir: Direction) {
        if self.screen == Screen::Playing {
            self.input.press(dir);
        }
    }

    /// Movement key from the keyboard. Returns true if it was consumed.
    pub fn press_key(&mut self, key: &str) -> bool {
        self.screen == Screen::Playing && self.input.press_key(key)
    }

    // === Navigation ===

    /// Leave whatever is happening and return to the main menu
    pub fn go_to_menu(&mut self) {
        self.stop();
        self.screen = Screen::Menu;
    }

    pub fn go_to_levels(&mut self) -> bool {
        self.from_menu(Screen::Levels)
    }

    pub fn go_to_tutorial(&mut self) -> bool {
        self.from_menu(Screen::Tutorial)
    }

    pub fn go_to_settings(&mut self) -> bool {
        self.from_menu(Screen::Settings)
    }

    fn from_menu(&mut self, to: Screen) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        self.screen = to;
        true
    }

    /// Start the current level from the menu
    pub fn start_game(&mut self) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        self.start_level(self.sim.level);
        true
    }

    /// Start a level from the level select screen
    pub fn select_level(&mut self, level: u32) -> bool {
        if self.screen != Screen::Levels || !self.unlocks.is_unlocked(level) {
            return false;
        }
        self.start_level(level);
        true
    }

    /// Replay the level that just ended
    pub fn retry(&mut self) -> bool {
        if !matches!(self.screen, Screen::GameOver | Screen::Win) {
            return false;
        }
        self.start_level(self.sim.level);
        true
    }

    /// Continue to the following level after a win
    pub fn next_level(&mut self) -> bool {
        let next = self.sim.level + 1;
        if self.screen != Screen::Win || !self.unlocks.is_unlocked(next) {
            return false;
        }
        self.start_level(next);
        true
    }

    fn start_level(&mut self, level: u32) {
        self.attempts += 1;
        let seed = self
            .config
            .seed
            .wrapping_add(self.attempts.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        self.sim = GameState::new(level, seed);
        self.input.reset();
        self.horror.reset();
        self.renderer.reset();
        self.running = true;
        self.last_tick_ms = None;
        self.new_best = false;
        self.screen = Screen::Playing;
        log::info!(
            "Level {} started ({} walls, {} meat required)",
            level,
            self.sim.walls.len(),
            self.sim.required
        );
    }

    fn stop(&mut self) {
        self.running = false;
        self.last_tick_ms = None;
    }

    // === Settings ===

    /// Change settings, apply them and persist
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        self.settings.set_glitch_intensity(self.settings.glitch_intensity);
        self.renderer.apply_settings(&self.settings);
        self.settings.save(self.store.as_mut());
    }

    // === Loop ===

    /// Advance to `now_ms`. Returns true if a new frame was rendered.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        for ended in self.horror.expire(now_ms) {
            if let EffectEnded::Jumpscare(kind) = ended {
                self.resolve_jumpscare(kind);
            }
        }

        if self.screen != Screen::Playing {
            return false;
        }

        self.seal_fatal_scare();
        if self.running {
            match self.last_tick_ms {
                None => self.last_tick_ms = Some(now_ms),
                Some(last) if now_ms - last > TICK_INTERVAL_MS => {
                    self.last_tick_ms = Some(now_ms);
                    self.step(now_ms);
                }
                Some(_) => {}
            }
        }

        let snapshot = self.sim.snapshot();
        let view = self.horror.view();
        self.renderer.render(&snapshot, &view, now_ms);
        true
    }

    /// One simulation tick followed by the horror roll
    fn step(&mut self, now_ms: f64) {
        let outcome = tick(&mut self.sim, &mut self.input);
        for event in self.sim.drain_events() {
            self.handle_event(event);
        }

        match outcome {
            TickOutcome::Won => self.win_level(),
            TickOutcome::Died => self.die(now_ms),
            TickOutcome::Idle | TickOutcome::Moved => {
                self.sim.decay_sanity();
                let cues = self.horror.on_tick(now_ms, self.sim.sanity, &self.settings);
                for cue in cues {
                    self.play(cue);
                }
                self.seal_fatal_scare();
            }
        }
    }

    /// Stop ticking once a fatal jumpscare is showing; the run is lost.
    fn seal_fatal_scare(&mut self) {
        if self.running && self.horror.jumpscare() == Some(Jumpscare::Fatal) {
            self.stop();
            self.record_score();
            log::info!("Run lost to a fatal scare on level {}", self.sim.level);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Moved => self.play(SoundCue::Move),
            GameEvent::AteFood { at } => {
                self.renderer.spawn_blood(at);
                self.play(SoundCue::Eat);
            }
            GameEvent::KeySpawned { .. } | GameEvent::KeyTaken | GameEvent::DoorSpawned { .. } => {
                self.play(SoundCue::Unlock)
            }
            GameEvent::ReachedDoor | GameEvent::Died { .. } => {}
        }
    }

    fn play(&self, cue: SoundCue) {
        if !self.settings.muted {
            self.audio.play(cue);
        }
    }

    fn record_score(&mut self) {
        let level = self.sim.level;
        let score = self.sim.score;
        self.new_best = self.highscores.record(level, score);
        if self.new_best {
            log::info!("New best for level {}: {}", level, score);
            self.highscores.save(self.store.as_mut());
        }
    }

    fn win_level(&mut self) {
        self.stop();
        self.record_score();
        self.screen = Screen::Win;
        self.play(SoundCue::Unlock);

        let level = self.sim.level;
        if self.unlocks.complete(level) {
            log::info!("Level {} unlocked", self.unlocks.max_level());
            self.unlocks.save(self.store.as_mut());
        }
        log::info!("Level {} cleared with {} points", level, self.sim.score);
    }

    fn die(&mut self, now_ms: f64) {
        self.stop();
        self.record_score();
        self.renderer.spawn_blood(self.sim.head());
        log::info!("Died on level {} with {} points", self.sim.level, self.sim.score);
        if self.horror.trigger_jumpscare(Jumpscare::Fatal, now_ms) {
            self.play(SoundCue::Screech);
        }
    }

    /// Play a survivable jumpscare (sanity resets to 50 when it ends)
    pub fn scare(&mut self, now_ms: f64) -> bool {
        if self.screen != Screen::Playing || !self.running {
            return false;
        }
        let fired = self.horror.trigger_jumpscare(Jumpscare::Recoverable, now_ms);
        if fired {
            self.play(SoundCue::Screech);
        }
        fired
    }

    fn resolve_jumpscare(&mut self, kind: Jumpscare) {
        // Stale expiry after leaving the level: nothing to resolve
        if self.screen != Screen::Playing {
            return;
        }
        match kind {
            Jumpscare::Recoverable if self.running => {
                self.sim.set_sanity(JUMPSCARE_RECOVERY_SANITY);
            }
            // Fatal, or the run died while a survivable scare was showing
            _ => {
                if self.running {
                    self.stop();
                    self.record_score();
                }
                log::info!("Game over on level {}", self.sim.level);
                self.screen = Screen::GameOver;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use crate::audio::CueRecorder;
    use crate::horror::JUMPSCARE_DURATION_MS;
    use crate::persistence::MemoryStore;
    use crate::sim::{Objective, Position, Walls};

    fn game_with(store: MemoryStore) -> (Game, Rc<CueRecorder>) {
        let recorder = Rc::new(CueRecorder::new());
        let config = GameConfig {
            seed: 7,
            width: 840,
            height: 480,
        };
        let game = Game::new(config, Box::new(store), Box::new(recorder.clone()));
        (game, recorder)
    }

    fn game() -> (Game, Rc<CueRecorder>) {
        game_with(MemoryStore::new())
    }

    /// Calm settings so random scares cannot interfere
    fn quiet(game: &mut Game) {
        game.update_settings(|s| {
            s.sanity_fx = false;
            s.random_scares = false;
            s.glitch_intensity = 0.0;
        });
    }

    /// Clear the board and put the creature on a straight line heading right
    fn lay_out(game: &mut Game, head: Position) {
        let sim = &mut game.sim;
        sim.walls = Walls::default();
        sim.creature = VecDeque::from([
            head,
            Position::new(head.x - 1, head.y),
            Position::new(head.x - 2, head.y),
        ]);
        sim.food = Position::new(39, 21);
        sim.key = None;
        sim.door = None;
    }

    /// Head on the left edge, body trailing to the right
    fn at_left_edge(game: &mut Game) {
        lay_out(game, Position::new(2, 5));
        game.sim.creature = VecDeque::from([
            Position::new(0, 5),
            Position::new(1, 5),
            Position::new(2, 5),
        ]);
    }

    /// Drive one tick: prime the clock, then step past the interval
    fn run_tick(game: &mut Game, now: &mut f64) {
        if game.last_tick_ms.is_none() {
            game.frame(*now);
        }
        *now += TICK_INTERVAL_MS + 1.0;
        game.frame(*now);
    }

    #[test]
    fn test_menu_navigation() {
        let (mut game, _) = game();
        assert_eq!(game.screen(), Screen::Menu);
        assert!(game.go_to_settings());
        assert!(!game.go_to_levels());
        game.go_to_menu();
        assert!(game.go_to_tutorial());
        game.go_to_menu();
        assert!(game.go_to_levels());
        assert!(!game.start_game());
        game.go_to_menu();
        assert!(game.start_game());
        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.is_running());
        assert!(!game.retry());
    }

    #[test]
    fn test_locked_level_rejected() {
        let (mut game, _) = game();
        game.go_to_levels();
        assert!(!game.select_level(2));
        assert!(!game.select_level(0));
        assert_eq!(game.screen(), Screen::Levels);
        assert!(game.select_level(1));
        assert_eq!(game.state().level, 1);
    }

    #[test]
    fn test_unlocked_level_selectable_from_store() {
        let mut store = MemoryStore::new();
        store.set(LevelUnlocks::STORAGE_KEY, "5").unwrap();
        let (mut game, _) = game_with(store);
        game.go_to_levels();
        assert!(game.select_level(5));
        assert_eq!(game.state().level, 5);
        assert_eq!(game.state().required, 8);
    }

    #[test]
    fn test_ticks_are_gated_not_queued() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.press(Direction::Right);

        assert!(game.frame(1000.0));
        assert_eq!(game.state().head(), Position::new(10, 10));
        // Exactly one interval is not enough
        game.frame(1150.0);
        assert_eq!(game.state().head(), Position::new(10, 10));
        game.frame(1151.0);
        assert_eq!(game.state().head(), Position::new(11, 10));
        // A long stall yields a single tick, not a backlog
        game.frame(5000.0);
        assert_eq!(game.state().head(), Position::new(12, 10));
    }

    #[test]
    fn test_sanity_decays_every_tick_even_idle() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        let mut now = 0.0;
        for _ in 0..10 {
            run_tick(&mut game, &mut now);
        }
        let expected = MAX_SANITY - 10.0 * SANITY_DECAY_PER_TICK;
        assert!((game.state().sanity - expected).abs() < 1e-3);
        assert_eq!(game.state().moves, 0);
    }

    #[test]
    fn test_eating_plays_cue_and_bleeds() {
        let (mut game, recorder) = game();
        quiet(&mut game);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.sim.food = Position::new(11, 10);
        game.press(Direction::Right);

        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        assert_eq!(game.state().score, FOOD_SCORE);
        assert_eq!(recorder.count(SoundCue::Move), 1);
        assert_eq!(recorder.count(SoundCue::Eat), 1);
        assert!(!game.renderer.particles().particles().is_empty());
    }

    #[test]
    fn test_mute_silences_cues() {
        let (mut game, recorder) = game();
        quiet(&mut game);
        game.update_settings(|s| s.muted = true);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.press(Direction::Right);
        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        assert_eq!(game.state().head(), Position::new(11, 10));
        assert!(recorder.cues().is_empty());

        // Persisted with the rest of the settings
        assert!(Settings::load(game.store()).muted);
    }

    #[test]
    fn test_win_at_frontier_unlocks_next() {
        let (mut game, recorder) = game();
        quiet(&mut game);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.sim.objective = Objective::Exit;
        game.sim.door = Some(Position::new(11, 10));
        game.sim.score = 120;
        game.press(Direction::Right);

        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        assert_eq!(game.screen(), Screen::Win);
        assert!(!game.is_running());
        assert_eq!(game.unlocks().max_level(), 2);
        assert_eq!(game.store().get(LevelUnlocks::STORAGE_KEY).as_deref(), Some("2"));
        assert_eq!(game.highscores().best(1), Some(120));
        assert!(game.new_best());
        assert!(recorder.count(SoundCue::Unlock) >= 1);

        // Stopped: further frames neither tick nor render
        let head = game.state().head();
        assert!(!game.frame(now + 10_000.0));
        assert_eq!(game.state().head(), head);

        assert!(game.next_level());
        assert_eq!(game.state().level, 2);
    }

    #[test]
    fn test_win_below_frontier_keeps_max() {
        let mut store = MemoryStore::new();
        store.set(LevelUnlocks::STORAGE_KEY, "4").unwrap();
        let (mut game, _) = game_with(store);
        quiet(&mut game);
        game.go_to_levels();
        game.select_level(2);
        lay_out(&mut game, Position::new(10, 10));
        game.sim.objective = Objective::Exit;
        game.sim.door = Some(Position::new(11, 10));
        game.press(Direction::Right);

        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        assert_eq!(game.screen(), Screen::Win);
        assert_eq!(game.unlocks().max_level(), 4);
        assert_eq!(game.store().get(LevelUnlocks::STORAGE_KEY).as_deref(), Some("4"));
    }

    #[test]
    fn test_door_inside_wall_wins() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.sim.walls = Walls::from_cells(vec![Position::new(11, 10)]);
        game.sim.door = Some(Position::new(11, 10));
        game.press(Direction::Right);
        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        assert_eq!(game.screen(), Screen::Win);
    }

    #[test]
    fn test_edge_death_then_game_over_after_jumpscare() {
        let (mut game, recorder) = game();
        quiet(&mut game);
        game.start_game();
        at_left_edge(&mut game);
        game.sim.score = 30;
        game.press(Direction::Left);

        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        let died_at = now;
        assert_eq!(game.screen(), Screen::Playing);
        assert!(!game.is_running());
        assert_eq!(game.horror().jumpscare(), Some(Jumpscare::Fatal));
        assert_eq!(recorder.count(SoundCue::Screech), 1);
        assert_eq!(game.highscores().best(1), Some(30));

        // Overlay still up just before its deadline; no ticks meanwhile
        game.frame(died_at + JUMPSCARE_DURATION_MS - 1.0);
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.state().head(), Position::new(0, 5));

        game.frame(died_at + JUMPSCARE_DURATION_MS);
        assert_eq!(game.screen(), Screen::GameOver);

        assert!(game.retry());
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.state().head(), Position::new(10, 10));
    }

    #[test]
    fn test_stale_expiry_never_resurrects() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        at_left_edge(&mut game);
        game.press(Direction::Left);
        let mut now = 0.0;
        run_tick(&mut game, &mut now);

        // Leave before the jumpscare resolves
        game.go_to_menu();
        game.frame(now + JUMPSCARE_DURATION_MS * 2.0);
        assert_eq!(game.screen(), Screen::Menu);
        assert!(!game.is_running());
    }

    #[test]
    fn test_recoverable_scare_restores_sanity() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        game.sim.set_sanity(5.0);
        assert!(game.scare(100.0));
        assert!(!game.scare(200.0));
        game.frame(100.0 + JUMPSCARE_DURATION_MS);
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.state().sanity, JUMPSCARE_RECOVERY_SANITY);
    }

    #[test]
    fn test_zero_sanity_ends_in_game_over() {
        let (mut game, recorder) = game();
        quiet(&mut game);
        game.start_game();
        game.sim.set_sanity(0.0);
        game.sim.score = 40;

        let mut now = 0.0;
        for _ in 0..3_000 {
            run_tick(&mut game, &mut now);
            if game.screen() == Screen::GameOver {
                break;
            }
        }
        assert_eq!(game.screen(), Screen::GameOver);
        assert!(recorder.count(SoundCue::Screech) >= 1);
        assert_eq!(game.highscores().best(1), Some(40));
    }

    #[test]
    fn test_fatal_scare_cannot_be_outrun() {
        let (mut game, _) = game();
        quiet(&mut game);
        game.start_game();
        lay_out(&mut game, Position::new(10, 10));
        game.sim.objective = Objective::Exit;
        game.sim.door = Some(Position::new(11, 10));
        game.sim.set_sanity(0.0);
        game.sim.score = 25;
        assert!(game.horror.trigger_jumpscare(Jumpscare::Fatal, 0.0));
        game.press(Direction::Right);

        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        // The door is one step away but the run is already over
        assert!(!game.is_running());
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.state().head(), Position::new(10, 10));
        assert_eq!(game.unlocks().max_level(), 1);
        assert_eq!(game.highscores().best(1), Some(25));

        game.frame(JUMPSCARE_DURATION_MS);
        assert_eq!(game.screen(), Screen::GameOver);
        assert_eq!(game.unlocks().max_level(), 1);
    }

    #[test]
    fn test_horror_skipped_on_final_tick() {
        let (mut game, recorder) = game();
        game.start_game();
        at_left_edge(&mut game);
        game.sim.set_sanity(0.0);
        game.press(Direction::Left);
        let mut now = 0.0;
        run_tick(&mut game, &mut now);
        // Only the death screech, no heartbeat from a stopped tick
        assert_eq!(recorder.count(SoundCue::Heartbeat), 0);
        assert_eq!(recorder.count(SoundCue::Screech), 1);
    }

    #[test]
    fn test_renders_only_while_playing() {
        let (mut game, _) = game();
        assert!(!game.frame(0.0));
        game.start_game();
        assert!(game.frame(16.0));
        assert_eq!(game.frame_buffer().width(), 840);
    }
}
