//! Game state and core simulation types
//!
//! Everything that resets when a level starts lives in `GameState`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::find_free_cell;
use super::grid::{Position, Walls};
use super::level::build_level;
use crate::consts::*;

/// Starting body, head first
pub const START_SEGMENTS: [Position; 3] = [
    Position::new(10, 10),
    Position::new(9, 10),
    Position::new(8, 10),
];

/// Level goal, strictly advancing within a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Objective {
    /// Devour enough meat
    Consume,
    /// Pick up the key
    Retrieve,
    /// Reach the door
    Exit,
}

/// Things that happened during a tick, drained by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Head advanced one cell
    Moved,
    /// Meat devoured at a cell
    AteFood { at: Position },
    /// Key appeared after the meat quota was met
    KeySpawned { at: Position },
    /// Key collected
    KeyTaken,
    /// Door appeared after the key was taken
    DoorSpawned { at: Position },
    /// Head entered the door
    ReachedDoor,
    /// Head hit the boundary, a wall or the body
    Died { at: Position },
}

/// Per-frame view handed to the renderer (by value)
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub creature: Vec<Position>,
    pub food: Position,
    pub walls: Vec<Position>,
    pub key: Option<Position>,
    pub door: Option<Position>,
    pub sanity: f32,
    pub objective: Objective,
}

/// Complete per-level simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current level (1-based)
    pub level: u32,
    /// Creature body, head first
    pub creature: VecDeque<Position>,
    pub food: Position,
    pub key: Option<Position>,
    pub door: Option<Position>,
    pub walls: Walls,
    pub objective: Objective,
    pub score: u64,
    /// Sanity in [0, 100]
    pub sanity: f32,
    /// Meat devoured this attempt
    pub devoured: u32,
    /// Meat needed before the key appears
    pub required: u32,
    /// Moves attempted this run (idle ticks do not count)
    pub moves: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Start a fresh attempt at `level`
    pub fn new(level: u32, seed: u64) -> Self {
        let level = level.max(1);
        let mut rng = Pcg32::seed_from_u64(seed);
        let walls = build_level(level, &mut rng);
        let creature: VecDeque<Position> = START_SEGMENTS.iter().copied().collect();

        let mut state = Self {
            level,
            creature,
            food: START_SEGMENTS[0],
            key: None,
            door: None,
            walls,
            objective: Objective::Consume,
            score: 0,
            sanity: MAX_SANITY,
            devoured: 0,
            required: meat_required(level),
            moves: 0,
            events: Vec::new(),
            rng,
        };
        state.respawn_food();

        log::debug!(
            "Level {} ready: {} walls, food at ({}, {})",
            level,
            state.walls.len(),
            state.food.x,
            state.food.y
        );
        state
    }

    pub fn head(&self) -> Position {
        self.creature[0]
    }

    /// Cells an item may not spawn on
    fn occupied_items(&self) -> Vec<Position> {
        let mut items = vec![self.food];
        items.extend(self.key);
        items.extend(self.door);
        items
    }

    fn free_cell(&mut self) -> Position {
        let items = self.occupied_items();
        find_free_cell(&mut self.rng, &self.walls, &self.creature, &items)
    }

    /// Move the meat to a fresh free cell
    pub fn respawn_food(&mut self) {
        // The current food cell is about to be vacated, so it is not an obstacle
        let mut items = Vec::with_capacity(2);
        items.extend(self.key);
        items.extend(self.door);
        self.food = find_free_cell(&mut self.rng, &self.walls, &self.creature, &items);
    }

    pub fn spawn_key(&mut self) -> Position {
        let at = self.free_cell();
        self.key = Some(at);
        at
    }

    pub fn spawn_door(&mut self) -> Position {
        let at = self.free_cell();
        self.door = Some(at);
        at
    }

    /// Move the objective forward; never regresses
    pub fn advance_objective(&mut self, next: Objective) {
        if next > self.objective {
            self.objective = next;
        }
    }

    /// Per-tick sanity drain (floored at 0)
    pub fn decay_sanity(&mut self) {
        self.sanity = (self.sanity - SANITY_DECAY_PER_TICK).max(0.0);
    }

    /// Restore sanity, capped at the maximum
    pub fn restore_sanity(&mut self, amount: f32) {
        self.sanity = (self.sanity + amount).min(MAX_SANITY);
    }

    /// Hard reset of sanity (jumpscare recovery)
    pub fn set_sanity(&mut self, value: f32) {
        self.sanity = value.clamp(0.0, MAX_SANITY);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot for the render pipeline
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            creature: self.creature.iter().copied().collect(),
            food: self.food,
            walls: self.walls.cells().to_vec(),
            key: self.key,
            door: self.door,
            sanity: self.sanity,
            objective: self.objective,
        }
    }

    /// Short objective text for the HUD
    pub fn objective_label(&self) -> String {
        match self.objective {
            Objective::Consume => format!("Devour the meat ({}/{})", self.devoured, self.required),
            Objective::Retrieve => "Find the key".to_string(),
            Objective::Exit => "Escape through the door".to_string(),
        }
    }
}

/// Meat quota for a level
pub fn meat_required(level: u32) -> u32 {
    3 + level
}
