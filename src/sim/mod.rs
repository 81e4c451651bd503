//! Simulation core
//!
//! All grid gameplay lives here. No rendering, audio or platform
//! dependencies; randomness comes from a seeded PCG stream owned by the state.

pub mod collision;
pub mod grid;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{MoveCheck, check_move, find_free_cell, is_solid};
pub use grid::{Direction, Position, Walls};
pub use level::{LevelPlan, build_level, generate_walls, plan_for_level};
pub use state::{
    GameEvent, GameState, Objective, RenderSnapshot, START_SEGMENTS, meat_required,
};
pub use tick::{TickOutcome, tick};
