//! Collision classification and free-cell sampling
//!
//! Solidity is only ever walls, body segments and the grid boundary. Food,
//! key and door are pass-through cells and can never kill the creature.

use std::collections::VecDeque;

use rand::Rng;

use super::grid::{Position, Walls};
use crate::consts::{GRID_HEIGHT, GRID_WIDTH, SPAWN_ATTEMPTS};

/// Result of checking a candidate head cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// Cell is open; the move proceeds
    Clear,
    /// Cell is blocked but holds the door: the level is won
    Exit,
    /// Cell is blocked: out of bounds, wall or body
    Fatal,
}

/// True for walls and body segments. Bounds are checked separately.
pub fn is_solid(pos: Position, walls: &Walls, creature: &VecDeque<Position>) -> bool {
    walls.contains(pos) || creature.contains(&pos)
}

/// Classify the cell the head wants to enter
pub fn check_move(
    candidate: Position,
    walls: &Walls,
    creature: &VecDeque<Position>,
    door: Option<Position>,
) -> MoveCheck {
    let blocked = !candidate.in_bounds() || is_solid(candidate, walls, creature);
    if !blocked {
        return MoveCheck::Clear;
    }
    if door == Some(candidate) {
        MoveCheck::Exit
    } else {
        MoveCheck::Fatal
    }
}

/// Rejection-sample a uniformly random free cell.
///
/// A cell is free when it is not a wall, not a body segment and not one of
/// `items`. Sampling is capped at `SPAWN_ATTEMPTS`; past the cap the first
/// free cell in row-major order is used, and if the grid is completely full
/// the first attempted cell is returned.
pub fn find_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    walls: &Walls,
    creature: &VecDeque<Position>,
    items: &[Position],
) -> Position {
    let is_free =
        |p: Position| !is_solid(p, walls, creature) && !items.contains(&p);

    let mut first_attempt = None;
    for _ in 0..SPAWN_ATTEMPTS {
        let candidate = Position::new(
            rng.random_range(0..GRID_WIDTH),
            rng.random_range(0..GRID_HEIGHT),
        );
        first_attempt.get_or_insert(candidate);
        if is_free(candidate) {
            return candidate;
        }
    }

    log::warn!("Spawn sampling exhausted after {} draws, scanning grid", SPAWN_ATTEMPTS);
    (0..GRID_HEIGHT)
        .flat_map(|y| (0..GRID_WIDTH).map(move |x| Position::new(x, y)))
        .find(|&p| is_free(p))
        .or(first_attempt)
        .unwrap_or(Position::new(0, 0))
}
