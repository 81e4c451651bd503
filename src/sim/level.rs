//! Procedural wall generation
//!
//! Each level tier unlocks a richer shape vocabulary. Shapes append to one
//! shared list without deduplication; cells that fall off the grid are
//! clipped, and anything covering the starting body is filtered out last.

use rand::Rng;

use super::grid::{Position, Walls};
use super::state::START_SEGMENTS;
use crate::consts::{GRID_HEIGHT, GRID_WIDTH};

/// How many of each shape a level receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelPlan {
    pub scatter: u32,
    pub lines: u32,
    pub corners: u32,
    pub boxes: u32,
    pub crosses: u32,
}

/// Shape budget for a 1-based level index
pub fn plan_for_level(level: u32) -> LevelPlan {
    let level = level.max(1);
    match level {
        1..=3 => LevelPlan {
            scatter: 10 + 3 * level,
            ..Default::default()
        },
        4..=6 => LevelPlan {
            scatter: 4 + level,
            lines: level - 1,
            ..Default::default()
        },
        7..=9 => LevelPlan {
            scatter: 6,
            lines: 3,
            corners: level - 5,
            ..Default::default()
        },
        10..=12 => LevelPlan {
            scatter: 6,
            corners: 3,
            boxes: level - 8,
            ..Default::default()
        },
        13..=15 => LevelPlan {
            lines: 3,
            boxes: 2,
            crosses: level - 11,
            ..Default::default()
        },
        _ => LevelPlan {
            scatter: 12,
            lines: 4,
            corners: 3,
            boxes: 2,
            crosses: 2 + ((level - 16) / 2).min(4),
        },
    }
}

/// Generate the raw wall list for a level (before the start-area filter)
pub fn generate_walls<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<Position> {
    let plan = plan_for_level(level);
    let mut walls = Vec::new();

    for _ in 0..plan.boxes {
        push_box(&mut walls, rng);
    }
    for _ in 0..plan.crosses {
        push_cross(&mut walls, rng);
    }
    for _ in 0..plan.corners {
        push_corner(&mut walls, rng);
    }
    for _ in 0..plan.lines {
        push_line(&mut walls, rng);
    }
    for _ in 0..plan.scatter {
        push_scatter(&mut walls, rng);
    }

    walls
}

/// Generate a level's walls with the starting body kept clear
pub fn build_level<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Walls {
    let walls = generate_walls(level, rng)
        .into_iter()
        .filter(|w| !START_SEGMENTS.contains(w))
        .collect();
    Walls::from_cells(walls)
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(
        rng.random_range(0..GRID_WIDTH),
        rng.random_range(0..GRID_HEIGHT),
    )
}

fn push_clipped(walls: &mut Vec<Position>, p: Position) {
    if p.in_bounds() {
        walls.push(p);
    }
}

/// Single random cell
fn push_scatter<R: Rng + ?Sized>(walls: &mut Vec<Position>, rng: &mut R) {
    walls.push(random_cell(rng));
}

/// Straight run of 3-8 cells, horizontal or vertical
fn push_line<R: Rng + ?Sized>(walls: &mut Vec<Position>, rng: &mut R) {
    let start = random_cell(rng);
    let len = rng.random_range(3..=8);
    let horizontal = rng.random_bool(0.5);
    for i in 0..len {
        let p = if horizontal {
            Position::new(start.x + i, start.y)
        } else {
            Position::new(start.x, start.y + i)
        };
        push_clipped(walls, p);
    }
}

/// Two arms of 3-5 cells meeting at a corner, in one of four orientations
fn push_corner<R: Rng + ?Sized>(walls: &mut Vec<Position>, rng: &mut R) {
    let pivot = random_cell(rng);
    let arm_x = rng.random_range(3..=5);
    let arm_y = rng.random_range(3..=5);
    let sx = if rng.random_bool(0.5) { 1 } else { -1 };
    let sy = if rng.random_bool(0.5) { 1 } else { -1 };

    push_clipped(walls, pivot);
    for i in 1..arm_x {
        push_clipped(walls, Position::new(pivot.x + sx * i, pivot.y));
    }
    for i in 1..arm_y {
        push_clipped(walls, Position::new(pivot.x, pivot.y + sy * i));
    }
}

/// Hollow rectangle outline, 4-7 cells per side
fn push_box<R: Rng + ?Sized>(walls: &mut Vec<Position>, rng: &mut R) {
    let origin = random_cell(rng);
    let w = rng.random_range(4..=7);
    let h = rng.random_range(4..=7);
    for dx in 0..w {
        push_clipped(walls, Position::new(origin.x + dx, origin.y));
        push_clipped(walls, Position::new(origin.x + dx, origin.y + h - 1));
    }
    for dy in 1..h - 1 {
        push_clipped(walls, Position::new(origin.x, origin.y + dy));
        push_clipped(walls, Position::new(origin.x + w - 1, origin.y + dy));
    }
}

/// Plus sign with arms of 1-3 cells
fn push_cross<R: Rng + ?Sized>(walls: &mut Vec<Position>, rng: &mut R) {
    let center = random_cell(rng);
    let arm = rng.random_range(1..=3);
    push_clipped(walls, center);
    for i in 1..=arm {
        push_clipped(walls, Position::new(center.x + i, center.y));
        push_clipped(walls, Position::new(center.x - i, center.y));
        push_clipped(walls, Position::new(center.x, center.y + i));
        push_clipped(walls, Position::new(center.x, center.y - i));
    }
}
