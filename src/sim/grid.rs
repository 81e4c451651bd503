//! Grid primitives: cell positions, movement directions and the wall set

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};

/// A cell on the play grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir` (may fall off the grid)
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether the cell lies inside [0, width) x [0, height)
    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH && self.y >= 0 && self.y < GRID_HEIGHT
    }

    /// Row-major index for in-bounds cells
    fn index(self) -> Option<usize> {
        self.in_bounds()
            .then(|| (self.y * GRID_WIDTH + self.x) as usize)
    }
}

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cell offset (screen coordinates, y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Immutable wall layout for one level.
///
/// Keeps the generated list as-is (duplicates included, they are harmless)
/// alongside an occupancy mask for constant-time lookups.
#[derive(Debug, Clone)]
pub struct Walls {
    cells: Vec<Position>,
    mask: Vec<bool>,
}

impl Default for Walls {
    fn default() -> Self {
        Self::from_cells(Vec::new())
    }
}

impl Walls {
    /// Build a wall set; out-of-bounds cells are dropped
    pub fn from_cells(cells: Vec<Position>) -> Self {
        let mut mask = vec![false; (GRID_WIDTH * GRID_HEIGHT) as usize];
        let cells: Vec<Position> = cells.into_iter().filter(|c| c.in_bounds()).collect();
        for cell in &cells {
            if let Some(i) = cell.index() {
                mask[i] = true;
            }
        }
        Self { cells, mask }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.index().map(|i| self.mask[i]).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
