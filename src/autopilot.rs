//! Demo autopilot
//!
//! Greedy steering toward whatever the current objective needs (meat, key
//! or door). Moves that are fatal or that lead into a pocket smaller than the
//! body are avoided when an alternative exists.

use std::collections::{HashSet, VecDeque};

use crate::sim::{Direction, GameState, MoveCheck, Objective, Position, check_move};

/// Cell the creature should head for
pub fn target(state: &GameState) -> Position {
    match state.objective {
        Objective::Consume => state.food,
        Objective::Retrieve => state.key.unwrap_or(state.food),
        Objective::Exit => state.door.unwrap_or(state.food),
    }
}

fn manhattan(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Open cells reachable from `from`, counted up to `limit`
fn open_space(state: &GameState, from: Position, limit: usize) -> usize {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        if seen.len() >= limit {
            break;
        }
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if seen.contains(&next) {
                continue;
            }
            if check_move(next, &state.walls, &state.creature, state.door) == MoveCheck::Fatal {
                continue;
            }
            seen.insert(next);
            queue.push_back(next);
        }
    }
    seen.len()
}

/// Direction the head last moved in, read from the neck segment
pub fn heading(state: &GameState) -> Option<Direction> {
    let head = state.head();
    let neck = *state.creature.get(1)?;
    Direction::ALL.into_iter().find(|&dir| neck.step(dir) == head)
}

/// Pick the next direction. `heading` is the direction last moved in.
pub fn choose_direction(state: &GameState, heading: Option<Direction>) -> Option<Direction> {
    let head = state.head();
    let goal = target(state);
    let room_needed = state.creature.len() + 2;

    Direction::ALL
        .into_iter()
        .filter(|&dir| heading != Some(dir.opposite()))
        .filter_map(|dir| {
            let next = head.step(dir);
            match check_move(next, &state.walls, &state.creature, state.door) {
                MoveCheck::Fatal => None,
                MoveCheck::Exit => Some((dir, false, -1)),
                MoveCheck::Clear => {
                    let cramped = open_space(state, next, room_needed) < room_needed;
                    Some((dir, cramped, manhattan(next, goal)))
                }
            }
        })
        .min_by_key(|&(_, cramped, dist)| (cramped, dist))
        .map(|(dir, _, _)| dir)
        .or(heading)
}
