//! Simulation tick
//!
//! Advances the creature one cell and resolves what it runs into. Cues,
//! particles, high scores and screen changes are left to the caller, which
//! reads the events pushed onto `GameState::events`.

use super::collision::{MoveCheck, check_move};
use super::state::{GameEvent, GameState, Objective};
use crate::consts::*;
use crate::input::InputSource;

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No direction held; nothing moved
    Idle,
    /// Creature moved (possibly eating something)
    Moved,
    /// Door reached
    Won,
    /// Boundary, wall or body hit
    Died,
}

/// Advance the game state by one fixed step
pub fn tick(state: &mut GameState, input: &mut dyn InputSource) -> TickOutcome {
    let Some(dir) = input.current_direction() else {
        return TickOutcome::Idle;
    };
    input.acknowledge();
    state.moves += 1;
    state.events.push(GameEvent::Moved);

    let candidate = state.head().step(dir);

    match check_move(candidate, &state.walls, &state.creature, state.door) {
        MoveCheck::Exit => {
            state.events.push(GameEvent::ReachedDoor);
            return TickOutcome::Won;
        }
        MoveCheck::Fatal => {
            state.events.push(GameEvent::Died { at: candidate });
            return TickOutcome::Died;
        }
        MoveCheck::Clear => {}
    }

    state.creature.push_front(candidate);

    if candidate == state.food {
        eat_food(state);
    } else if state.key == Some(candidate) {
        take_key(state);
    } else if state.door == Some(candidate) {
        state.events.push(GameEvent::ReachedDoor);
        return TickOutcome::Won;
    } else {
        state.creature.pop_back();
    }

    TickOutcome::Moved
}

fn eat_food(state: &mut GameState) {
    let at = state.food;
    state.score += FOOD_SCORE;
    state.restore_sanity(FOOD_SANITY_RESTORE);
    state.devoured += 1;
    state.events.push(GameEvent::AteFood { at });

    if state.objective == Objective::Consume && state.devoured >= state.required {
        state.advance_objective(Objective::Retrieve);
        let key = state.spawn_key();
        log::info!("Meat quota met, key at ({}, {})", key.x, key.y);
        state.events.push(GameEvent::KeySpawned { at: key });
    }

    state.respawn_food();
}

fn take_key(state: &mut GameState) {
    state.key = None;
    state.advance_objective(Objective::Exit);
    let door = state.spawn_door();
    log::info!("Key taken, door at ({}, {})", door.x, door.y);
    state.events.push(GameEvent::KeyTaken);
    state.events.push(GameEvent::DoorSpawned { at: door });
    state.score += KEY_SCORE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DirectionalInput;
    use crate::sim::grid::{Direction, Position, Walls};
    use std::collections::VecDeque;

    fn open_level() -> GameState {
        let mut state = GameState::new(1, 12345);
        state.walls = Walls::default();
        state.food = Position::new(30, 20);
        state
    }

    fn pressed(dir: Direction) -> DirectionalInput {
        let mut input = DirectionalInput::new();
        input.press(dir);
        input
    }

    #[test]
    fn test_idle_without_direction() {
        let mut state = open_level();
        let before = state.creature.clone();
        let mut input = DirectionalInput::new();
        assert_eq!(tick(&mut state, &mut input), TickOutcome::Idle);
        assert_eq!(state.creature, before);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut state = open_level();
        let mut input = pressed(Direction::Right);
        assert_eq!(tick(&mut state, &mut input), TickOutcome::Moved);
        assert_eq!(state.head(), Position::new(11, 10));
        assert_eq!(state.creature.len(), 3);
        assert_eq!(state.creature.back(), Some(&Position::new(9, 10)));
    }

    #[test]
    fn test_eating_scores_and_restores_sanity() {
        let mut state = open_level();
        state.food = Position::new(11, 10);
        state.sanity = 40.0;
        let mut input = pressed(Direction::Right);

        tick(&mut state, &mut input);
        assert_eq!(state.score, 10);
        assert_eq!(state.sanity, 55.0);
        assert_eq!(state.creature.len(), 4);
        assert_eq!(state.devoured, 1);
        assert_ne!(state.food, Position::new(11, 10));
        assert!(!state.creature.contains(&state.food));
        assert!(!state.walls.contains(state.food));
        assert!(state.events.contains(&GameEvent::AteFood { at: Position::new(11, 10) }));
    }

    #[test]
    fn test_eating_caps_sanity() {
        let mut state = open_level();
        state.food = Position::new(11, 10);
        state.sanity = 95.0;
        tick(&mut state, &mut pressed(Direction::Right));
        assert_eq!(state.sanity, MAX_SANITY);
    }

    #[test]
    fn test_fourth_meat_on_level_one_spawns_key() {
        let mut state = open_level();
        assert_eq!(state.required, 4);
        let mut input = pressed(Direction::Right);

        for i in 0..4 {
            state.food = state.head().step(Direction::Right);
            tick(&mut state, &mut input);
            if i < 3 {
                assert_eq!(state.objective, Objective::Consume);
                assert!(state.key.is_none());
            }
        }

        assert_eq!(state.objective, Objective::Retrieve);
        let key = state.key.expect("key spawned");
        assert!(!state.walls.contains(key));
        assert!(!state.creature.contains(&key));
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::KeySpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_key_opens_door() {
        let mut state = open_level();
        state.objective = Objective::Retrieve;
        state.key = Some(Position::new(11, 10));
        tick(&mut state, &mut pressed(Direction::Right));

        assert!(state.key.is_none());
        assert_eq!(state.objective, Objective::Exit);
        assert!(state.door.is_some());
        assert_eq!(state.score, KEY_SCORE);
        assert_eq!(state.creature.len(), 4);
    }

    #[test]
    fn test_door_on_open_cell_wins() {
        let mut state = open_level();
        state.objective = Objective::Exit;
        state.door = Some(Position::new(11, 10));
        assert_eq!(tick(&mut state, &mut pressed(Direction::Right)), TickOutcome::Won);
    }

    #[test]
    fn test_door_inside_wall_still_wins() {
        let mut state = open_level();
        state.walls = Walls::from_cells(vec![Position::new(11, 10)]);
        state.door = Some(Position::new(11, 10));
        assert_eq!(tick(&mut state, &mut pressed(Direction::Right)), TickOutcome::Won);
    }

    #[test]
    fn test_leaving_grid_is_death() {
        let mut state = open_level();
        state.creature = VecDeque::from(vec![Position::new(0, 5), Position::new(1, 5)]);
        let outcome = tick(&mut state, &mut pressed(Direction::Left));
        assert_eq!(outcome, TickOutcome::Died);
        assert!(state.events.contains(&GameEvent::Died { at: Position::new(-1, 5) }));
        // Body untouched on death
        assert_eq!(state.head(), Position::new(0, 5));
    }

    #[test]
    fn test_wall_is_death() {
        let mut state = open_level();
        state.walls = Walls::from_cells(vec![Position::new(10, 9)]);
        assert_eq!(tick(&mut state, &mut pressed(Direction::Up)), TickOutcome::Died);
    }

    #[test]
    fn test_food_and_key_next_to_walls_never_kill() {
        let mut state = open_level();
        state.walls = Walls::from_cells(vec![Position::new(11, 9), Position::new(11, 11)]);
        state.food = Position::new(11, 10);
        assert_eq!(tick(&mut state, &mut pressed(Direction::Right)), TickOutcome::Moved);

        state.objective = Objective::Retrieve;
        state.food = Position::new(30, 20);
        state.key = Some(state.head().step(Direction::Right));
        assert_eq!(tick(&mut state, &mut pressed(Direction::Right)), TickOutcome::Moved);
        assert_eq!(state.objective, Objective::Exit);
    }

    #[test]
    fn test_acknowledge_called_on_move() {
        let mut state = open_level();
        let mut input = pressed(Direction::Up);
        tick(&mut state, &mut input);
        // Processed Up, so Down is now a reversal
        input.press(Direction::Down);
        assert_eq!(input.current_direction(), Some(Direction::Up));
    }

    #[test]
    fn test_objective_monotonic_over_long_run() {
        let mut state = open_level();
        let mut input = DirectionalInput::new();
        let mut last = state.objective;
        let path = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        for step in 0..200 {
            let dir = path[(step / 5) % 4];
            input.press(dir);
            if step % 2 == 0 {
                state.food = state.head().step(input.current_direction().unwrap());
            }
            if tick(&mut state, &mut input) != TickOutcome::Moved {
                break;
            }
            assert!(state.objective >= last);
            last = state.objective;
        }
    }
}
