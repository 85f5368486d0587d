use std::collections::{HashSet, VecDeque};

use arrayvec::ArrayVec;

use crate::{
    grid::{Board, Point},
    variables::{Cell, Direction},
};

/// One frontier entry of the nearest-dot search: where the branch is, which
/// way it is heading, and which move out of the start cell began it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchVector {
    pub position: Point,
    pub direction: Direction,
    /// The first move taken from the start; None only for the start itself.
    pub initial_direction: Option<Direction>,
    pub step_count: u32,
}

impl SearchVector {
    fn origin(position: Point, direction: Direction) -> Self {
        Self {
            position,
            direction,
            initial_direction: None,
            step_count: 0,
        }
    }

    /// The vector one step further along `direction`.
    #[must_use]
    fn advance(&self, direction: Direction) -> Self {
        Self {
            position: direction.step(self.position),
            direction,
            initial_direction: self.initial_direction.or(Some(direction)),
            step_count: self.step_count + 1,
        }
    }

    /// Straight ahead first, then the other three in the usual order.
    fn candidate_directions(&self) -> ArrayVec<Direction, 4> {
        let mut directions = ArrayVec::new();
        directions.push(self.direction);
        directions.extend(Direction::ALL.into_iter().filter(|&d| d != self.direction));
        directions
    }
}

/// Performs a breadth-first search from `start` for the closest cell that
/// still holds a dot or power pellet, never passing through a cell in
/// `blocked`. Returns the first move of the path to it, or None if no such
/// cell is reachable.
pub fn nearest_dot_direction(
    board: &Board,
    start: Point,
    heading: Direction,
    blocked: &[Point],
) -> Option<Direction> {
    let mut queue = VecDeque::from([SearchVector::origin(start, heading)]);
    let mut visited = HashSet::from([board.position_hash(start)]);
    while let Some(vector) = queue.pop_front() {
        for direction in vector.candidate_directions() {
            let candidate = vector.advance(direction);
            if !board.is_valid_position(candidate.position)
                || !visited.insert(board.position_hash(candidate.position))
                || blocked.contains(&candidate.position)
            {
                continue;
            }
            if board.get(candidate.position).is_some_and(Cell::is_edible) {
                return candidate.initial_direction;
            }
            queue.push_back(candidate);
        }
    }
    None
}
