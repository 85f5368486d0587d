use num_enum::{IntoPrimitive, TryFromPrimitive};
use static_assertions::const_assert_eq;

use crate::grid::Point;

/// A 4-way compass direction. North is toward row 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Direction {
    /// Every direction, in the order candidate moves are considered.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns true if `other` turns a quarter away from this direction.
    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// The (dx, dy) offset of a single step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Offsets `point` by one cell in this direction.
    pub fn step(self, point: Point) -> Point {
        self.step_by(point, 1)
    }

    /// Offsets `point` by `cells` cells in this direction.
    pub fn step_by(self, point: Point, cells: i32) -> Point {
        let (dx, dy) = self.delta();
        Point::new(point.x + dx * cells, point.y + dy * cells)
    }
}

/// Enum for board cell values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Cell {
    Blank = 0,
    Wall = 1,
    Dot = 2,
    PowerPellet = 3,
}

impl Cell {
    /// Returns true if the player can still eat something here.
    pub fn is_edible(self) -> bool {
        matches!(self, Cell::Dot | Cell::PowerPellet)
    }
}

// game params
pub const STARTING_LIVES: u8 = 3;
pub const DOT_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
pub const POWER_PELLET_COUNT: usize = 4;
pub const MAX_GHOSTS: usize = 4;
/// Points for each ghost eaten within a single fleeing window, in order.
pub const GHOST_EAT_SCORES: [u32; MAX_GHOSTS] = [200, 400, 800, 1600];
/// Awarded when every ghost has been eaten in each of the level's fleeing windows.
pub const ALL_GHOSTS_EATEN_BONUS: u32 = 12_000;
pub const ALL_GHOSTS_EATEN_ROUNDS: u32 = POWER_PELLET_COUNT as u32;
pub const DEFAULT_BONUS_LIFE_THRESHOLD: u32 = 10_000;
/// The kill screen triggers with probability 1 / KILL_SCREEN_ODDS per level.
pub const KILL_SCREEN_ODDS: u32 = 256;

const_assert_eq!(GHOST_EAT_SCORES.len(), MAX_GHOSTS);

// timing, in ticks
pub const FLEE_TICKS: u32 = 240;
pub const FLEE_BLINK_THRESHOLD: u32 = 80;
pub const FLEE_BLINK_INTERVAL: u32 = 10;
pub const DEATH_ANIMATION_TICKS: u32 = 60;
pub const FRUIT_LIFETIME_TICKS: u32 = 300;
/// Dots eaten in a level at which the fruit shows up.
pub const FRUIT_DOTS_EATEN: [u32; 2] = [70, 170];

// speeds, in cells per tick
pub const PLAYER_SPEED: f32 = 0.25;
pub const GHOST_SPEED: f32 = 0.2;
pub const GHOST_FLEEING_SPEED: f32 = 0.125;
pub const GHOST_EYES_SPEED: f32 = 0.5;
/// Relative weight of keeping the current heading in a random walk.
pub const RANDOM_WALK_STRAIGHT_WEIGHT: u32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
            assert!(!direction.is_perpendicular(direction.opposite()));
        }
    }

    #[test]
    fn step_offsets_grid_coordinates() {
        let origin = Point::new(5, 5);
        assert_eq!(Direction::North.step(origin), Point::new(5, 4));
        assert_eq!(Direction::South.step(origin), Point::new(5, 6));
        assert_eq!(Direction::East.step(origin), Point::new(6, 5));
        assert_eq!(Direction::West.step_by(origin, 3), Point::new(2, 5));
    }

    #[test]
    fn direction_round_trips_through_primitive() {
        assert_eq!(Direction::try_from(2u8).unwrap(), Direction::East);
        assert!(Direction::try_from(4u8).is_err());
        assert_eq!(u8::from(Direction::West), 3);
    }
}
