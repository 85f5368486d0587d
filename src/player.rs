use num_enum::{IntoPrimitive, TryFromPrimitive};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    actor::Actor,
    error::{Result, WakkaError},
    grid::{Board, Point},
    search,
    variables::{Direction, DEATH_ANIMATION_TICKS, PLAYER_SPEED},
};

/// How the player picks a direction when no touch request applies.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "u8")]
#[repr(u8)]
pub enum StrategyMode {
    /// Graph-search pathfinding. Has no implementation and always fails.
    Pathfinding = 0,
    /// Head for the nearest dot found by breadth-first search.
    NearestDot = 1,
    /// Wander at random, never reversing unless forced.
    Random = 2,
}

impl StrategyMode {
    /// Parses a stored strategy setting.
    pub fn from_setting(value: i32) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(|value| Self::try_from_primitive(value).ok())
            .ok_or(WakkaError::InvalidStrategyMode(value))
    }
}

impl TryFrom<i32> for StrategyMode {
    type Error = WakkaError;

    fn try_from(value: i32) -> Result<Self> {
        Self::from_setting(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerState {
    Alive,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub actor: Actor,
    mode: StrategyMode,
    requested: Option<Direction>,
    state: PlayerState,
    death_ticks: u32,
}

impl Player {
    pub fn new(mode: StrategyMode) -> Self {
        Self {
            actor: Actor::new(PLAYER_SPEED),
            mode,
            requested: None,
            state: PlayerState::Alive,
            death_ticks: 0,
        }
    }

    pub fn mode(&self) -> StrategyMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StrategyMode) {
        self.mode = mode;
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    /// Ticks spent in the death animation so far.
    pub fn death_ticks(&self) -> u32 {
        self.death_ticks
    }

    pub fn is_death_animation_finished(&self) -> bool {
        self.is_dead() && self.death_ticks >= DEATH_ANIMATION_TICKS
    }

    pub fn requested_direction(&self) -> Option<Direction> {
        self.requested
    }

    /// Records a direction the user asked for. It takes priority over the
    /// strategy whenever it is possible.
    pub fn request_direction(&mut self, direction: Direction) {
        self.requested = Some(direction);
    }

    /// Advances one tick. Returns true if the player entered a new cell.
    pub fn tick(&mut self) -> bool {
        match self.state {
            PlayerState::Alive => self.actor.tick(),
            PlayerState::Dead => {
                self.death_ticks += 1;
                false
            }
        }
    }

    pub fn die(&mut self) {
        self.state = PlayerState::Dead;
        self.death_ticks = 0;
        self.actor.set_next_direction(None);
    }

    /// Brings the player back to life at `spawn`, heading somewhere valid.
    pub fn new_life(&mut self, board: &Board, spawn: Point, rng: &mut impl Rng) {
        self.state = PlayerState::Alive;
        self.death_ticks = 0;
        self.requested = None;
        let heading = board.random_direction(spawn, None, rng);
        self.actor.respawn(spawn, heading);
    }

    /// Chooses the direction to leave the current cell by.
    ///
    /// A possible touch request wins. Otherwise the strategy decides, and if
    /// it turned away from the current heading the stale request is dropped.
    pub fn choose_next_direction(
        &mut self,
        board: &Board,
        ghosts: &[Point],
        rng: &mut impl Rng,
    ) -> Result<Option<Direction>> {
        let position = self.actor.position();
        let heading = self.actor.current_direction();

        if let Some(requested) = self.requested {
            if board.is_valid_position(requested.step(position)) {
                return Ok(Some(requested));
            }
        }

        let next = match self.mode {
            StrategyMode::Pathfinding => {
                return Err(WakkaError::StrategyNotImplemented(self.mode));
            }
            StrategyMode::NearestDot => {
                let found = search::nearest_dot_direction(
                    board,
                    position,
                    heading.unwrap_or(Direction::North),
                    ghosts,
                );
                if found.is_none() {
                    trace!(?position, "no reachable dot, moving at random");
                }
                found.or_else(|| board.random_direction(position, None, rng))
            }
            StrategyMode::Random => {
                board.random_direction(position, heading.map(Direction::opposite), rng)
            }
        };

        if self.requested.is_some() && next != heading {
            self.requested = None;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::variables::Cell;

    fn board() -> Board {
        Board::new(2, 2, 2, 2)
    }

    fn player_at(mode: StrategyMode, position: Point, heading: Direction) -> Player {
        let mut player = Player::new(mode);
        player.actor.resize_to(10.0, 10.0);
        player.actor.set_position(position);
        player.actor.set_next_direction(Some(heading));
        player.actor.tick();
        player
    }

    #[test]
    fn strategy_setting_parses() {
        assert_eq!(
            StrategyMode::from_setting(1).unwrap(),
            StrategyMode::NearestDot
        );
        assert_eq!(StrategyMode::from_setting(2).unwrap(), StrategyMode::Random);
        assert!(matches!(
            StrategyMode::from_setting(3),
            Err(WakkaError::InvalidStrategyMode(3))
        ));
        assert!(matches!(
            StrategyMode::from_setting(-1),
            Err(WakkaError::InvalidStrategyMode(-1))
        ));
    }

    #[test]
    fn pathfinding_always_fails() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = player_at(StrategyMode::Pathfinding, Point::new(3, 0), Direction::East);
        let result = player.choose_next_direction(&board, &[], &mut rng);
        let Err(WakkaError::StrategyNotImplemented(mode)) = result else {
            panic!("expected an unimplemented strategy, got {result:?}");
        };
        assert_eq!(mode, StrategyMode::Pathfinding);
    }

    #[test]
    fn valid_request_overrides_strategy() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = player_at(StrategyMode::Pathfinding, Point::new(3, 0), Direction::East);
        player.request_direction(Direction::South);
        let next = player.choose_next_direction(&board, &[], &mut rng).unwrap();
        assert_eq!(next, Some(Direction::South));
        assert_eq!(player.requested_direction(), Some(Direction::South));
    }

    #[test]
    fn blocked_request_survives_going_straight() {
        let mut board = board();
        board.set(Point::new(0, 0), Cell::Blank);
        board.set(Point::new(2, 0), Cell::Blank);
        let mut rng = StdRng::seed_from_u64(1);
        // (1, 0) has a wall to the south and the nearest dot is further east
        let mut player = player_at(StrategyMode::NearestDot, Point::new(1, 0), Direction::East);
        player.request_direction(Direction::South);
        let next = player.choose_next_direction(&board, &[], &mut rng).unwrap();
        assert_eq!(next, Some(Direction::East));
        assert_eq!(player.requested_direction(), Some(Direction::South));
    }

    #[test]
    fn blocked_request_dropped_when_strategy_turns() {
        let mut board = board();
        for x in 0..7 {
            board.set(Point::new(x, 0), Cell::Blank);
        }
        let mut rng = StdRng::seed_from_u64(1);
        // heading east along an empty top row; nearest dot is back west then south
        board.set(Point::new(0, 1), Cell::Dot);
        let mut player = player_at(StrategyMode::NearestDot, Point::new(1, 0), Direction::East);
        player.request_direction(Direction::North);
        let next = player.choose_next_direction(&board, &[], &mut rng).unwrap();
        assert_eq!(next, Some(Direction::West));
        assert_eq!(player.requested_direction(), None);
    }

    #[test]
    fn random_strategy_does_not_reverse() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let mut player = player_at(StrategyMode::Random, Point::new(3, 3), Direction::East);
            let next = player.choose_next_direction(&board, &[], &mut rng).unwrap();
            assert_ne!(next, Some(Direction::West));
            assert!(next.is_some());
        }
    }

    #[test]
    fn dead_player_only_counts_animation() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = Player::new(StrategyMode::NearestDot);
        player.actor.resize_to(10.0, 10.0);
        player.new_life(&board, Point::new(3, 6), &mut rng);
        player.die();
        let position = player.actor.position();
        for _ in 0..DEATH_ANIMATION_TICKS {
            assert!(!player.tick());
        }
        assert_eq!(player.actor.position(), position);
        assert!(player.is_death_animation_finished());

        player.new_life(&board, Point::new(3, 6), &mut rng);
        assert_eq!(player.state(), PlayerState::Alive);
        assert!(player.actor.next_direction().is_some());
    }
}
