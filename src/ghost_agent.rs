use arrayvec::ArrayVec;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rand::{seq::SliceRandom, Rng};

use crate::{
    actor::Actor,
    grid::{Board, Point},
    variables::{
        Direction, FLEE_BLINK_INTERVAL, FLEE_BLINK_THRESHOLD, FLEE_TICKS, GHOST_EYES_SPEED,
        GHOST_FLEEING_SPEED, GHOST_SPEED, RANDOM_WALK_STRAIGHT_WEIGHT,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum GhostKind {
    Blinky = 0,
    Pinky = 1,
    Inky = 2,
    Clyde = 3,
}

impl GhostKind {
    /// Ghosts are added to a game in this order.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GhostState {
    /// Chasing the player; lethal on contact.
    Hunting,
    /// Vulnerable after a power pellet; the player can eat it.
    Fleeing,
    /// Eaten during the current fleeing window; still lethal on contact.
    EyesOnly,
}

impl GhostState {
    fn speed(self) -> f32 {
        match self {
            GhostState::Hunting => GHOST_SPEED,
            GhostState::Fleeing => GHOST_FLEEING_SPEED,
            GhostState::EyesOnly => GHOST_EYES_SPEED,
        }
    }
}

/// Where the player is, captured before any ghost steers this tick.
#[derive(Clone, Copy, Debug)]
pub struct ChaseTargets {
    pub player_position: Point,
    pub player_heading: Option<Direction>,
    pub blinky_position: Option<Point>,
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub actor: Actor,
    // The kind of ghost determines its movement behavior.
    kind: GhostKind,
    state: GhostState,
    flee_ticks: u32,
    blinking: bool,
}

impl Ghost {
    pub fn new(kind: GhostKind) -> Self {
        Self {
            actor: Actor::new(GHOST_SPEED),
            kind,
            state: GhostState::Hunting,
            flee_ticks: 0,
            blinking: false,
        }
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn state(&self) -> GhostState {
        self.state
    }

    /// Ticks left before the current fleeing window closes.
    pub fn flee_ticks(&self) -> u32 {
        self.flee_ticks
    }

    /// Whether a fleeing ghost that is about to recover should currently be
    /// drawn in its alternate color.
    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    /// Moves the ghost into `state`.
    ///
    /// Fleeing (re)starts the fleeing window. EyesOnly keeps whatever is
    /// left of it. Hunting clears it.
    pub fn set_state(&mut self, state: GhostState) {
        match state {
            GhostState::Fleeing => self.flee_ticks = FLEE_TICKS,
            GhostState::EyesOnly => {}
            GhostState::Hunting => self.flee_ticks = 0,
        }
        self.blinking = false;
        self.state = state;
        self.actor.set_speed(state.speed());
    }

    /// Advances one tick. Returns true if the ghost entered a new cell.
    pub fn tick(&mut self) -> bool {
        if self.state != GhostState::Hunting {
            self.flee_ticks = self.flee_ticks.saturating_sub(1);
            if self.flee_ticks == 0 {
                self.set_state(GhostState::Hunting);
            } else if self.state == GhostState::Fleeing
                && self.flee_ticks < FLEE_BLINK_THRESHOLD
                && self.flee_ticks % FLEE_BLINK_INTERVAL == 0
            {
                self.blinking = !self.blinking;
            }
        }
        self.actor.tick()
    }

    /// Puts the ghost back at `spawn`, hunting, and heading somewhere valid.
    pub fn new_life(&mut self, board: &Board, spawn: Point, rng: &mut impl Rng) {
        self.set_state(GhostState::Hunting);
        let heading = board.random_direction(spawn, None, rng);
        self.actor.respawn(spawn, heading);
    }

    /// Returns the direction to leave the current cell by.
    pub fn choose_next_direction(
        &self,
        board: &Board,
        targets: &ChaseTargets,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        if self.state != GhostState::Hunting {
            return self.random_walk(board, rng);
        }
        match self.kind {
            GhostKind::Blinky => self.move_toward(board, targets.player_position),
            GhostKind::Pinky => self.move_toward(board, pinky_target(targets)),
            GhostKind::Inky => self.move_toward(board, inky_target(targets)),
            GhostKind::Clyde => self.random_walk(board, rng),
        }
    }

    /// Valid moves out of the current cell, excluding reversal unless there
    /// is no other way out.
    fn possible_moves(&self, board: &Board) -> ArrayVec<Direction, 4> {
        let valid = board.valid_directions(self.actor.position());
        let reverse = self.actor.current_direction().map(Direction::opposite);
        let forward: ArrayVec<Direction, 4> = valid
            .iter()
            .copied()
            .filter(|&direction| Some(direction) != reverse)
            .collect();
        if forward.is_empty() {
            valid
        } else {
            forward
        }
    }

    /// Moves to the cell that is the closest to the target by straight-line distance,
    /// NOT the cell that is the closest to the target by path length.
    fn move_toward(&self, board: &Board, target: Point) -> Option<Direction> {
        let position = self.actor.position();
        self.possible_moves(board)
            .into_iter()
            .min_by_key(|d| d.step(position).squared_distance(target))
    }

    /// Picks a random non-reversing move, favoring the current heading. In a
    /// corridor the only such move is straight on.
    fn random_walk(&self, board: &Board, rng: &mut impl Rng) -> Option<Direction> {
        let heading = self.actor.current_direction();
        self.possible_moves(board)
            .choose_weighted(rng, |&direction| {
                if Some(direction) == heading {
                    RANDOM_WALK_STRAIGHT_WEIGHT
                } else {
                    1
                }
            })
            .ok()
            .copied()
    }
}

/// Four cells ahead of the player.
fn pinky_target(targets: &ChaseTargets) -> Point {
    match targets.player_heading {
        Some(heading) => heading.step_by(targets.player_position, 4),
        None => targets.player_position,
    }
}

/// Two cells ahead of the player, then doubled away from Blinky.
fn inky_target(targets: &ChaseTargets) -> Point {
    let pivot = match targets.player_heading {
        Some(heading) => heading.step_by(targets.player_position, 2),
        None => targets.player_position,
    };
    match targets.blinky_position {
        Some(blinky) => Point::new(2 * pivot.x - blinky.x, 2 * pivot.y - blinky.y),
        None => targets.player_position,
    }
}
