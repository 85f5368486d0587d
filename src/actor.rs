use crate::{grid::Point, variables::Direction};

/// A continuous location in surface (pixel) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

/// Motion state shared by every actor on the board.
///
/// An actor sits in one grid cell (`position`) while its `location` slides
/// through surface space at `speed` cells per tick. Crossing into a
/// neighboring cell updates `position` and is reported by [`Actor::tick`];
/// the owner then steers with [`Actor::set_next_direction`].
///
/// Directions form a triple: every tick promotes `current` to `last`, and a
/// pending `next` (set when the previous cell was entered) replaces
/// `current` and is cleared.
#[derive(Clone, Debug)]
pub struct Actor {
    position: Point,
    location: Location,
    cell_width: f32,
    cell_height: f32,
    speed: f32,
    last: Option<Direction>,
    current: Option<Direction>,
    next: Option<Direction>,
    tick_count: u64,
}

impl Actor {
    pub fn new(speed: f32) -> Self {
        Self {
            position: Point::default(),
            location: Location::default(),
            cell_width: 1.0,
            cell_height: 1.0,
            speed,
            last: None,
            current: None,
            next: None,
            tick_count: 0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last
    }

    pub fn current_direction(&self) -> Option<Direction> {
        self.current
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_moving(&self) -> bool {
        self.current.is_some() || self.next.is_some()
    }

    /// Updates the cell size and re-derives the location from the position.
    pub fn resize_to(&mut self, cell_width: f32, cell_height: f32) {
        self.cell_width = cell_width;
        self.cell_height = cell_height;
        self.location = self.rest_location();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Places the actor at rest in the middle of `position`.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.location = self.rest_location();
    }

    /// Moves the actor to `position` with no heading and `initial` queued up.
    pub fn respawn(&mut self, position: Point, initial: Option<Direction>) {
        self.set_position(position);
        self.last = None;
        self.current = None;
        self.next = initial;
    }

    /// Queues the direction to take on the next tick. `None` stops the actor
    /// in the middle of its current cell.
    pub fn set_next_direction(&mut self, next: Option<Direction>) {
        match next {
            Some(_) => self.next = next,
            None => {
                self.current = None;
                self.next = None;
                self.location = self.rest_location();
            }
        }
    }

    /// Returns true if both actors occupy the same grid cell.
    pub fn is_colliding_with(&self, other: &Actor) -> bool {
        self.position == other.position
    }

    /// Advances one step. Returns true if the actor crossed into a new cell.
    pub fn tick(&mut self) -> bool {
        self.tick_count += 1;

        self.last = self.current;
        if let Some(next) = self.next.take() {
            if self.current.map_or(true, |c| c.is_perpendicular(next)) {
                self.center_across(next);
            }
            self.current = Some(next);
        }

        let Some(direction) = self.current else {
            return false;
        };
        match direction {
            Direction::North => self.location.y -= self.speed * self.cell_height,
            Direction::South => self.location.y += self.speed * self.cell_height,
            Direction::East => self.location.x += self.speed * self.cell_width,
            Direction::West => self.location.x -= self.speed * self.cell_width,
        }

        let left = self.position.x as f32 * self.cell_width;
        let top = self.position.y as f32 * self.cell_height;
        if self.location.x < left {
            self.position.x -= 1;
        } else if self.location.x >= left + self.cell_width {
            self.position.x += 1;
        } else if self.location.y < top {
            self.position.y -= 1;
        } else if self.location.y >= top + self.cell_height {
            self.position.y += 1;
        } else {
            return false;
        }
        true
    }

    fn rest_location(&self) -> Location {
        Location {
            x: self.position.x as f32 * self.cell_width + self.cell_width / 2.0,
            y: self.position.y as f32 * self.cell_height + self.cell_height / 2.0,
        }
    }

    /// Snaps the axis perpendicular to `heading` onto the cell center.
    fn center_across(&mut self, heading: Direction) {
        let rest = self.rest_location();
        if heading.is_horizontal() {
            self.location.y = rest.y;
        } else {
            self.location.x = rest.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_at(x: i32, y: i32, speed: f32) -> Actor {
        let mut actor = Actor::new(speed);
        actor.resize_to(8.0, 16.0);
        actor.set_position(Point::new(x, y));
        actor
    }

    #[test]
    fn rest_location_is_cell_center() {
        let actor = actor_at(2, 3, 0.25);
        assert_eq!(actor.location(), Location { x: 20.0, y: 56.0 });
    }

    #[test]
    fn crosses_one_cell_per_boundary() {
        let mut actor = actor_at(2, 2, 0.25);
        actor.set_next_direction(Some(Direction::East));

        let crossings: Vec<bool> = (0..6).map(|_| actor.tick()).collect();
        // center is half a cell from the east edge
        assert_eq!(crossings, [false, true, false, false, false, true]);
        assert_eq!(actor.position(), Point::new(4, 2));
        assert_eq!(actor.tick_count(), 6);
    }

    #[test]
    fn keeps_heading_between_crossings() {
        let mut actor = actor_at(1, 1, 0.25);
        actor.set_next_direction(Some(Direction::South));
        actor.tick();
        assert_eq!(actor.next_direction(), None);
        assert_eq!(actor.current_direction(), Some(Direction::South));
        actor.tick();
        assert_eq!(actor.last_direction(), Some(Direction::South));
        assert_eq!(actor.current_direction(), Some(Direction::South));
    }

    #[test]
    fn turning_snaps_to_cell_center() {
        let mut actor = actor_at(1, 1, 0.25);
        actor.set_next_direction(Some(Direction::West));
        while !actor.tick() {}
        assert_eq!(actor.position(), Point::new(0, 1));

        actor.set_next_direction(Some(Direction::North));
        actor.tick();
        assert_eq!(actor.location().x, 4.0);
        assert_eq!(actor.last_direction(), Some(Direction::West));
        assert_eq!(actor.current_direction(), Some(Direction::North));
    }

    #[test]
    fn halting_parks_actor() {
        let mut actor = actor_at(1, 1, 0.25);
        actor.set_next_direction(Some(Direction::North));
        actor.tick();
        actor.set_next_direction(None);
        assert!(!actor.is_moving());
        assert!(!actor.tick());
        assert_eq!(actor.location(), Location { x: 12.0, y: 24.0 });
    }

    #[test]
    fn resize_keeps_position() {
        let mut actor = actor_at(3, 1, 0.25);
        actor.set_next_direction(Some(Direction::East));
        actor.tick();
        actor.resize_to(10.0, 10.0);
        assert_eq!(actor.position(), Point::new(3, 1));
        assert_eq!(actor.location(), Location { x: 35.0, y: 15.0 });
    }

    #[test]
    fn collision_is_cell_equality() {
        let mut a = actor_at(2, 2, 0.25);
        let b = actor_at(2, 2, 0.25);
        a.set_next_direction(Some(Direction::East));
        a.tick();
        assert!(a.is_colliding_with(&b));
        a.tick();
        assert!(!a.is_colliding_with(&b));
    }
}
