use arrayvec::ArrayVec;
use ndarray::Array2;
use rand::{seq::SliceRandom, Rng};

use crate::variables::{Cell, Direction, POWER_PELLET_COUNT};

/// An integer grid coordinate. May be out of bounds while probing neighbors.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn squared_distance(self, other: Point) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

/// The play field: a grid of cells laid out around a home screen's icon grid.
///
/// Lanes run along every row and column that sits between two icons (and along
/// the outer border); everything else is wall. Cells are indexed `[(x, y)]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    icon_rows: usize,
    icon_cols: usize,
    row_spacing: usize,
    col_spacing: usize,
}

impl Board {
    /// Creates a freshly generated board for the given icon grid.
    ///
    /// `row_spacing` and `col_spacing` are the number of wall cells between two
    /// adjacent lanes.
    pub fn new(icon_rows: usize, icon_cols: usize, row_spacing: usize, col_spacing: usize) -> Self {
        let cells_wide = icon_cols * (col_spacing + 1) + 1;
        let cells_tall = icon_rows * (row_spacing + 1) + 1;
        let mut board = Self {
            cells: Array2::from_elem((cells_wide, cells_tall), Cell::Wall),
            icon_rows,
            icon_cols,
            row_spacing,
            col_spacing,
        };
        board.regenerate();
        board
    }

    /// Refills every lane with dots and places the power pellets.
    pub fn regenerate(&mut self) {
        let col_period = self.col_spacing + 1;
        let row_period = self.row_spacing + 1;
        for ((x, y), cell) in self.cells.indexed_iter_mut() {
            *cell = if x % col_period == 0 || y % row_period == 0 {
                Cell::Dot
            } else {
                Cell::Wall
            };
        }
        for position in self.power_pellet_positions() {
            self.set(position, Cell::PowerPellet);
        }
    }

    pub fn cells_wide(&self) -> usize {
        self.cells.dim().0
    }

    pub fn cells_tall(&self) -> usize {
        self.cells.dim().1
    }

    pub fn icon_rows(&self) -> usize {
        self.icon_rows
    }

    pub fn icon_cols(&self) -> usize {
        self.icon_cols
    }

    pub fn row_spacing(&self) -> usize {
        self.row_spacing
    }

    pub fn col_spacing(&self) -> usize {
        self.col_spacing
    }

    /// The raw cell array, shaped `(cells_wide, cells_tall)`.
    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// The four corners, which always start as power pellets.
    pub fn power_pellet_positions(&self) -> [Point; POWER_PELLET_COUNT] {
        let right = self.cells_wide() as i32 - 1;
        let bottom = self.cells_tall() as i32 - 1;
        [
            Point::new(0, 0),
            Point::new(right, 0),
            Point::new(0, bottom),
            Point::new(right, bottom),
        ]
    }

    fn index(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.cells_wide() && y < self.cells_tall()).then_some((x, y))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    /// Returns the cell at `point`, or None if it is out of bounds.
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.index(point).map(|index| self.cells[index])
    }

    /// Overwrites the cell at `point`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, point: Point, cell: Cell) {
        if let Some(index) = self.index(point) {
            self.cells[index] = cell;
        }
    }

    /// Clears a dot or power pellet at `point` and returns what was there.
    pub fn eat(&mut self, point: Point) -> Option<Cell> {
        let cell = self.get(point).filter(|cell| cell.is_edible())?;
        self.set(point, Cell::Blank);
        Some(cell)
    }

    /// Returns true if `point` is in bounds and not a wall.
    pub fn is_valid_position(&self, point: Point) -> bool {
        self.get(point).is_some_and(|cell| cell != Cell::Wall)
    }

    /// Returns the directions that lead from `point` to a valid position.
    pub fn valid_directions(&self, point: Point) -> ArrayVec<Direction, 4> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_valid_position(direction.step(point)))
            .collect()
    }

    /// Returns true if more than one neighbor of `point` is a valid position.
    pub fn is_intersection(&self, point: Point) -> bool {
        self.valid_directions(point).len() > 1
    }

    /// A unique index for an in-bounds position.
    pub fn position_hash(&self, point: Point) -> usize {
        point.y as usize * self.cells_wide() + point.x as usize
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Picks a uniformly random valid direction out of `point`, avoiding
    /// `avoid` unless it is the only way out.
    pub fn random_direction(
        &self,
        point: Point,
        avoid: Option<Direction>,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        let valid = self.valid_directions(point);
        let preferred: ArrayVec<Direction, 4> = valid
            .iter()
            .copied()
            .filter(|&direction| Some(direction) != avoid)
            .collect();
        preferred.choose(rng).or_else(|| valid.first()).copied()
    }

    /// The player's spawn: bottom row, on the lane nearest the center column.
    pub fn player_spawn(&self) -> Point {
        let x = (self.icon_cols / 2) * (self.col_spacing + 1);
        Point::new(x as i32, self.cells_tall() as i32 - 1)
    }

    /// The spawn of ghost `index` out of `count`, spread along the top row.
    pub fn ghost_spawn(&self, index: usize, count: usize) -> Point {
        let lane = self.icon_cols * (index + 1) / (count + 1);
        Point::new((lane * (self.col_spacing + 1)) as i32, 0)
    }

    /// The lane intersection nearest the middle of the board.
    pub fn center(&self) -> Point {
        let x = (self.icon_cols / 2) * (self.col_spacing + 1);
        let y = (self.icon_rows / 2) * (self.row_spacing + 1);
        Point::new(x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn dimensions_follow_icon_grid() {
        let board = Board::new(4, 5, 3, 2);
        assert_eq!(board.cells_wide(), 5 * 3 + 1);
        assert_eq!(board.cells_tall(), 4 * 4 + 1);
    }

    #[test]
    fn lanes_are_dots_and_corners_are_pellets() {
        let board = Board::new(3, 4, 2, 3);
        let pellets = board.power_pellet_positions();
        for ((x, y), &cell) in board.cells().indexed_iter() {
            let point = Point::new(x as i32, y as i32);
            let expected = if pellets.contains(&point) {
                Cell::PowerPellet
            } else if x % 4 == 0 || y % 3 == 0 {
                Cell::Dot
            } else {
                Cell::Wall
            };
            assert_eq!(cell, expected, "unexpected cell at {point:?}");
        }
        assert_eq!(board.count(Cell::PowerPellet), 4);
    }

    #[test]
    fn regenerate_restores_eaten_cells() {
        let mut board = Board::new(2, 2, 2, 2);
        assert_eq!(board.eat(Point::new(1, 0)), Some(Cell::Dot));
        assert_eq!(board.eat(Point::new(0, 0)), Some(Cell::PowerPellet));
        assert_eq!(board.eat(Point::new(0, 0)), None);
        assert_eq!(board.eat(Point::new(1, 1)), None);
        board.regenerate();
        assert_eq!(board.get(Point::new(1, 0)), Some(Cell::Dot));
        assert_eq!(board.get(Point::new(0, 0)), Some(Cell::PowerPellet));
    }

    #[test]
    fn walls_and_out_of_bounds_are_invalid() {
        let board = Board::new(2, 2, 2, 2);
        assert!(board.is_valid_position(Point::new(0, 0)));
        assert!(board.is_valid_position(Point::new(3, 1)));
        assert!(!board.is_valid_position(Point::new(1, 1)));
        assert!(!board.is_valid_position(Point::new(-1, 0)));
        assert!(!board.is_valid_position(Point::new(0, -1)));
        assert!(!board.is_valid_position(Point::new(7, 0)));
        assert!(!board.is_valid_position(Point::new(0, 7)));
    }

    #[test]
    fn blank_cells_stay_valid() {
        let mut board = Board::new(2, 2, 2, 2);
        board.set(Point::new(1, 0), Cell::Blank);
        assert!(board.is_valid_position(Point::new(1, 0)));
    }

    #[test]
    fn intersection_needs_two_valid_neighbors() {
        let mut board = Board::new(2, 2, 2, 2);
        // corner: east and south
        assert!(board.is_intersection(Point::new(0, 0)));
        // lane crossing: all four
        assert!(board.is_intersection(Point::new(3, 3)));
        // isolate (0, 0) down to a single exit
        board.set(Point::new(0, 1), Cell::Wall);
        assert!(!board.is_intersection(Point::new(0, 0)));
        board.set(Point::new(1, 0), Cell::Wall);
        assert!(!board.is_intersection(Point::new(0, 0)));
    }

    #[test]
    fn position_hash_is_a_bijection() {
        let board = Board::new(3, 2, 1, 2);
        let mut seen = HashSet::new();
        for x in 0..board.cells_wide() as i32 {
            for y in 0..board.cells_tall() as i32 {
                let hash = board.position_hash(Point::new(x, y));
                assert!(hash < board.cells_wide() * board.cells_tall());
                assert!(seen.insert(hash));
            }
        }
    }

    #[test]
    fn random_direction_avoids_unless_forced() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut board = Board::new(2, 2, 2, 2);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let direction =
                board.random_direction(Point::new(0, 0), Some(Direction::East), &mut rng);
            assert_eq!(direction, Some(Direction::South));
        }
        board.set(Point::new(0, 1), Cell::Wall);
        let direction = board.random_direction(Point::new(0, 0), Some(Direction::East), &mut rng);
        assert_eq!(direction, Some(Direction::East));
    }

    #[test]
    fn spawns_are_valid_positions() {
        let board = Board::new(4, 4, 3, 2);
        assert!(board.is_valid_position(board.player_spawn()));
        assert!(board.is_valid_position(board.center()));
        for index in 0..4 {
            assert!(board.is_valid_position(board.ghost_spawn(index, 4)));
        }
    }
}
