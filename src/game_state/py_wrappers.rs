use num_enum::TryFromPrimitive;
use numpy::{IntoPyArray, PyArray2};
use pyo3::{
    exceptions::{PyIndexError, PyValueError},
    prelude::*,
};

use super::Game;
use crate::{config::Configuration, error::WakkaError, variables::Direction};

impl From<WakkaError> for PyErr {
    fn from(error: WakkaError) -> Self {
        PyValueError::new_err(error.to_string())
    }
}

/// Python handle to a running game.
#[pyclass(name = "Game")]
pub struct PyGame {
    game: Game,
}

#[pymethods]
impl PyGame {
    /// Creates a game. `config_json` supplies any other settings; the icon
    /// grid passed here always wins.
    #[new]
    #[pyo3(signature = (
        icon_rows,
        icon_cols,
        screen_width,
        screen_height,
        seed=None,
        config_json=None,
    ))]
    fn new(
        icon_rows: usize,
        icon_cols: usize,
        screen_width: f32,
        screen_height: f32,
        seed: Option<u64>,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => Configuration::from_json(json)?,
            None => Configuration::default(),
        };
        let config = Configuration {
            icon_rows,
            icon_cols,
            ..config
        };
        let game = Game::with_configuration(config, screen_width, screen_height, seed)?;
        Ok(Self { game })
    }

    /// Advances the game by one frame.
    fn tick(&mut self) -> PyResult<()> {
        Ok(self.game.tick()?)
    }

    fn new_game(&mut self) {
        self.game.new_game();
    }

    fn perform_resize(&mut self, screen_width: f32, screen_height: f32) {
        self.game.perform_resize(screen_width, screen_height);
    }

    /// Requests a direction: 0 = north, 1 = south, 2 = east, 3 = west.
    fn set_wants_to_go(&mut self, direction: u8) -> PyResult<()> {
        let direction = Direction::try_from_primitive(direction)
            .map_err(|_| PyValueError::new_err("Invalid direction"))?;
        self.game.set_wants_to_go(direction);
        Ok(())
    }

    #[getter]
    fn score(&self) -> u32 {
        self.game.score()
    }

    #[getter]
    fn lives(&self) -> u8 {
        self.game.lives()
    }

    #[getter]
    fn level(&self) -> u32 {
        self.game.level()
    }

    #[getter]
    fn dots_eaten(&self) -> u32 {
        self.game.dots_eaten()
    }

    #[getter]
    fn dots_remaining(&self) -> u32 {
        self.game.dots_remaining()
    }

    #[getter]
    fn kill_screen(&self) -> bool {
        self.game.is_kill_screen()
    }

    /// The cell value at (x, y) as an integer.
    fn cell(&self, x: i32, y: i32) -> PyResult<u8> {
        let Some(cell) = self.game.cell(x, y) else {
            let message = format!("({x}, {y}) is off the board");
            return Err(PyIndexError::new_err(message));
        };
        Ok(u8::from(cell))
    }

    /// The board as a (width, height) NumPy array of cell values.
    fn board_numpy(&self, py: Python<'_>) -> Py<PyArray2<u8>> {
        self.game
            .board()
            .cells()
            .mapv(u8::from)
            .into_pyarray(py)
            .into()
    }

    fn player_pos(&self) -> (i32, i32) {
        let position = self.game.player().actor.position();
        (position.x, position.y)
    }

    fn ghost_positions(&self) -> Vec<(i32, i32)> {
        self.game
            .ghosts()
            .iter()
            .map(|ghost| {
                let position = ghost.actor.position();
                (position.x, position.y)
            })
            .collect()
    }

    fn __str__(&self) -> String {
        self.game.to_string()
    }
}
