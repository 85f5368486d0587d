//! Simulation core for a maze-chase wallpaper: a grid board built from the
//! home screen's icon layout, a dot-eating player, four chasing ghosts and a
//! bonus fruit, advanced one tick at a time.

pub mod actor;
pub mod config;
pub mod error;
pub mod fruit;
pub mod game_state;
pub mod ghost_agent;
pub mod grid;
pub mod player;
pub mod search;
pub mod variables;

pub use config::Configuration;
pub use error::{Result, WakkaError};
pub use game_state::Game;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module exposing the simulation.
#[cfg(feature = "python")]
#[pymodule]
fn wakka_rs(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<game_state::py_wrappers::PyGame>()?;
    Ok(())
}
