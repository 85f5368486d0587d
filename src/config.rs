//! Settings supplied by whoever hosts the simulation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, WakkaError},
    player::StrategyMode,
    variables::{DEFAULT_BONUS_LIFE_THRESHOLD, MAX_GHOSTS},
};

/// Display colors, as ARGB. The simulation only carries these through to the
/// renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: u32,
    pub wall: u32,
    pub dot: u32,
    pub player: u32,
    /// One color per ghost, in `GhostKind` order.
    pub ghosts: [u32; MAX_GHOSTS],
    pub fleeing_ghost: u32,
    pub fleeing_ghost_blink: u32,
    pub eyes: u32,
    pub fruit: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: 0xff00_0000,
            wall: 0xff21_21de,
            dot: 0xffff_b897,
            player: 0xffff_ff00,
            ghosts: [0xffff_0000, 0xffff_b8ff, 0xff00_ffff, 0xffff_b852],
            fleeing_ghost: 0xff21_21de,
            fleeing_ghost_blink: 0xffff_ffff,
            eyes: 0xffff_ffff,
            fruit: 0xffff_0000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub ghost_count: usize,
    pub bonus_life_enabled: bool,
    pub bonus_life_threshold: u32,
    pub kill_screen_enabled: bool,
    pub player_strategy: StrategyMode,
    pub icon_rows: usize,
    pub icon_cols: usize,
    /// Wall cells between two lanes running along icon rows.
    pub cells_between_rows: usize,
    /// Wall cells between two lanes running along icon columns.
    pub cells_between_cols: usize,
    pub palette: Palette,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            ghost_count: MAX_GHOSTS,
            bonus_life_enabled: true,
            bonus_life_threshold: DEFAULT_BONUS_LIFE_THRESHOLD,
            kill_screen_enabled: true,
            player_strategy: StrategyMode::NearestDot,
            icon_rows: 4,
            icon_cols: 4,
            cells_between_rows: 3,
            cells_between_cols: 2,
            palette: Palette::default(),
        }
    }
}

impl Configuration {
    /// Parses a JSON configuration. Missing fields take their defaults.
    ///
    /// An unknown `player_strategy` is reported as
    /// [`WakkaError::InvalidStrategyMode`] rather than as a parse failure.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let strategy = value.get("player_strategy").and_then(Value::as_i64);
        if let Some(setting) = strategy.and_then(|s| i32::try_from(s).ok()) {
            StrategyMode::from_setting(setting)?;
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.icon_rows == 0 || self.icon_cols == 0 {
            return Err(WakkaError::InvalidConfiguration(format!(
                "icon grid must be at least 1x1, got {}x{}",
                self.icon_rows, self.icon_cols
            )));
        }
        if self.ghost_count > MAX_GHOSTS {
            return Err(WakkaError::InvalidConfiguration(format!(
                "at most {MAX_GHOSTS} ghosts are supported, got {}",
                self.ghost_count
            )));
        }
        if self.bonus_life_enabled && self.bonus_life_threshold == 0 {
            return Err(WakkaError::InvalidConfiguration(
                "bonus life threshold must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns true if switching from `self` to `other` changes the board or
    /// the set of actors, which requires starting over.
    pub fn changes_layout(&self, other: &Configuration) -> bool {
        self.icon_rows != other.icon_rows
            || self.icon_cols != other.icon_cols
            || self.cells_between_rows != other.cells_between_rows
            || self.cells_between_cols != other.cells_between_cols
            || self.ghost_count != other.ghost_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Configuration::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = Configuration::from_json(r#"{ "ghost_count": 2, "player_strategy": 2 }"#)
            .unwrap();
        assert_eq!(config.ghost_count, 2);
        assert_eq!(config.player_strategy, StrategyMode::Random);
        assert_eq!(config.icon_rows, 4);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn unknown_strategy_reports_the_setting() {
        let result = Configuration::from_json(r#"{ "player_strategy": 9 }"#);
        assert!(matches!(result, Err(WakkaError::InvalidStrategyMode(9))));
        let result = Configuration::from_json(r#"{ "player_strategy": -1 }"#);
        assert!(matches!(result, Err(WakkaError::InvalidStrategyMode(-1))));

        // not a number at all
        let result = Configuration::from_json(r#"{ "player_strategy": "fast" }"#);
        assert!(matches!(result, Err(WakkaError::ConfigParse(_))));
    }

    #[test]
    fn strategy_deserializes_through_its_setting() {
        let mode: StrategyMode = serde_json::from_str("2").unwrap();
        assert_eq!(mode, StrategyMode::Random);
        let message = serde_json::from_str::<StrategyMode>("9")
            .unwrap_err()
            .to_string();
        assert!(message.contains("invalid player strategy mode: 9"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let too_many = Configuration::from_json(r#"{ "ghost_count": 5 }"#);
        assert!(matches!(too_many, Err(WakkaError::InvalidConfiguration(_))));

        let no_icons = Configuration {
            icon_cols: 0,
            ..Configuration::default()
        };
        assert!(no_icons.validate().is_err());

        let free_life = Configuration {
            bonus_life_threshold: 0,
            ..Configuration::default()
        };
        assert!(free_life.validate().is_err());
        let disabled = Configuration {
            bonus_life_enabled: false,
            ..free_life
        };
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn json_round_trip_keeps_strategy_as_integer() {
        let json = Configuration::default().to_json().unwrap();
        assert!(json.contains(r#""player_strategy": 1"#));
        assert_eq!(
            Configuration::from_json(&json).unwrap(),
            Configuration::default()
        );
    }

    #[test]
    fn layout_changes_are_detected() {
        let base = Configuration::default();
        let recolored = Configuration {
            palette: Palette {
                player: 0xff00_ff00,
                ..Palette::default()
            },
            player_strategy: StrategyMode::Random,
            ..base.clone()
        };
        assert!(!base.changes_layout(&recolored));
        let fewer_ghosts = Configuration {
            ghost_count: 1,
            ..base.clone()
        };
        assert!(base.changes_layout(&fewer_ghosts));
    }
}
