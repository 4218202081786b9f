use crate::aoe::AoeShape;
use crate::collector::InteractionMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    /// Maximum number of live resources on the board.
    pub max_count: usize,
    pub spawn_interval_secs: f64,
    pub interaction_mode: InteractionMode,
    pub aoe_shape: AoeShape,
    pub ripple_delay_per_tile: f64,
    pub ripple_total_duration: f64,
    pub move_duration_secs: f64,
    /// Minimum time between two accepted actions in adjacency mode.
    pub move_cooldown_secs: f64,
    pub starting_balance: u64,
    pub tile_size: [f64; 2],
    /// Starting cell of the adjacency actor.
    pub actor_start: [i32; 2],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_count: 10,
            spawn_interval_secs: 4.0,
            interaction_mode: InteractionMode::Aoe,
            aoe_shape: AoeShape::Cross,
            ripple_delay_per_tile: 0.08,
            ripple_total_duration: 0.5,
            move_duration_secs: 0.4,
            move_cooldown_secs: 0.6,
            starting_balance: 0,
            tile_size: [32.0, 16.0],
            actor_start: [0, 0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    ZeroCapacity,
    CapacityTooLarge { max: usize, actual: usize },
    InvalidDuration { field: &'static str, value: f64 },
    SpawnIntervalTooShort { min: f64, actual: f64 },
    InvalidTileSize,
    Parse(String),
    Io(String),
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::ZeroCapacity => write!(f, "max_count must be positive"),
            SimConfigError::CapacityTooLarge { max, actual } => {
                write!(f, "max_count ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::InvalidDuration { field, value } => {
                write!(f, "{field} must be finite and non-negative (got {value})")
            }
            SimConfigError::SpawnIntervalTooShort { min, actual } => write!(
                f,
                "spawn_interval_secs ({actual}) must be at least {min}"
            ),
            SimConfigError::InvalidTileSize => {
                write!(f, "tile_size components must be finite and positive")
            }
            SimConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
            SimConfigError::Io(msg) => write!(f, "cannot read config: {msg}"),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_CAPACITY: usize = 1_000_000;
    pub const MIN_SPAWN_INTERVAL_SECS: f64 = 0.001;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.max_count == 0 {
            return Err(SimConfigError::ZeroCapacity);
        }
        if self.max_count > Self::MAX_CAPACITY {
            return Err(SimConfigError::CapacityTooLarge {
                max: Self::MAX_CAPACITY,
                actual: self.max_count,
            });
        }
        if !self.spawn_interval_secs.is_finite()
            || self.spawn_interval_secs < Self::MIN_SPAWN_INTERVAL_SECS
        {
            return Err(SimConfigError::SpawnIntervalTooShort {
                min: Self::MIN_SPAWN_INTERVAL_SECS,
                actual: self.spawn_interval_secs,
            });
        }
        for (field, value) in [
            ("ripple_delay_per_tile", self.ripple_delay_per_tile),
            ("ripple_total_duration", self.ripple_total_duration),
            ("move_duration_secs", self.move_duration_secs),
            ("move_cooldown_secs", self.move_cooldown_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimConfigError::InvalidDuration { field, value });
            }
        }
        if !self.tile_size.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(SimConfigError::InvalidTileSize);
        }
        Ok(())
    }

    /// Parses and validates. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SimConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_is_fatal() {
        let config = SimConfig {
            max_count: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_bad_durations() {
        let config = SimConfig {
            spawn_interval_secs: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::SpawnIntervalTooShort { .. })
        ));
        let config = SimConfig {
            move_cooldown_secs: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::InvalidDuration {
                field: "move_cooldown_secs",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimConfig::from_json_str(
            r#"{"max_count": 3, "aoe_shape": "square3x3", "interaction_mode": "adjacency"}"#,
        )
        .unwrap();
        assert_eq!(config.max_count, 3);
        assert_eq!(config.aoe_shape, AoeShape::Square3x3);
        assert_eq!(config.interaction_mode, InteractionMode::Adjacency);
        assert_eq!(config.spawn_interval_secs, 4.0);
    }

    #[test]
    fn invalid_json_values_are_reported() {
        assert!(matches!(
            SimConfig::from_json_str(r#"{"max_count": 0}"#),
            Err(SimConfigError::ZeroCapacity)
        ));
        assert!(matches!(
            SimConfig::from_json_str("{not json"),
            Err(SimConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SimConfig::from_json_file("/definitely/not/here.json"),
            Err(SimConfigError::Io(_))
        ));
    }
}
