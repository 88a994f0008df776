//! Start-up configuration for the simulation core.
//!
//! Every section deserialises from TOML with per-field defaults taken from
//! [`crate::constants`], so a file only needs to name the values it changes.
//! Configuration is read once at construction; nothing here is reloaded while
//! the simulation runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::ledger::ResourceKind;

/// Errors raised while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Per-unit stats applied when a unit is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub max_health: f32,
    pub move_speed: f32,
    pub stopping_distance: f32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            move_speed: DEFAULT_MOVE_SPEED,
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
        }
    }
}

/// Registry settings.
///
/// The pathfinding values are carried for completeness but movement is always
/// direct-line; nothing reads the timeout or attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub use_pathfinding: bool,
    pub pathfinding_update_rate: f32,
    pub max_pathfinding_attempts: u32,
    pub pathfinding_timeout: f32,
    pub default_move_speed: f32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            use_pathfinding: true,
            pathfinding_update_rate: PATHFINDING_UPDATE_RATE,
            max_pathfinding_attempts: MAX_PATHFINDING_ATTEMPTS,
            pathfinding_timeout: PATHFINDING_TIMEOUT,
            default_move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

/// Starting amounts and the shared cap for the resource ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub wood: i64,
    pub stone: i64,
    pub food: i64,
    pub magic: i64,
    pub max_amount: i64,
}

impl LedgerConfig {
    /// Starting amount configured for `kind`.
    #[must_use]
    pub fn initial(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Food => self.food,
            ResourceKind::Magic => self.magic,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            wood: INITIAL_WOOD,
            stone: INITIAL_STONE,
            food: INITIAL_FOOD,
            magic: INITIAL_MAGIC,
            max_amount: MAX_RESOURCE_AMOUNT,
        }
    }
}

/// Raid thresholds and timer intervals for the threshold monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub population_threshold: usize,
    pub resource_threshold: i64,
    pub raid_check_interval: f64,
    pub spawning_enabled: bool,
    pub spawn_interval: f64,
    /// Resource kinds summed for the hoarding check.
    pub counted_resources: Vec<ResourceKind>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            population_threshold: POPULATION_THRESHOLD,
            resource_threshold: RESOURCE_THRESHOLD,
            raid_check_interval: RAID_CHECK_INTERVAL,
            spawning_enabled: true,
            spawn_interval: SPAWN_INTERVAL,
            counted_resources: vec![ResourceKind::Wood, ResourceKind::Stone, ResourceKind::Food],
        }
    }
}

/// Complete configuration surface of the simulation core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub unit: UnitConfig,
    pub registry: RegistryConfig,
    pub ledger: LedgerConfig,
    pub monitor: MonitorConfig,
}

impl SimConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// # Examples
    /// ```
    /// use warrens::config::SimConfig;
    /// let config = SimConfig::from_toml_str("[ledger]\nwood = 10\n").unwrap();
    /// assert_eq!(config.ledger.wood, 10);
    /// assert_eq!(config.ledger.stone, 50);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would break the core's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.unit.max_health > 0.0) {
            return Err(ConfigError::invalid(
                "unit.max_health",
                format!("must be positive, got {}", self.unit.max_health),
            ));
        }
        if !(self.unit.move_speed >= 0.0) {
            return Err(ConfigError::invalid(
                "unit.move_speed",
                format!("must not be negative, got {}", self.unit.move_speed),
            ));
        }
        if !(self.unit.stopping_distance >= 0.0) {
            return Err(ConfigError::invalid(
                "unit.stopping_distance",
                format!("must not be negative, got {}", self.unit.stopping_distance),
            ));
        }
        if self.ledger.max_amount <= 0 {
            return Err(ConfigError::invalid(
                "ledger.max_amount",
                format!("must be positive, got {}", self.ledger.max_amount),
            ));
        }
        for kind in ResourceKind::ALL {
            let amount = self.ledger.initial(kind);
            if !(0..=self.ledger.max_amount).contains(&amount) {
                return Err(ConfigError::invalid(
                    "ledger",
                    format!(
                        "starting {kind} {amount} outside 0..={}",
                        self.ledger.max_amount
                    ),
                ));
            }
        }
        if !(self.monitor.raid_check_interval > 0.0) {
            return Err(ConfigError::invalid(
                "monitor.raid_check_interval",
                "must be positive",
            ));
        }
        if !(self.monitor.spawn_interval > 0.0) {
            return Err(ConfigError::invalid(
                "monitor.spawn_interval",
                "must be positive",
            ));
        }
        Ok(())
    }
}
