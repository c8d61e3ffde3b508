//! Simulation settings, read from a JSON5 file.

use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use steel_utils::WorldRange;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/steel_liquids.json5");

/// Errors produced while loading the simulation config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("could not access config file {path}: {source}")]
    Io {
        /// The file that was accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid JSON5 or does not match the schema.
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Settings of one simulated level and its tick loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Lowest block y coordinate.
    pub min_y: i32,
    /// Highest block y coordinate.
    pub max_y: i32,
    /// Game ticks per real second.
    pub ticks_per_second: u32,
    /// Random ticks per chunk section per game tick.
    pub random_tick_speed: u32,
    /// Scheduled ticks run per game tick at most.
    pub max_scheduled_ticks_per_tick: usize,
    /// Whether the level is ultrawarm, which speeds up lava.
    pub ultrawarm: bool,
    /// Game ticks to run before stopping; 0 runs until interrupted.
    pub run_ticks: u64,
    /// Seed of the random tick generator.
    pub seed: u64,
}

impl SimulationConfig {
    /// Where the config lives relative to the working directory.
    #[must_use]
    pub fn default_path() -> &'static Path {
        #[cfg(feature = "dev-build")]
        let path = Path::new("config/steel_liquids.json5");

        #[cfg(not(feature = "dev-build"))]
        let path = Path::new("steel_liquids.json5");

        path
    }

    /// Reads the config at `path`, writing the default config there first if
    /// the file does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let config_str = if path.exists() {
            fs::read_to_string(path).map_err(io_error)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
            fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;
            log::info!("Wrote default config to {}", path.display());
            DEFAULT_CONFIG.to_owned()
        };

        Self::parse(&config_str)
    }

    /// Parses and validates a JSON5 config.
    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json5::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is within its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_y >= self.max_y {
            return Err(ConfigError::Invalid("min_y must be below max_y"));
        }
        if !(1..=100).contains(&self.ticks_per_second) {
            return Err(ConfigError::Invalid("Ticks per second must be in range 1..100"));
        }
        if self.random_tick_speed > 4096 {
            return Err(ConfigError::Invalid("Random tick speed must be in range 0..4096"));
        }
        if self.max_scheduled_ticks_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "Max scheduled ticks per tick must be greater than 0",
            ));
        }
        Ok(())
    }

    /// The vertical bounds of the level.
    #[must_use]
    pub const fn range(&self) -> WorldRange {
        WorldRange::new(self.min_y, self.max_y)
    }

    /// Real time between two game ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_y: WorldRange::OVERWORLD.min_y,
            max_y: WorldRange::OVERWORLD.max_y,
            ticks_per_second: 20,
            random_tick_speed: 3,
            max_scheduled_ticks_per_tick: 65_536,
            ultrawarm: false,
            run_ticks: 600,
            seed: 0,
        }
    }
}
