use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::geometry::DEFAULT_PROXIMITY_RADIUS;

use super::init::WorldInitConfig;
use super::motion::MotionConfig;
use super::reward::RewardRange;
use super::types::{DEFAULT_LOG_CAPACITY, MAX_LOG_CAPACITY};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "realm.toml";

pub const ENV_SEED: &str = "REALM_WORLD_SEED";
pub const ENV_CHEST_COUNT: &str = "REALM_WORLD_CHEST_COUNT";
pub const ENV_CHEST_SPREAD: &str = "REALM_WORLD_CHEST_SPREAD";
pub const ENV_PROXIMITY_RADIUS: &str = "REALM_WORLD_PROXIMITY_RADIUS";
pub const ENV_MOVE_SPEED: &str = "REALM_WORLD_MOVE_SPEED";
pub const ENV_ARRIVAL_EPSILON: &str = "REALM_WORLD_ARRIVAL_EPSILON";
pub const ENV_REWARD_MIN: &str = "REALM_WORLD_REWARD_MIN";
pub const ENV_REWARD_MAX: &str = "REALM_WORLD_REWARD_MAX";
pub const ENV_LOG_CAPACITY: &str = "REALM_WORLD_LOG_CAPACITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    pub proximity_radius: f64,
    pub motion: MotionConfig,
    pub reward: RewardRange,
    pub log_capacity: usize,
    pub world: WorldInitConfig,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            proximity_radius: DEFAULT_PROXIMITY_RADIUS,
            motion: MotionConfig::default(),
            reward: RewardRange::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            world: WorldInitConfig::default(),
        }
    }
}

impl RealmConfig {
    pub fn sanitized(mut self) -> Self {
        if !self.proximity_radius.is_finite() || self.proximity_radius < 0.0 {
            self.proximity_radius = DEFAULT_PROXIMITY_RADIUS;
        }
        self.motion = self.motion.sanitized();
        self.reward = self.reward.sanitized();
        self.log_capacity = self.log_capacity.clamp(1, MAX_LOG_CAPACITY);
        self.world = self.world.sanitized();
        self
    }

    /// `realm.toml` in the working directory when present, else environment.
    pub fn from_default_sources() -> Result<Self, RealmConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::from_config_file(config_path);
        }
        Self::from_env()
    }

    /// File values win; keys the file leaves out fall back to the environment.
    pub fn from_config_file(path: &Path) -> Result<Self, RealmConfigError> {
        let content = fs::read_to_string(path).map_err(|err| RealmConfigError::ReadConfigFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let from_file = Self::from_toml_str(&content).map_err(|err| match err {
            RealmConfigError::ParseConfigFile { message, .. } => {
                RealmConfigError::ParseConfigFile {
                    path: path.display().to_string(),
                    message,
                }
            }
            other => other,
        })?;
        let table: toml::Table =
            toml::from_str(&content).map_err(|err| RealmConfigError::ParseConfigFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        from_file.overlay_with(|key| {
            if file_sets_key(&table, key) {
                None
            } else {
                std::env::var(key).ok()
            }
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RealmConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| RealmConfigError::ParseConfigFile {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        Ok(config.sanitized())
    }

    pub fn from_env() -> Result<Self, RealmConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(getter: F) -> Result<Self, RealmConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self::default().overlay_with(getter)
    }

    fn overlay_with<F>(mut self, mut getter: F) -> Result<Self, RealmConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(seed) = parse_env(&mut getter, ENV_SEED)? {
            self.world.seed = seed;
        }
        if let Some(count) = parse_env(&mut getter, ENV_CHEST_COUNT)? {
            self.world.chest_count = count;
        }
        if let Some(spread) = parse_env(&mut getter, ENV_CHEST_SPREAD)? {
            self.world.chest_spread = spread;
        }
        if let Some(radius) = parse_env(&mut getter, ENV_PROXIMITY_RADIUS)? {
            self.proximity_radius = radius;
        }
        if let Some(speed) = parse_env(&mut getter, ENV_MOVE_SPEED)? {
            self.motion.speed = speed;
        }
        if let Some(epsilon) = parse_env(&mut getter, ENV_ARRIVAL_EPSILON)? {
            self.motion.arrival_epsilon = epsilon;
        }
        if let Some(min) = parse_env(&mut getter, ENV_REWARD_MIN)? {
            self.reward.min = min;
        }
        if let Some(max) = parse_env(&mut getter, ENV_REWARD_MAX)? {
            self.reward.max = max;
        }
        if let Some(capacity) = parse_env(&mut getter, ENV_LOG_CAPACITY)? {
            self.log_capacity = capacity;
        }
        Ok(self.sanitized())
    }
}

fn parse_env<F, T>(getter: &mut F, key: &'static str) -> Result<Option<T>, RealmConfigError>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = getter(key) else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| RealmConfigError::InvalidValue { key, value })
}

fn file_sets_key(table: &toml::Table, key: &str) -> bool {
    let path: &[&str] = match key {
        ENV_SEED => &["world", "seed"],
        ENV_CHEST_COUNT => &["world", "chest_count"],
        ENV_CHEST_SPREAD => &["world", "chest_spread"],
        ENV_PROXIMITY_RADIUS => &["proximity_radius"],
        ENV_MOVE_SPEED => &["motion", "speed"],
        ENV_ARRIVAL_EPSILON => &["motion", "arrival_epsilon"],
        ENV_REWARD_MIN => &["reward", "min"],
        ENV_REWARD_MAX => &["reward", "max"],
        ENV_LOG_CAPACITY => &["log_capacity"],
        _ => return false,
    };
    let mut current = table;
    for (idx, segment) in path.iter().enumerate() {
        let Some(value) = current.get(*segment) else {
            return false;
        };
        if idx + 1 == path.len() {
            return true;
        }
        match value.as_table() {
            Some(next) => current = next,
            None => return false,
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealmConfigError {
    InvalidValue { key: &'static str, value: String },
    ReadConfigFile { path: String, message: String },
    ParseConfigFile { path: String, message: String },
}

impl fmt::Display for RealmConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealmConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value}")
            }
            RealmConfigError::ReadConfigFile { path, message } => {
                write!(f, "read config file failed ({path}): {message}")
            }
            RealmConfigError::ParseConfigFile { path, message } => {
                write!(f, "parse config file failed ({path}): {message}")
            }
        }
    }
}

impl Error for RealmConfigError {}
