//! Configuration for the plan generator.
//!
//! Two layers live here:
//! - [`GeneratorConfig`]: the validated per-run request (days, environment,
//!   experience, goal, volume, filters and persistence switches)
//! - [`Config`]: the application file at `$XDG_CONFIG_HOME/liftplan/config.toml`
//!   holding the data directory, catalog location and generator defaults

use crate::selector::restriction_terms;
use crate::types::{Environment, ExperienceLevel, Goal, MovementPattern};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Upper bound on `volume_scale`
pub const MAX_VOLUME_SCALE: f64 = 2.0;

/// A validated request for one plan generation run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default = "default_training_days")]
    pub training_days: u8,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub experience_level: ExperienceLevel,

    #[serde(default)]
    pub goal: Goal,

    #[serde(default = "default_volume_scale")]
    pub volume_scale: f64,

    /// Narrows the environment's equipment set when present
    #[serde(default)]
    pub equipment_whitelist: Option<Vec<String>>,

    #[serde(default)]
    pub exclude_exercises: Vec<String>,

    #[serde(default)]
    pub preferred_exercises: BTreeMap<MovementPattern, Vec<String>>,

    /// Restriction key (e.g. `no_overhead_press`) → enabled
    #[serde(default)]
    pub movement_restrictions: BTreeMap<String, bool>,

    #[serde(default)]
    pub target_muscle_groups: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub beginner_consistency_mode: bool,

    #[serde(default = "default_true")]
    pub persist: bool,

    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Seeds the tie-breaking jitter; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            training_days: default_training_days(),
            environment: Environment::default(),
            experience_level: ExperienceLevel::default(),
            goal: Goal::default(),
            volume_scale: default_volume_scale(),
            equipment_whitelist: None,
            exclude_exercises: Vec::new(),
            preferred_exercises: BTreeMap::new(),
            movement_restrictions: BTreeMap::new(),
            target_muscle_groups: None,
            beginner_consistency_mode: true,
            persist: true,
            overwrite: true,
            seed: None,
        }
    }
}

fn default_training_days() -> u8 {
    3
}

fn default_volume_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl GeneratorConfig {
    /// Build and validate a configuration with default optional settings.
    pub fn new(
        training_days: u8,
        environment: Environment,
        experience_level: ExperienceLevel,
        goal: Goal,
        volume_scale: f64,
    ) -> Result<Self> {
        let config = Self {
            training_days,
            environment,
            experience_level,
            goal,
            volume_scale,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Same as [`GeneratorConfig::new`] but parses the profile from strings
    pub fn from_strs(
        training_days: u8,
        environment: &str,
        experience_level: &str,
        goal: &str,
        volume_scale: f64,
    ) -> Result<Self> {
        Self::new(
            training_days,
            environment.parse()?,
            experience_level.parse()?,
            goal.parse()?,
            volume_scale,
        )
    }

    /// Check every field that can be out of range
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.training_days) {
            return Err(Error::Config(format!(
                "training_days must be between 1 and 5, got {}",
                self.training_days
            )));
        }

        if !self.volume_scale.is_finite()
            || self.volume_scale <= 0.0
            || self.volume_scale > MAX_VOLUME_SCALE
        {
            return Err(Error::Config(format!(
                "volume_scale must be in (0, {}], got {}",
                MAX_VOLUME_SCALE, self.volume_scale
            )));
        }

        for key in self.movement_restrictions.keys() {
            if restriction_terms(key).is_none() {
                tracing::warn!("Ignoring unknown movement restriction '{}'", key);
            }
        }

        Ok(())
    }

    pub fn with_equipment_whitelist<I, S>(mut self, equipment: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment_whitelist = Some(equipment.into_iter().map(Into::into).collect());
        self
    }

    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_exercises.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn preferring<I, S>(mut self, pattern: MovementPattern, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_exercises
            .entry(pattern)
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn restricting(mut self, key: impl Into<String>) -> Self {
        self.movement_restrictions.insert(key.into(), true);
        self
    }

    pub fn targeting<I, S>(mut self, muscles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_muscle_groups = Some(muscles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_consistency_mode(mut self, enabled: bool) -> Self {
        self.beginner_consistency_mode = enabled;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the used-exercise tracker should survive across routines
    pub fn keeps_selection_history(&self) -> bool {
        self.beginner_consistency_mode && self.experience_level == ExperienceLevel::Novice
    }
}

// ============================================================================
// Application config file
// ============================================================================

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Location of the plan store inside the data directory
    pub fn plan_path(&self) -> PathBuf {
        self.data_dir.join("plan.json")
    }
}

/// Where exercises come from
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// CSV export of the exercise catalog; built-in catalog when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liftplan")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.generator.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftplan")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
