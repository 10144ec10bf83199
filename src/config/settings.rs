//! Application settings loaded from config.toml
//!
//! Every section is optional; a missing file or section falls back to
//! defaults suitable for local development. Besides runtime settings, the
//! file lists members and activities used to seed an empty backend.

use crate::entities::{Role, program::ProgramStatus, task::TaskPriority, task::TaskStatus, trip::TripStatus};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub points: PointsConfig,
    /// Members to create when their `auth_id` is not registered yet
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    /// Trips to seed into an empty `trips` collection
    #[serde(default)]
    pub trips: Vec<TripConfig>,
    /// Tasks to seed into an empty `tasks` collection
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    /// Programs to seed into an empty `programs` collection
    #[serde(default)]
    pub programs: Vec<ProgramConfig>,
}

/// Where uploaded files are written and served from
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/storage"),
            public_base_url: "http://localhost:8080/storage".to_string(),
        }
    }
}

/// Query cache behavior
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// How long fetched collections are served from cache
    pub stale_after_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: 300,
        }
    }
}

impl QueryConfig {
    /// Staleness window as a [`Duration`]
    #[must_use]
    pub const fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

/// How a points grant updates users' cached totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointsMode {
    /// Insert transactions, then read-modify-write each user in turn.
    /// A failure stops the loop and nothing is rolled back.
    #[default]
    Sequential,
    /// Insert transactions and increment totals in one backend transaction.
    Atomic,
}

/// Points grant settings
#[derive(Debug, Default, Deserialize)]
pub struct PointsConfig {
    #[serde(default)]
    pub mode: PointsMode,
}

/// A member seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct MemberConfig {
    pub auth_id: String,
    pub national_id: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
}

const fn default_role() -> Role {
    Role::Scout
}

/// A trip seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct TripConfig {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub max_participants: i32,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    pub status: TripStatus,
}

/// A task seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// A program seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramConfig {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub responsible: String,
    #[serde(default)]
    pub image_url: String,
    pub status: ProgramStatus,
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {path_ref:?}: {e}"),
    })
}

/// Loads the file named by `SCOUT_HUB_CONFIG` (default `./config.toml`),
/// falling back to defaults when it does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("SCOUT_HUB_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}
