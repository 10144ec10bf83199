/// Database connection and schema creation
pub mod database;

/// Application settings and seed data loaded from config.toml
pub mod settings;

pub use settings::{
    AppConfig, MemberConfig, PointsMode, ProgramConfig, TaskConfig, TripConfig, load_config,
    load_default_config,
};
