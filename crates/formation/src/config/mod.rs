mod atomic_io;
mod loader;
mod types;

pub use loader::{load_config_file, parse_config_str, validate_config, write_config_file};
pub use types::{
    ConfigError, FormationConfig, RetreatConfig, DEFAULT_RETREAT_DURATION_FRAMES,
    DEFAULT_RETREAT_DX, DEFAULT_RETREAT_DY, MAX_POSITION_RECORDS,
};
