use std::fs;
use std::path::Path;

use tracing::info;

use super::atomic_io::write_text_atomic;
use super::types::{ConfigError, FormationConfig, MAX_POSITION_RECORDS};

pub fn load_config_file(path: &Path) -> Result<FormationConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw)?;
    info!(
        path = %path.display(),
        positions = config.positions.len(),
        retreat_override = config.retreat.enabled,
        "formation_config_loaded"
    );
    Ok(config)
}

pub fn parse_config_str(raw: &str) -> Result<FormationConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, FormationConfig>(&mut deserializer)
        .map_err(|error| {
            let path = error.path().to_string();
            let at = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            ConfigError::Parse {
                at,
                source: error.into_inner(),
            }
        })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &FormationConfig) -> Result<(), ConfigError> {
    if config.positions.len() > MAX_POSITION_RECORDS {
        return Err(ConfigError::Invalid {
            at: "positions".to_string(),
            message: format!(
                "expected at most {MAX_POSITION_RECORDS} records, got {}",
                config.positions.len()
            ),
        });
    }
    if config.retreat.enabled && config.retreat.duration_frames == 0 {
        return Err(ConfigError::Invalid {
            at: "retreat.duration_frames".to_string(),
            message: "expected at least 1 frame when the retreat override is enabled"
                .to_string(),
        });
    }
    Ok(())
}

pub fn write_config_file(path: &Path, config: &FormationConfig) -> Result<(), ConfigError> {
    let mut text = serde_json::to_string_pretty(config).map_err(ConfigError::Encode)?;
    text.push('\n');
    write_text_atomic(path, &text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
