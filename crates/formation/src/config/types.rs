use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::PositionRecord;

pub const MAX_POSITION_RECORDS: usize = 4096;
pub const DEFAULT_RETREAT_DX: i32 = 300;
pub const DEFAULT_RETREAT_DY: i32 = 0;
pub const DEFAULT_RETREAT_DURATION_FRAMES: u32 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormationConfig {
    pub positions: Vec<PositionRecord>,
    pub retreat: RetreatConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetreatConfig {
    pub enabled: bool,
    pub dx: i32,
    pub dy: i32,
    pub duration_frames: u32,
}

impl Default for RetreatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dx: DEFAULT_RETREAT_DX,
            dy: DEFAULT_RETREAT_DY,
            duration_frames: DEFAULT_RETREAT_DURATION_FRAMES,
        }
    }
}

impl FormationConfig {
    /// Party of four stepping down and to the right from (600, 280), with
    /// the retreat override disabled.
    pub fn sample() -> Self {
        let mut positions = vec![PositionRecord::root(600, 280)];
        for parent in 0..3 {
            positions.push(PositionRecord::child_of(parent, 32, 48));
        }
        Self {
            positions,
            retreat: RetreatConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode config json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse config json at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config at {at}: {message}")]
    Invalid { at: String, message: String },
}
