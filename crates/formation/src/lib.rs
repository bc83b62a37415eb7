use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod config;
pub mod hooks;
pub mod layout;

pub use config::{
    load_config_file, parse_config_str, validate_config, write_config_file, ConfigError,
    FormationConfig, RetreatConfig, MAX_POSITION_RECORDS,
};
pub use hooks::{
    AnchorProvider, BattleStartHook, PartyFormation, RetreatMotion, RetreatOverrideProvider,
};
pub use layout::{resolve_all, PositionRecord, ResolvedFormation, ScreenPoint};

pub const CONFIG_ENV_VAR: &str = "FORMATION_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "formation.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    WorkingDir(PathBuf),
    BuiltIn,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Env(path) | Self::WorkingDir(path) => {
                Some(path.as_path())
            }
            Self::BuiltIn => None,
        }
    }

    pub fn load(&self) -> Result<FormationConfig, ConfigError> {
        match self.path() {
            Some(path) => load_config_file(path),
            None => Ok(FormationConfig::sample()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error(
        "{var} is set but does not point to a config file: {path}\n\
Point it at a JSON file, for example:\n\
Bash/zsh: export {var}=\"/path/to/formation.json\""
    )]
    InvalidEnvConfig { var: &'static str, path: PathBuf },
    #[error("config file passed on the command line does not exist: {path}")]
    ExplicitConfigMissing { path: PathBuf },
}

/// Picks the config file in priority order: explicit path, then
/// `FORMATION_CONFIG`, then `formation.json` in the working directory, then
/// the built-in sample.
pub fn resolve_config_source(explicit: Option<&Path>) -> Result<ConfigSource, StartupError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(StartupError::ExplicitConfigMissing {
                path: path.to_path_buf(),
            });
        }
        return Ok(ConfigSource::Explicit(normalize_path(path)));
    }

    let cwd = env::current_dir().map_err(StartupError::CurrentDir)?;
    config_from_env(env::var(CONFIG_ENV_VAR), &cwd)
}

/// Applies the `FORMATION_CONFIG` step of the lookup. A blank value counts
/// as unset and falls through to `dir`.
fn config_from_env(
    value: Result<String, env::VarError>,
    dir: &Path,
) -> Result<ConfigSource, StartupError> {
    match value {
        Ok(value) if !value.trim().is_empty() => {
            let normalized = normalize_path(Path::new(value.trim()));
            if normalized.is_file() {
                Ok(ConfigSource::Env(normalized))
            } else {
                Err(StartupError::InvalidEnvConfig {
                    var: CONFIG_ENV_VAR,
                    path: normalized,
                })
            }
        }
        Ok(_) | Err(env::VarError::NotPresent) => Ok(config_in_dir(dir)),
        Err(source) => Err(StartupError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

fn config_in_dir(dir: &Path) -> ConfigSource {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        ConfigSource::WorkingDir(normalize_path(&candidate))
    } else {
        ConfigSource::BuiltIn
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn explicit_path_must_exist() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            resolve_config_source(Some(&missing)),
            Err(StartupError::ExplicitConfigMissing { .. })
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("party.json");
        fs::write(&path, "{}").expect("write");

        let source = resolve_config_source(Some(&path)).expect("resolve");
        assert!(matches!(source, ConfigSource::Explicit(_)));
        assert_eq!(source.load().expect("load"), FormationConfig::default());
    }

    #[test]
    fn env_path_is_used_when_set() {
        let temp = TempDir::new().expect("tempdir");
        let env_config = temp.path().join("from_env.json");
        fs::write(&env_config, "{}").expect("write env config");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{}").expect("write dir config");

        let value = Ok(env_config.display().to_string());
        let source = config_from_env(value, temp.path()).expect("resolve");
        assert_eq!(source, ConfigSource::Env(normalize_path(&env_config)));
    }

    #[test]
    fn env_path_that_is_missing_stops_startup() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("missing.json");

        let value = Ok(missing.display().to_string());
        assert!(matches!(
            config_from_env(value, temp.path()),
            Err(StartupError::InvalidEnvConfig { .. })
        ));
    }

    #[test]
    fn blank_env_value_falls_through_to_directory() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{}").expect("write");

        for blank in ["", "   "] {
            let source = config_from_env(Ok(blank.to_string()), temp.path()).expect("resolve");
            assert!(matches!(source, ConfigSource::WorkingDir(_)));
        }
    }

    #[test]
    fn unset_env_uses_directory_then_built_in() {
        let temp = TempDir::new().expect("tempdir");
        let source =
            config_from_env(Err(env::VarError::NotPresent), temp.path()).expect("resolve");
        assert_eq!(source, ConfigSource::BuiltIn);

        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{}").expect("write");
        let source =
            config_from_env(Err(env::VarError::NotPresent), temp.path()).expect("resolve");
        assert!(matches!(source, ConfigSource::WorkingDir(_)));
    }

    #[test]
    fn non_unicode_env_value_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let value = Err(env::VarError::NotUnicode("bad".into()));
        assert!(matches!(
            config_from_env(value, temp.path()),
            Err(StartupError::EnvVar { .. })
        ));
    }

    #[test]
    fn directory_without_config_falls_back_to_built_in() {
        let temp = TempDir::new().expect("tempdir");
        let source = config_in_dir(temp.path());
        assert_eq!(source, ConfigSource::BuiltIn);
        assert_eq!(source.load().expect("load"), FormationConfig::sample());
    }

    #[test]
    fn directory_config_is_picked_up() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{}").expect("write");
        assert!(matches!(
            config_in_dir(temp.path()),
            ConfigSource::WorkingDir(_)
        ));
    }
}
