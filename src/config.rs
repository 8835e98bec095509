use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::session::{SessionConfig, DEFAULT_TIME_LIMIT_SECS};

pub const MIN_COLUMNS: usize = 10;
pub const MIN_ROWS: usize = 5;

/// Everything needed to set up a session. The binary fills it from the
/// stored config file and the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub columns: usize,
    pub rows: usize,
    /// `None` uses the built-in word list.
    pub words_file: Option<PathBuf>,
    pub seed: u64,
    pub time_limit_secs: u64,
    /// `None` fills the whole grid.
    pub word_budget: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 60,
            rows: 40,
            words_file: None,
            seed: 42,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            word_budget: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.columns < MIN_COLUMNS || self.rows < MIN_ROWS {
            return Err(Error::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
                min_columns: MIN_COLUMNS,
                min_rows: MIN_ROWS,
            });
        }
        if self.time_limit_secs == 0 {
            return Err(Error::InvalidTimeLimit);
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from_secs(self.time_limit_secs)
    }

    pub fn size(&self) -> GridSize {
        GridSize {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// `COLUMNSxROWS`, as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl FromStr for GridSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (columns, rows) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected COLUMNSxROWS, got `{s}`"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid number `{part}`: {e}"))
        };
        Ok(Self {
            columns: parse(columns)?,
            rows: parse(rows)?,
        })
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(Error::Config)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|err| Error::Config(err.into()))?;
        fs::write(&self.path, data).map_err(Error::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            columns: 80,
            rows: 6,
            words_file: Some(PathBuf::from("/tmp/words.txt")),
            seed: 7,
            time_limit_secs: 30,
            word_budget: Some(25),
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_or_garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "seed": 9 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();

        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.columns, 60);
        assert_eq!(cfg.time_limit_secs, 15);
    }

    #[test]
    fn validate_enforces_minimum_grid() {
        let small = Config {
            columns: 9,
            ..Config::default()
        };
        assert_matches!(small.validate(), Err(Error::InvalidDimensions { columns: 9, .. }));

        let short = Config {
            rows: 4,
            ..Config::default()
        };
        assert_matches!(short.validate(), Err(Error::InvalidDimensions { rows: 4, .. }));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_time_limit() {
        let cfg = Config {
            time_limit_secs: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(Error::InvalidTimeLimit));
    }

    #[test]
    fn session_config_uses_time_limit() {
        let cfg = Config {
            time_limit_secs: 30,
            ..Config::default()
        };
        assert_eq!(cfg.session_config().time_limit, Duration::from_secs(30));
    }

    #[test]
    fn grid_size_parses() {
        assert_eq!(
            "60x40".parse::<GridSize>(),
            Ok(GridSize {
                columns: 60,
                rows: 40
            })
        );
        assert_eq!("80X5".parse::<GridSize>().map(|g| g.to_string()), Ok("80x5".to_string()));
        assert!("60".parse::<GridSize>().is_err());
        assert!("ax5".parse::<GridSize>().is_err());
    }
}
