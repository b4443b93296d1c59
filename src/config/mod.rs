use crate::core::calculator::pairing::PairingRules;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{ShiftSchedule, TimeWindow};
use crate::utils::time::parse_offset;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Fixed offset of the organisation's wall clock, e.g. "+08:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_capture_snapshots")]
    pub capture_snapshots: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Global default windows, used when no `*` schedule row exists.
    #[serde(default = "default_morning")]
    pub morning: String,
    #[serde(default = "default_afternoon")]
    pub afternoon: String,
    #[serde(default = "default_overtime")]
    pub overtime: String,
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}
fn default_grace_minutes() -> i64 {
    30
}
fn default_workers() -> usize {
    4
}
fn default_capture_snapshots() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_morning() -> String {
    "08:00-12:00".to_string()
}
fn default_afternoon() -> String {
    "13:00-17:00".to_string()
}
fn default_overtime() -> String {
    "17:00-20:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            utc_offset: default_utc_offset(),
            grace_minutes: default_grace_minutes(),
            workers: default_workers(),
            capture_snapshots: default_capture_snapshots(),
            log_level: default_log_level(),
            morning: default_morning(),
            afternoon: default_afternoon(),
            overtime: default_overtime(),
        }
    }

    /// Configuration directory: `$RATTENDANCE_HOME` if set, otherwise
    /// `~/.rattendance` (`%APPDATA%\rattendance` on Windows).
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var("RATTENDANCE_HOME")
            && !custom.trim().is_empty()
        {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattendance")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        self.tz()?;
        self.default_schedule()?;
        if self.grace_minutes < 0 {
            return Err(AppError::Config(format!(
                "grace_minutes must not be negative (got {})",
                self.grace_minutes
            )));
        }
        Ok(())
    }

    pub fn tz(&self) -> AppResult<FixedOffset> {
        parse_offset(&self.utc_offset)
    }

    /// Global default schedule as configured in the file.
    pub fn default_schedule(&self) -> AppResult<ShiftSchedule> {
        Ok(ShiftSchedule {
            morning: TimeWindow::parse_optional(Some(&self.morning))?,
            afternoon: TimeWindow::parse_optional(Some(&self.afternoon))?,
            overtime: TimeWindow::parse_optional(Some(&self.overtime))?,
        })
    }

    pub fn pairing_rules(&self) -> PairingRules {
        PairingRules::with_grace_minutes(self.grace_minutes)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("rattendance.sqlite"),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
