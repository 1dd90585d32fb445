//! Generator and export settings
//!
//! Settings are plain serde structs. They are validated before generation
//! and can be persisted as JSON.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{export, generation};
use crate::error::{AppError, Result};

/// Closed interval used for measurement bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(AppError::config(format!("{} bounds must be finite", name)));
        }
        if self.min > self.max {
            return Err(AppError::config(format!(
                "{} minimum {} exceeds maximum {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Bands the synthesizer draws measurements from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRanges {
    pub outside_temperature: ValueRange,
    pub outside_humidity: ValueRange,
    /// Room temperature = outside temperature - drop
    pub room_temperature_drop: ValueRange,
    /// Room humidity = outside humidity - drop
    pub room_humidity_drop: ValueRange,
}

impl Default for FieldRanges {
    fn default() -> Self {
        Self {
            outside_temperature: generation::OUTSIDE_TEMPERATURE.into(),
            outside_humidity: generation::OUTSIDE_HUMIDITY.into(),
            room_temperature_drop: generation::ROOM_TEMPERATURE_DROP.into(),
            room_humidity_drop: generation::ROOM_HUMIDITY_DROP.into(),
        }
    }
}

impl FieldRanges {
    fn validate(&self) -> Result<()> {
        self.outside_temperature.validate("Outside temperature")?;
        self.outside_humidity.validate("Outside humidity")?;
        self.room_temperature_drop.validate("Room temperature drop")?;
        self.room_humidity_drop.validate("Room humidity drop")?;

        let humidity: ValueRange = generation::HUMIDITY_BOUNDS.into();
        if !humidity.contains(self.outside_humidity.min) || !humidity.contains(self.outside_humidity.max) {
            return Err(AppError::config(format!(
                "Outside humidity must stay within {}..{}",
                humidity.min, humidity.max
            )));
        }
        if self.room_temperature_drop.min < 0.0 || self.room_humidity_drop.min < 0.0 {
            return Err(AppError::config("Room drops cannot be negative"));
        }
        Ok(())
    }
}

/// Parameters of one synthetic dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub user_count: usize,
    pub samples_per_user: usize,
    /// First sample is taken at midnight of this date
    pub start_date: NaiveDate,
    /// No sample may be later than this
    pub end_date: NaiveDateTime,
    pub sample_interval_secs: u64,
    pub field_ranges: FieldRanges,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let (year, month, day) = generation::DEFAULT_START_DATE;
        Self {
            user_count: generation::DEFAULT_USER_COUNT,
            samples_per_user: generation::DEFAULT_SAMPLES_PER_USER,
            start_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            end_date: Utc::now().naive_utc(),
            sample_interval_secs: generation::DEFAULT_INTERVAL_SECS,
            field_ranges: FieldRanges::default(),
            seed: generation::DEFAULT_SEED,
        }
    }
}

impl GeneratorConfig {
    /// Timestamp of the first sample
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start_date.and_hms_opt(0, 0, 0).unwrap_or_default()
    }

    /// Requested spacing between samples
    pub fn interval(&self) -> Result<TimeDelta> {
        i64::try_from(self.sample_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                AppError::config(format!(
                    "Sample interval of {} seconds is too large",
                    self.sample_interval_secs
                ))
            })
    }

    /// Total number of sensor records this config produces
    pub fn total_samples(&self) -> usize {
        self.user_count.saturating_mul(self.samples_per_user)
    }

    /// Check every generation rule, returning the first violation
    pub fn validate(&self) -> Result<()> {
        if self.user_count == 0 {
            return Err(AppError::config("User count must be positive"));
        }
        if self.samples_per_user == 0 {
            return Err(AppError::config("Samples per user must be positive"));
        }
        if self.sample_interval_secs == 0 {
            return Err(AppError::config("Sample interval must be positive"));
        }
        self.interval()?;
        if self.start_datetime() > self.end_date {
            return Err(AppError::config(format!(
                "Start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        self.field_ranges.validate()
    }
}

/// Export behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// CSV export silently stops after this many sensor rows
    pub csv_row_limit: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            csv_row_limit: export::DEFAULT_CSV_ROW_LIMIT,
        }
    }
}

/// Everything persisted in a settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub export: ExportSettings,
}

impl Settings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.generator.validate()?;
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert_eq!(GeneratorConfig::default().total_samples(), 1_000_000);
    }

    #[test]
    fn test_rejects_zero_counts() {
        let cfg = GeneratorConfig { user_count: 0, ..config() };
        assert!(matches!(cfg.validate(), Err(AppError::Configuration(_))));

        let cfg = GeneratorConfig { samples_per_user: 0, ..config() };
        assert!(matches!(cfg.validate(), Err(AppError::Configuration(_))));

        let cfg = GeneratorConfig { sample_interval_secs: 0, ..config() };
        assert!(matches!(cfg.validate(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_rejects_oversized_interval() {
        let cfg = GeneratorConfig {
            user_count: 1,
            samples_per_user: 1,
            sample_interval_secs: u64::MAX,
            ..config()
        };
        assert!(matches!(cfg.interval(), Err(AppError::Configuration(_))));
        assert!(matches!(cfg.validate(), Err(AppError::Configuration(_))));

        let cfg = GeneratorConfig { sample_interval_secs: 3600, ..config() };
        assert_eq!(cfg.interval().unwrap(), TimeDelta::hours(1));
    }

    #[test]
    fn test_rejects_start_after_end() {
        let cfg = GeneratorConfig {
            start_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            ..config()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("after end date"));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let mut cfg = config();
        cfg.field_ranges.outside_temperature = ValueRange::new(95.0, 70.0);
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.field_ranges.outside_humidity = ValueRange::new(50.0, 120.0);
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.field_ranges.room_humidity_drop = ValueRange::new(-5.0, 10.0);
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.field_ranges.outside_temperature = ValueRange::new(f64::NAN, 10.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_settings_save_and_load() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        let mut settings = Settings::default();
        settings.generator = config();
        settings.generator.seed = 7;
        settings.export.csv_row_limit = 250;

        settings.save(file.path()).unwrap();
        let loaded = Settings::load(file.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        std::fs::write(file.path(), r#"{"export": {"csv_row_limit": 5}}"#).unwrap();

        let loaded = Settings::load(file.path()).unwrap();
        assert_eq!(loaded.export.csv_row_limit, 5);
        assert_eq!(loaded.generator.user_count, generation::DEFAULT_USER_COUNT);
    }

    #[test]
    fn test_load_or_default_ignores_missing_file() {
        let settings = Settings::load_or_default(Path::new("does-not-exist.json"));
        assert_eq!(settings.export, ExportSettings::default());
    }
}
