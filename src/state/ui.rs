//! UI interaction state

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::GeneratorConfig;
use crate::constants::export::DATE_FORMAT;
use crate::error::{AppError, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Editable copy of the generator settings shown in the Generate dialog
///
/// Dates are kept as text so half-typed input survives between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForm {
    pub config: GeneratorConfig,
    pub start_date: String,
    pub end_date: String,
    pub interval_hours: f64,
}

impl GenerateForm {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            config: config.clone(),
            start_date: config.start_date.format(DATE_FORMAT).to_string(),
            end_date: config.end_date.format(DATETIME_FORMAT).to_string(),
            interval_hours: config.sample_interval_secs as f64 / 3600.0,
        }
    }

    /// Parse the text fields back into a validated config
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let start_date = NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT)
            .map_err(|e| AppError::config(format!("Start date '{}': {}", self.start_date, e)))?;
        let end_date = parse_end_date(self.end_date.trim())?;

        if !self.interval_hours.is_finite() || self.interval_hours < 0.0 {
            return Err(AppError::config("Sample interval must be a positive number of hours"));
        }

        let config = GeneratorConfig {
            start_date,
            end_date,
            sample_interval_secs: (self.interval_hours * 3600.0).round() as u64,
            ..self.config.clone()
        };
        config.validate()?;
        Ok(config)
    }
}

/// Accepts a full timestamp, or a bare date meaning the end of that day
fn parse_end_date(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(|d| d.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()))
        .map_err(|e| AppError::config(format!("End date '{}': {}", text, e)))
}

/// Error shown in the banner until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub title: String,
    pub message: String,
}

/// Dialog visibility, status line and error banner
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Error message to display in the banner
    pub error: Option<ErrorBanner>,

    /// Last successful operation, shown in the status bar
    pub status: String,

    pub show_generate_dialog: bool,
    pub show_stats_dialog: bool,
    pub show_help: bool,

    /// Present while the Generate dialog is open
    pub generate_form: Option<GenerateForm>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            status: "Ready".to_string(),
            ..Default::default()
        }
    }

    /// Set an error from an `AppError`, using its title and user message
    pub fn set_error(&mut self, err: &AppError) {
        self.error = Some(ErrorBanner {
            title: err.title().to_string(),
            message: err.user_message(),
        });
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn open_generate_dialog(&mut self, config: &GeneratorConfig) {
        self.generate_form = Some(GenerateForm::from_config(config));
        self.show_generate_dialog = true;
    }

    pub fn close_generate_dialog(&mut self) {
        self.generate_form = None;
        self.show_generate_dialog = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> GenerateForm {
        let config = GeneratorConfig {
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ..Default::default()
        };
        GenerateForm::from_config(&config)
    }

    #[test]
    fn test_form_round_trip() {
        let form = form();
        assert_eq!(form.start_date, "2015-01-01");
        assert_eq!(form.end_date, "2020-01-01 00:00:00");
        assert_eq!(form.interval_hours, 6.0);

        let config = form.to_config().unwrap();
        assert_eq!(config, form.config);
    }

    #[test]
    fn test_form_parses_edits() {
        let mut form = form();
        form.start_date = " 2016-03-05 ".to_string();
        form.end_date = "2016-12-31".to_string();
        form.interval_hours = 1.5;

        let config = form.to_config().unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2016, 3, 5).unwrap());
        assert_eq!(
            config.end_date,
            NaiveDate::from_ymd_opt(2016, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap()
        );
        assert_eq!(config.sample_interval_secs, 5400);
    }

    #[test]
    fn test_form_rejects_bad_input() {
        let mut bad_date = form();
        bad_date.start_date = "2016-13-01".to_string();
        assert!(matches!(bad_date.to_config(), Err(AppError::Configuration(_))));

        let mut bad_interval = form();
        bad_interval.interval_hours = f64::NAN;
        assert!(matches!(bad_interval.to_config(), Err(AppError::Configuration(_))));

        let mut zero_users = form();
        zero_users.config.user_count = 0;
        assert!(matches!(zero_users.to_config(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_error_banner() {
        let mut ui = UiState::new();
        assert!(!ui.has_error());
        assert_eq!(ui.status, "Ready");

        ui.set_error(&AppError::EmptyDataset);
        let banner = ui.error.clone().unwrap();
        assert_eq!(banner.title, "Empty Dataset");
        assert!(banner.message.contains("generate IoT data first"));

        ui.clear_error();
        assert!(!ui.has_error());
    }
}
