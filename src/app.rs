use std::path::Path;

use crate::config::{GeneratorConfig, Settings};
use crate::data::export::{self, import_json};
use crate::data::stats::{describe, group_thousands};
use crate::data::{ExportFormat, synth};
use crate::error::{AppError, Result};
use crate::render::{ChartData, ImageFormat, PlotKind, export_image};
use crate::state::AppState;

pub struct IotForge {
    pub state: AppState,
}

impl Default for IotForge {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl IotForge {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }

    /// Log and surface an error in the banner, passing successes through
    fn report<T>(&mut self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("{} failed: {}", action, e);
                self.state.ui.set_error(&e);
                None
            }
        }
    }

    /// Synthesize a dataset and keep `config` as the new generator settings
    pub fn generate(&mut self, config: GeneratorConfig) -> Result<()> {
        let dataset = synth::generate(&config)?;
        let status = format!(
            "Generated {} user records with {} sensor records",
            group_thousands(dataset.users().len()),
            group_thousands(dataset.sensors().len())
        );
        self.state.settings.generator = config;
        self.state.set_dataset(dataset, None);
        self.state.ui.set_status(status);
        Ok(())
    }

    /// Confirm the Generate dialog
    pub fn submit_generate_form(&mut self) {
        let Some(form) = self.state.ui.generate_form.as_ref() else {
            return;
        };
        let config = form.to_config();
        let result = config.and_then(|config| self.generate(config));
        if self.report("Generation", result).is_some() {
            self.state.ui.close_generate_dialog();
        }
    }

    pub fn save_dataset(&mut self, path: &Path, format: ExportFormat) -> Result<()> {
        let dataset = self.state.require_dataset()?;
        let summary = export::export(dataset, format, path, &self.state.settings.export)?;
        self.state.ui.set_status(summary.status_message());
        self.state.current_file = Some(path.to_path_buf());
        Ok(())
    }

    pub fn load_dataset(&mut self, path: &Path) -> Result<()> {
        let dataset = import_json(path)?;
        let status = format!(
            "Loaded {} user records with {} sensor records from {}",
            group_thousands(dataset.users().len()),
            group_thousands(dataset.sensors().len()),
            path.display()
        );
        self.state.set_dataset(dataset, Some(path.to_path_buf()));
        self.state.ui.set_status(status);
        Ok(())
    }

    pub fn show_statistics(&mut self) -> Result<()> {
        let report = describe(self.state.require_dataset()?)?;
        self.state.report = Some(report);
        self.state.ui.show_stats_dialog = true;
        Ok(())
    }

    pub fn open_plot(&mut self, kind: PlotKind) -> Result<()> {
        let chart = ChartData::build(self.state.require_dataset()?, kind)?;
        self.state.open_plot(chart);
        self.state.ui.set_status(format!("Opened {}", kind.window_title()));
        Ok(())
    }

    /// Write the chart of plot window `id` to `path`
    pub fn save_plot_image(&mut self, id: u64, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)?;
        let window = self
            .state
            .plots
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::render("plot window is closed"))?;
        export_image(&window.chart, path, format)?;
        tracing::info!("Saved plot to {}", path.display());
        self.state.ui.set_status(format!("Plot saved: {}", path.display()));
        Ok(())
    }

    fn copy_report_text(&mut self) -> Result<()> {
        let text = self
            .state
            .report
            .as_ref()
            .map(|r| r.to_text())
            .ok_or(AppError::EmptyDataset)?;
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        self.state.ui.set_status("Statistics copied to clipboard");
        Ok(())
    }

    // Menu actions. Each opens a native dialog where needed and reports
    // failures through the error banner.

    pub fn on_generate(&mut self) {
        let config = self.state.settings.generator.clone();
        self.state.ui.open_generate_dialog(&config);
    }

    pub fn on_open_json(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            let result = self.load_dataset(&path);
            self.report("Open JSON", result);
        }
    }

    pub fn on_save(&mut self, format: ExportFormat) {
        // Checked before the dialog so the user is not asked for a path in vain
        let has_data = self.state.require_dataset().map(|_| ());
        if self.report("Save", has_data).is_none() {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(format!("iot_data.{}", format.extension()))
            .save_file()
        {
            // A typed extension wins over the menu entry
            let path = if path.extension().is_none() {
                path.with_extension(format.extension())
            } else {
                path
            };
            let result =
                ExportFormat::from_path(&path).and_then(|format| self.save_dataset(&path, format));
            self.report("Save", result);
        }
    }

    pub fn on_save_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(crate::constants::config::CONFIG_FILE)
            .save_file()
        {
            let result = self.state.settings.save(&path);
            if self.report("Save settings", result).is_some() {
                self.state.ui.set_status(format!("Settings saved to {}", path.display()));
            }
        }
    }

    pub fn on_load_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            let result = Settings::load(&path);
            if let Some(settings) = self.report("Load settings", result) {
                self.state.settings = settings;
                self.state.ui.set_status(format!("Settings loaded from {}", path.display()));
            }
        }
    }

    pub fn on_statistics(&mut self) {
        let result = self.show_statistics();
        self.report("Statistics", result);
    }

    pub fn on_plot(&mut self, kind: PlotKind) {
        let result = self.open_plot(kind);
        self.report("Plot", result);
    }

    pub fn on_copy_report(&mut self) {
        let result = self.copy_report_text();
        self.report("Copy statistics", result);
    }

    pub fn on_save_plot(&mut self, id: u64) {
        let Some(kind) = self.state.plots.iter().find(|p| p.id == id).map(|p| p.chart.kind) else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("PDF", &["pdf"])
            .add_filter("SVG", &["svg"])
            .set_file_name(default_plot_name(kind))
            .save_file()
        {
            let result = self.save_plot_image(id, &path);
            self.report("Save plot", result);
        }
    }
}

fn default_plot_name(kind: PlotKind) -> String {
    let stem = match kind {
        PlotKind::DensityHistogram => "plot_a",
        PlotKind::ComparisonLine => "plot_b",
        PlotKind::Grid2x2 => "plot_c",
    };
    format!("{}.png", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            user_count: 4,
            samples_per_user: 3,
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_updates_state() {
        let mut app = IotForge::default();
        app.generate(small_config()).unwrap();

        assert!(app.state.has_data());
        assert_eq!(app.state.settings.generator.user_count, 4);
        assert_eq!(app.state.ui.status, "Generated 4 user records with 12 sensor records");
    }

    #[test]
    fn test_submit_form_reports_errors() {
        let mut app = IotForge::default();
        app.on_generate();
        assert!(app.state.ui.show_generate_dialog);

        if let Some(form) = app.state.ui.generate_form.as_mut() {
            form.config.user_count = 0;
        }
        app.submit_generate_form();
        assert!(app.state.ui.has_error());
        assert!(app.state.ui.show_generate_dialog);
        assert!(!app.state.has_data());

        app.state.ui.clear_error();
        app.state.settings.generator = small_config();
        app.on_generate();
        app.submit_generate_form();
        assert!(!app.state.ui.has_error());
        assert!(!app.state.ui.show_generate_dialog);
        assert!(app.state.has_data());
    }

    #[test]
    fn test_save_and_load_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("iot_data.json");

        let mut app = IotForge::default();
        app.generate(small_config()).unwrap();
        app.save_dataset(&path, ExportFormat::Json).unwrap();
        assert!(app.state.ui.status.starts_with("Saved 12 sensor records"));

        let mut other = IotForge::default();
        other.load_dataset(&path).unwrap();
        assert_eq!(other.state.dataset, app.state.dataset);
        assert_eq!(other.state.current_file, Some(path));
    }

    #[test]
    fn test_actions_without_data() {
        let mut app = IotForge::default();
        assert!(matches!(app.show_statistics(), Err(AppError::EmptyDataset)));
        assert!(matches!(
            app.open_plot(PlotKind::Grid2x2),
            Err(AppError::EmptyDataset)
        ));

        app.on_statistics();
        assert_eq!(app.state.ui.error.as_ref().unwrap().title, "Empty Dataset");
    }

    #[test]
    fn test_statistics_and_plots() {
        let mut app = IotForge::default();
        app.generate(small_config()).unwrap();

        app.show_statistics().unwrap();
        assert!(app.state.ui.show_stats_dialog);
        assert_eq!(app.state.report.as_ref().unwrap().record_count, 12);

        for kind in PlotKind::ALL {
            app.open_plot(kind).unwrap();
        }
        assert_eq!(app.state.plots.len(), 3);
    }

    #[test]
    fn test_save_plot_image() {
        let dir = tempdir().unwrap();
        let mut app = IotForge::default();
        app.generate(small_config()).unwrap();
        app.open_plot(PlotKind::ComparisonLine).unwrap();
        let id = app.state.plots[0].id;

        let path = dir.path().join("plot_b.svg");
        app.save_plot_image(id, &path).unwrap();
        assert!(path.exists());

        let bad = dir.path().join("plot_b.bmp");
        assert!(matches!(
            app.save_plot_image(id, &bad),
            Err(AppError::UnsupportedFormat { .. })
        ));
        assert!(app.save_plot_image(id + 1, &path).is_err());
    }
}
