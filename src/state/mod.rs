//! Application state management
//!
//! The dataset, settings, open plot windows and UI flags live here. The
//! `app` module mutates this state in response to menu actions.

mod ui;
mod view;

pub use ui::UiState;
pub use view::{ScrollAmount, ScrollDirection, Viewport};

use crate::config::Settings;
use crate::constants::layout::PLOT_WINDOW_SIZE;
use crate::data::{Dataset, StatsReport};
use crate::error::{AppError, Result};
use crate::render::ChartData;
use std::path::PathBuf;

/// One open chart window
#[derive(Debug, Clone)]
pub struct PlotWindow {
    /// Unique per session, used as the egui window id
    pub id: u64,
    pub chart: ChartData,
    pub viewport: Viewport,
    pub open: bool,
    /// Fit to the window once its size is known
    pub needs_fit: bool,
}

impl PlotWindow {
    pub fn new(id: u64, chart: ChartData) -> Self {
        let window = [PLOT_WINDOW_SIZE[0] as f64, PLOT_WINDOW_SIZE[1] as f64];
        Self {
            id,
            viewport: Viewport::new(chart.screen_size(), window),
            chart,
            open: true,
            needs_fit: true,
        }
    }
}

/// Main application state container
pub struct AppState {
    /// Generated or imported data
    pub dataset: Option<Dataset>,

    /// Generator and export settings
    pub settings: Settings,

    /// UI interaction state
    pub ui: UiState,

    /// Report shown by the statistics dialog
    pub report: Option<StatsReport>,

    pub plots: Vec<PlotWindow>,
    next_plot_id: u64,

    /// File the dataset was last loaded from or saved to
    pub current_file: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            dataset: None,
            settings,
            ui: UiState::new(),
            report: None,
            plots: Vec::new(),
            next_plot_id: 0,
            current_file: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.dataset.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// The current dataset, or `EmptyDataset` when there is nothing to work on
    pub fn require_dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .filter(|d| !d.is_empty())
            .ok_or(AppError::EmptyDataset)
    }

    /// Replace the dataset; reports computed from the old one are dropped
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>) {
        self.dataset = Some(dataset);
        self.report = None;
        self.ui.show_stats_dialog = false;
        self.current_file = source;
    }

    pub fn open_plot(&mut self, chart: ChartData) {
        self.next_plot_id += 1;
        self.plots.push(PlotWindow::new(self.next_plot_id, chart));
    }

    /// Drop windows the user closed this frame
    pub fn retain_open_plots(&mut self) {
        self.plots.retain(|p| p.open);
    }
}
