//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Synthetic dataset defaults
pub mod generation {
    /// Default number of users to synthesize
    pub const DEFAULT_USER_COUNT: usize = 1_000;

    /// Default number of sensor samples per user
    pub const DEFAULT_SAMPLES_PER_USER: usize = 1_000;

    /// Default first sample date (year, month, day), sampled from midnight
    pub const DEFAULT_START_DATE: (i32, u32, u32) = (2015, 1, 1);

    /// Default spacing between samples (6 hours)
    pub const DEFAULT_INTERVAL_SECS: u64 = 6 * 60 * 60;

    /// Default random seed
    pub const DEFAULT_SEED: u64 = 42;

    /// Inclusive age range for generated users
    pub const MIN_AGE: u8 = 18;
    pub const MAX_AGE: u8 = 80;

    /// Outside temperature band (°F)
    pub const OUTSIDE_TEMPERATURE: (f64, f64) = (70.0, 95.0);

    /// Outside humidity band (%)
    pub const OUTSIDE_HUMIDITY: (f64, f64) = (50.0, 95.0);

    /// Room temperature is outside temperature minus a drop in this band
    pub const ROOM_TEMPERATURE_DROP: (f64, f64) = (0.0, 10.0);

    /// Room humidity is outside humidity minus a drop in this band
    pub const ROOM_HUMIDITY_DROP: (f64, f64) = (0.0, 10.0);

    /// Physical humidity bounds
    pub const HUMIDITY_BOUNDS: (f64, f64) = (0.0, 100.0);
}

/// Export defaults
pub mod export {
    /// Maximum number of sensor rows written to CSV
    pub const DEFAULT_CSV_ROW_LIMIT: usize = 10_000;

    /// Date and time formats used by the file formats
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
    pub const TIME_FORMAT: &str = "%H:%M:%S";
}

/// Plotting and visualization defaults
pub mod plot {
    /// Bins for the single outside-temperature histogram
    pub const DENSITY_HISTOGRAM_BINS: usize = 150;

    /// Bins for each panel of the 2x2 grid
    pub const GRID_HISTOGRAM_BINS: usize = 200;

    /// Records shown by the comparison line chart
    pub const COMPARISON_SAMPLE_SIZE: usize = 500;

    /// Figure size at zoom 1.0 (inches)
    pub const FIGURE_SIZE: (f64, f64) = (12.0, 9.0);
    pub const GRID_FIGURE_SIZE: (f64, f64) = (12.0, 10.0);

    /// Pixels per inch on screen
    pub const SCREEN_DPI: f64 = 100.0;

    /// Resolution of exported images
    pub const EXPORT_DPI: f64 = 300.0;
}

/// Zoom and scroll behaviour of plot windows
pub mod viewport {
    /// Additive zoom step (25%)
    pub const ZOOM_STEP: f64 = 0.25;

    /// Zoom bounds for the zoom buttons
    pub const MIN_ZOOM: f64 = 0.25;
    pub const MAX_ZOOM: f64 = 5.0;

    /// Share of the window the figure may occupy after auto-fit
    pub const FIT_WIDTH_SHARE: f64 = 0.95;
    pub const FIT_HEIGHT_SHARE: f64 = 0.9;

    /// Pixels per scroll line
    pub const SCROLL_LINE: f64 = 20.0;

    /// Lines per page / arrow key scroll
    pub const PAGE_LINES: f64 = 10.0;
    pub const ARROW_LINES: f64 = 3.0;
}

/// UI layout defaults
pub mod layout {
    /// Main window size
    pub const WINDOW_SIZE: [f32; 2] = [1000.0, 700.0];

    /// Plot window size
    pub const PLOT_WINDOW_SIZE: [f32; 2] = [1000.0, 800.0];

    /// Statistics dialog size
    pub const STATS_DIALOG_SIZE: [f32; 2] = [600.0, 400.0];

    /// Users shown in the preview table
    pub const PREVIEW_ROWS: usize = 10;

    /// Address characters shown before truncation in the preview table
    pub const PREVIEW_ADDRESS_CHARS: usize = 50;

    /// Table header row height
    pub const TABLE_HEADER_HEIGHT: f32 = 20.0;
}

/// Configuration file paths
pub mod config {
    /// Settings file picked up from the working directory at start-up
    pub const CONFIG_FILE: &str = "iot-forge.json";
}
