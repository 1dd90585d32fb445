//! Chart preparation shared by the on-screen plots and image export
//!
//! [`ChartData::build`] turns a dataset into panels of histogram bins or line
//! series plus their annotation text. Drawing is left to `ui::plot_window`
//! (egui_plot) and [`image`] (plotters).

pub mod image;
mod pdf;

pub use image::{ImageFormat, export_image};

use crate::constants::plot::{
    COMPARISON_SAMPLE_SIZE, DENSITY_HISTOGRAM_BINS, FIGURE_SIZE, GRID_FIGURE_SIZE,
    GRID_HISTOGRAM_BINS, SCREEN_DPI,
};
use crate::data::stats::{group_thousands, summarize};
use crate::data::{Dataset, Measurement};
use crate::error::{AppError, Result};

/// Plain RGB colour convertible to both drawing libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
    pub const RED: Rgb = Rgb(214, 39, 40);
    pub const ORANGE: Rgb = Rgb(255, 127, 14);
}

impl From<Rgb> for egui::Color32 {
    fn from(c: Rgb) -> Self {
        egui::Color32::from_rgb(c.0, c.1, c.2)
    }
}

impl From<Rgb> for plotters::style::RGBColor {
    fn from(c: Rgb) -> Self {
        plotters::style::RGBColor(c.0, c.1, c.2)
    }
}

/// The three charts offered by the Statistics menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Plot A
    DensityHistogram,
    /// Plot B
    ComparisonLine,
    /// Plot C
    Grid2x2,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [
        PlotKind::DensityHistogram,
        PlotKind::ComparisonLine,
        PlotKind::Grid2x2,
    ];

    pub fn menu_label(&self) -> &'static str {
        match self {
            PlotKind::DensityHistogram => "Plot A: Outside Temperature Density",
            PlotKind::ComparisonLine => "Plot B: Outside vs Room Temperature",
            PlotKind::Grid2x2 => "Plot C: All Measurement Densities",
        }
    }

    pub fn window_title(&self) -> &'static str {
        match self {
            PlotKind::DensityHistogram => "Plot A - Density Plot",
            PlotKind::ComparisonLine => "Plot B - Temperature Comparison",
            PlotKind::Grid2x2 => "Plot C - Density Distributions",
        }
    }

    /// Figure size at 100% zoom, in inches
    pub fn figure_inches(&self) -> (f64, f64) {
        match self {
            PlotKind::Grid2x2 => GRID_FIGURE_SIZE,
            _ => FIGURE_SIZE,
        }
    }

    /// Panel grid as (rows, columns)
    pub fn layout(&self) -> (usize, usize) {
        match self {
            PlotKind::Grid2x2 => (2, 2),
            _ => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub width: f64,
    /// Normalised so the bar areas sum to one
    pub density: f64,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    /// (sample index, value)
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Histogram { bins: Vec<HistogramBin>, color: Rgb },
    Lines(Vec<LineSeries>),
}

/// One set of axes
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub subtitle: String,
    pub x_label: String,
    pub y_label: String,
    pub content: PanelContent,
    /// Text box drawn in the top-left corner
    pub annotation: Vec<String>,
}

impl Panel {
    /// Data bounds as (x_min, x_max, y_min, y_max)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match &self.content {
            PanelContent::Histogram { bins, .. } => {
                let x_min = bins.first().map_or(0.0, |b| b.left);
                let x_max = bins.last().map_or(1.0, |b| b.right());
                let y_max = bins.iter().map(|b| b.density).fold(0.0, f64::max);
                (x_min, x_max, 0.0, y_max * 1.05)
            }
            PanelContent::Lines(series) => {
                let points = series.iter().flat_map(|s| s.points.iter());
                let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
                let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
                for p in points {
                    x_min = x_min.min(p[0]);
                    x_max = x_max.max(p[0]);
                    y_min = y_min.min(p[1]);
                    y_max = y_max.max(p[1]);
                }
                if !x_min.is_finite() {
                    return (0.0, 1.0, 0.0, 1.0);
                }
                let pad = ((y_max - y_min) * 0.05).max(0.5);
                (x_min, x_max.max(x_min + 1.0), y_min - pad, y_max + pad)
            }
        }
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: PlotKind,
    /// Figure title, only set for multi-panel charts
    pub title: Option<String>,
    pub panels: Vec<Panel>,
    /// Figure size at 100% zoom, in inches
    pub figure_inches: (f64, f64),
}

impl ChartData {
    pub fn build(dataset: &Dataset, kind: PlotKind) -> Result<Self> {
        profiling::scope!("ChartData::build");
        if dataset.is_empty() {
            return Err(AppError::EmptyDataset);
        }

        let (title, panels) = match kind {
            PlotKind::DensityHistogram => (None, vec![density_panel(dataset)?]),
            PlotKind::ComparisonLine => (None, vec![comparison_panel(dataset)]),
            PlotKind::Grid2x2 => {
                let panels = [
                    (Measurement::OutsideTemperature, Rgb::BLUE),
                    (Measurement::RoomTemperature, Rgb::GREEN),
                    (Measurement::OutsideHumidity, Rgb::RED),
                    (Measurement::RoomHumidity, Rgb::ORANGE),
                ]
                .into_iter()
                .map(|(m, color)| grid_panel(dataset, m, color))
                .collect::<Result<Vec<_>>>()?;
                let title = format!(
                    "Density Distributions of All Measurements\nTotal: {} data points",
                    group_thousands(dataset.sensors().len())
                );
                (Some(title), panels)
            }
        };

        tracing::debug!(?kind, panels = panels.len(), "Built chart data");
        Ok(Self {
            kind,
            title,
            panels,
            figure_inches: kind.figure_inches(),
        })
    }

    /// On-screen size at 100% zoom, in pixels
    pub fn screen_size(&self) -> [f64; 2] {
        [
            self.figure_inches.0 * SCREEN_DPI,
            self.figure_inches.1 * SCREEN_DPI,
        ]
    }
}

/// Equal-width bins over `[min, max]`, normalised to unit area
///
/// A constant column gets the unit interval around its value.
pub fn density_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = ((v - min) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }

    let norm = values.len() as f64 * width;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            left: min + i as f64 * width,
            width,
            density: count as f64 / norm,
        })
        .collect()
}

fn density_panel(dataset: &Dataset) -> Result<Panel> {
    let measurement = Measurement::OutsideTemperature;
    let values = dataset.values(measurement);
    let s = summarize(&values)?;
    let unit = measurement.unit();

    Ok(Panel {
        title: format!("Density Plot of {}", measurement.label()),
        subtitle: format!("({} data points)", group_thousands(values.len())),
        x_label: format!("{} ({})", measurement.label(), unit),
        y_label: "Density".to_string(),
        content: PanelContent::Histogram {
            bins: density_histogram(&values, DENSITY_HISTOGRAM_BINS),
            color: Rgb::BLUE,
        },
        annotation: vec![
            format!("Mean: {:.2}{}", s.mean, unit),
            format!("Std Dev: {:.2}{}", s.std_dev, unit),
            format!("Range: {:.2} - {:.2}{}", s.min, s.max, unit),
        ],
    })
}

fn comparison_panel(dataset: &Dataset) -> Panel {
    let total = dataset.sensors().len();
    let sample = &dataset.sensors()[..total.min(COMPARISON_SAMPLE_SIZE)];

    let series = |m: Measurement, color: Rgb| LineSeries {
        name: m.label().to_string(),
        color,
        points: sample
            .iter()
            .enumerate()
            .map(|(i, r)| [i as f64, m.value(r)])
            .collect(),
    };

    let diffs: Vec<f64> = sample
        .iter()
        .map(|r| r.outside_temperature - r.room_temperature)
        .collect();
    let avg_diff = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let max_diff = diffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Panel {
        title: "Outside vs Room Temperature".to_string(),
        subtitle: format!(
            "(First {} of {} samples)",
            group_thousands(sample.len()),
            group_thousands(total)
        ),
        x_label: "Sample Index".to_string(),
        y_label: "Temperature (°F)".to_string(),
        content: PanelContent::Lines(vec![
            series(Measurement::OutsideTemperature, Rgb::RED),
            series(Measurement::RoomTemperature, Rgb::BLUE),
        ]),
        annotation: vec![
            format!("Average difference: {:.2}°F", avg_diff),
            format!("Max difference: {:.2}°F", max_diff),
        ],
    }
}

fn grid_panel(dataset: &Dataset, measurement: Measurement, color: Rgb) -> Result<Panel> {
    let values = dataset.values(measurement);
    let s = summarize(&values)?;
    let unit = measurement.unit();

    Ok(Panel {
        title: measurement.label().to_string(),
        subtitle: format!("n={}", group_thousands(values.len())),
        x_label: format!("{} ({})", measurement.label(), unit),
        y_label: "Density".to_string(),
        content: PanelContent::Histogram {
            bins: density_histogram(&values, GRID_HISTOGRAM_BINS),
            color,
        },
        annotation: vec![
            format!("μ={:.2}{}", s.mean, unit),
            format!("σ={:.2}{}", s.std_dev, unit),
            format!("Range: {:.1}-{:.1}{}", s.min, s.max, unit),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset_with_temperatures;

    #[test]
    fn test_density_histogram_area() {
        let values: Vec<f64> = (0..1000).map(|i| (i % 37) as f64 * 0.7).collect();
        let bins = density_histogram(&values, 150);

        assert_eq!(bins.len(), 150);
        let area: f64 = bins.iter().map(|b| b.density * b.width).sum();
        assert!((area - 1.0).abs() < 1e-9);
        assert_eq!(bins[0].left, 0.0);
        assert!((bins[149].right() - 36.0 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_density_histogram_constant_values() {
        let bins = density_histogram(&[5.0, 5.0, 5.0], 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].left, 4.5);
        let area: f64 = bins.iter().map(|b| b.density * b.width).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_chart() {
        let dataset = dataset_with_temperatures(&[10.0, 20.0, 30.0]);
        let chart = ChartData::build(&dataset, PlotKind::DensityHistogram).unwrap();

        assert_eq!(chart.panels.len(), 1);
        let panel = &chart.panels[0];
        match &panel.content {
            PanelContent::Histogram { bins, color } => {
                assert_eq!(bins.len(), DENSITY_HISTOGRAM_BINS);
                assert_eq!(*color, Rgb::BLUE);
            }
            other => panic!("unexpected content {:?}", other),
        }
        assert_eq!(panel.annotation[0], "Mean: 20.00°F");
        assert_eq!(panel.annotation[2], "Range: 10.00 - 30.00°F");
        assert_eq!(chart.screen_size(), [1200.0, 900.0]);
    }

    #[test]
    fn test_comparison_chart_uses_first_samples() {
        let temps: Vec<f64> = (0..600).map(|i| 70.0 + (i % 20) as f64).collect();
        let dataset = dataset_with_temperatures(&temps);
        let chart = ChartData::build(&dataset, PlotKind::ComparisonLine).unwrap();

        let PanelContent::Lines(series) = &chart.panels[0].content else {
            panic!("expected line series");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Outside Temperature");
        assert_eq!(series[0].points.len(), COMPARISON_SAMPLE_SIZE);
        assert_eq!(series[0].points[3], [3.0, 73.0]);
        assert_eq!(series[1].points[3], [3.0, 68.0]);
        assert_eq!(chart.panels[0].subtitle, "(First 500 of 600 samples)");
        assert_eq!(chart.panels[0].annotation[0], "Average difference: 5.00°F");
    }

    #[test]
    fn test_grid_chart_order_and_colors() {
        let dataset = dataset_with_temperatures(&[70.0, 80.0, 90.0]);
        let chart = ChartData::build(&dataset, PlotKind::Grid2x2).unwrap();

        let titles: Vec<&str> = chart.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Outside Temperature", "Room Temperature", "Outside Humidity", "Room Humidity"]
        );
        let colors: Vec<Rgb> = chart
            .panels
            .iter()
            .map(|p| match &p.content {
                PanelContent::Histogram { color, bins } => {
                    assert_eq!(bins.len(), GRID_HISTOGRAM_BINS);
                    *color
                }
                _ => panic!("grid panels are histograms"),
            })
            .collect();
        assert_eq!(colors, [Rgb::BLUE, Rgb::GREEN, Rgb::RED, Rgb::ORANGE]);
        assert_eq!(chart.panels[0].subtitle, "n=3");
        assert!(chart.title.as_deref().unwrap().contains("Total: 3 data points"));
        assert_eq!(chart.figure_inches, GRID_FIGURE_SIZE);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        for kind in PlotKind::ALL {
            assert!(matches!(
                ChartData::build(&Dataset::default(), kind),
                Err(AppError::EmptyDataset)
            ));
        }
    }

    #[test]
    fn test_panel_bounds() {
        let dataset = dataset_with_temperatures(&[10.0, 20.0, 30.0]);
        let chart = ChartData::build(&dataset, PlotKind::DensityHistogram).unwrap();
        let (x_min, x_max, y_min, y_max) = chart.panels[0].bounds();
        assert_eq!((x_min, y_min), (10.0, 0.0));
        assert!((x_max - 30.0).abs() < 1e-9);
        assert!(y_max > 0.0);
    }
}
