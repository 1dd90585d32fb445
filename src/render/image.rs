//! Chart image export through plotters
//!
//! Images are drawn at [`EXPORT_DPI`] of the figure's base size, whatever the
//! zoom of the window they were requested from.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use super::{ChartData, Panel, PanelContent, pdf};
use crate::constants::plot::EXPORT_DPI;
use crate::error::{AppError, Result};

const FONT_FAMILY: &str = "sans-serif";
const ANNOTATION_FILL: RGBColor = RGBColor(245, 222, 179);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
    Pdf,
}

impl ImageFormat {
    /// Format from the file extension; no extension means PNG
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(extension) = path.extension().and_then(|s| s.to_str()) else {
            return Ok(ImageFormat::Png);
        };
        match extension.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            other => Err(AppError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

/// Pixel size of `chart` at `dpi`
pub fn pixel_size(chart: &ChartData, dpi: f64) -> (u32, u32) {
    (
        (chart.figure_inches.0 * dpi).round().max(1.0) as u32,
        (chart.figure_inches.1 * dpi).round().max(1.0) as u32,
    )
}

/// Write `chart` to `path`
pub fn export_image(chart: &ChartData, path: &Path, format: ImageFormat) -> Result<()> {
    profiling::scope!("export_image");
    ensure_font()?;

    let size = pixel_size(chart, EXPORT_DPI);
    let scale = EXPORT_DPI / 72.0;

    match format {
        ImageFormat::Png => {
            // Surface unwritable destinations as I/O errors before drawing
            std::fs::File::create(path)?;
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_chart(&root, chart, scale)?;
            root.present().map_err(AppError::render)?;
        }
        ImageFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
                draw_chart(&root, chart, scale)?;
                root.present().map_err(AppError::render)?;
            }
            std::fs::write(path, svg)?;
        }
        ImageFormat::Pdf => {
            let mut rgb = vec![0u8; size.0 as usize * size.1 as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut rgb, size).into_drawing_area();
                draw_chart(&root, chart, scale)?;
                root.present().map_err(AppError::render)?;
            }
            pdf::write_pdf(path, size, &rgb, EXPORT_DPI)?;
        }
    }

    tracing::info!(?format, width = size.0, height = size.1, "Saved plot to {}", path.display());
    Ok(())
}

/// plotters has no built-in fonts with `ab_glyph`; reuse egui's default face
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| {
            let bytes = default_font_bytes().ok_or("No default font available")?;
            register_font(FONT_FAMILY, FontStyle::Normal, bytes)
                .map_err(|_| "Default font could not be parsed".to_string())
        })
        .clone()
        .map_err(AppError::Render)
}

fn default_font_bytes() -> Option<&'static [u8]> {
    let fonts = egui::FontDefinitions::default();
    let name = fonts.families.get(&egui::FontFamily::Proportional)?.first()?;
    let data = fonts.font_data.get(name)?;
    Some(match &data.font {
        Cow::Borrowed(bytes) => *bytes,
        Cow::Owned(bytes) => Box::leak(bytes.clone().into_boxed_slice()),
    })
}

fn font(points: f64, scale: f64) -> FontDesc<'static> {
    (FONT_FAMILY, points * scale).into_font()
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartData,
    scale: f64,
) -> Result<()> {
    root.fill(&WHITE).map_err(AppError::render)?;

    let body = match &chart.title {
        Some(title) => {
            let line_height = (16.0 * scale) as i32;
            let lines: Vec<&str> = title.lines().collect();
            let header = (line_height * (lines.len() as i32 + 1)) as u32;
            let (top, rest) = root.split_vertically(header);

            let center = top.dim_in_pixel().0 as i32 / 2;
            let style = TextStyle::from(font(12.0, scale)).pos(Pos::new(HPos::Center, VPos::Top));
            for (i, line) in lines.iter().enumerate() {
                let y = line_height / 2 + i as i32 * line_height;
                top.draw(&Text::new(*line, (center, y), style.clone()))
                    .map_err(AppError::render)?;
            }
            rest
        }
        None => root.clone(),
    };

    let areas = body.split_evenly(chart.kind.layout());
    for (area, panel) in areas.iter().zip(&chart.panels) {
        draw_panel(area, panel, scale)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    scale: f64,
) -> Result<()> {
    let px = |points: f64| (points * scale) as u32;
    let (x_min, x_max, y_min, y_max) = panel.bounds();

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} {}", panel.title, panel.subtitle), font(12.0, scale))
        .margin(px(8.0))
        .x_label_area_size(px(30.0))
        .y_label_area_size(px(45.0))
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(AppError::render)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .label_style(font(8.0, scale))
        .axis_desc_style(font(10.0, scale))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(AppError::render)?;

    match &panel.content {
        PanelContent::Histogram { bins, color } => {
            let fill: RGBColor = (*color).into();
            chart
                .draw_series(bins.iter().map(|b| {
                    Rectangle::new([(b.left, 0.0), (b.right(), b.density)], fill.mix(0.7).filled())
                }))
                .map_err(AppError::render)?;
            chart
                .draw_series(bins.iter().filter(|b| b.density > 0.0).map(|b| {
                    Rectangle::new([(b.left, 0.0), (b.right(), b.density)], BLACK.stroke_width(1))
                }))
                .map_err(AppError::render)?;
        }
        PanelContent::Lines(series) => {
            let width = px(1.5).max(1);
            for s in series {
                let color: RGBColor = s.color.into();
                chart
                    .draw_series(LineSeries::new(
                        s.points.iter().map(|p| (p[0], p[1])),
                        color.stroke_width(width),
                    ))
                    .map_err(AppError::render)?
                    .label(s.name.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
                    });
            }
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(font(10.0, scale))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(AppError::render)?;
        }
    }

    if !panel.annotation.is_empty() {
        let line_height = (12.0 * scale) as i32;
        let pad = (6.0 * scale) as i32;
        let longest = panel.annotation.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let box_w = (longest as f64 * 9.0 * 0.55 * scale) as i32 + 2 * pad;
        let box_h = panel.annotation.len() as i32 * line_height + 2 * pad;
        let anchor = (x_min, y_max);

        chart
            .draw_series(std::iter::once(
                EmptyElement::at(anchor)
                    + Rectangle::new(
                        [(pad, pad), (pad + box_w, pad + box_h)],
                        ANNOTATION_FILL.mix(0.8).filled(),
                    ),
            ))
            .map_err(AppError::render)?;
        chart
            .draw_series(panel.annotation.iter().enumerate().map(|(i, line)| {
                EmptyElement::at(anchor)
                    + Text::new(
                        line.clone(),
                        (2 * pad, 2 * pad + i as i32 * line_height),
                        font(9.0, scale),
                    )
            }))
            .map_err(AppError::render)?;
    }

    Ok(())
}
