//! Chart windows with zoom and scroll
//!
//! The chart is drawn at `Viewport::content_size()` inside a scroll area.
//! Plot-level zoom and drag are disabled; the whole figure scales instead.

use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot};

use crate::app::IotForge;
use crate::constants::layout::PLOT_WINDOW_SIZE;
use crate::render::{ChartData, Panel, PanelContent};
use crate::state::{PlotWindow, ScrollAmount, ScrollDirection, Viewport};

/// Space reserved above each panel for its title, subtitle and annotation
const PANEL_HEADER: f32 = 64.0;
/// Space reserved for the figure title of multi-panel charts
const FIGURE_HEADER: f32 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotAction {
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Fit,
    Scroll(ScrollDirection, ScrollAmount),
    Save,
    Close,
}

/// Keyboard binding of a plot window
pub fn key_action(key: egui::Key) -> Option<PlotAction> {
    use egui::Key;
    let action = match key {
        Key::Plus | Key::Equals => PlotAction::ZoomIn,
        Key::Minus => PlotAction::ZoomOut,
        Key::Num0 | Key::Home => PlotAction::ResetZoom,
        Key::F | Key::F11 => PlotAction::Fit,
        Key::Escape => PlotAction::Close,
        Key::PageUp => PlotAction::Scroll(ScrollDirection::Up, ScrollAmount::Page),
        Key::PageDown => PlotAction::Scroll(ScrollDirection::Down, ScrollAmount::Page),
        Key::ArrowUp => PlotAction::Scroll(ScrollDirection::Up, ScrollAmount::ARROW),
        Key::ArrowDown => PlotAction::Scroll(ScrollDirection::Down, ScrollAmount::ARROW),
        Key::ArrowLeft => PlotAction::Scroll(ScrollDirection::Left, ScrollAmount::ARROW),
        Key::ArrowRight => PlotAction::Scroll(ScrollDirection::Right, ScrollAmount::ARROW),
        _ => return None,
    };
    Some(action)
}

/// Apply a viewport action; Save and Close are left to the caller
pub fn apply_action(viewport: &mut Viewport, action: PlotAction) {
    match action {
        PlotAction::ZoomIn => viewport.zoom_in(),
        PlotAction::ZoomOut => viewport.zoom_out(),
        PlotAction::ResetZoom => viewport.reset_zoom(),
        PlotAction::Fit => viewport.fit_to_window(viewport.window()),
        PlotAction::Scroll(direction, amount) => viewport.scroll(direction, amount),
        PlotAction::Save | PlotAction::Close => {}
    }
}

pub fn render_plot_windows(app: &mut IotForge, ctx: &egui::Context) {
    profiling::scope!("render_plot_windows");

    let mut save_requests = Vec::new();
    for plot in &mut app.state.plots {
        if render_plot_window(plot, ctx) {
            save_requests.push(plot.id);
        }
    }
    for id in save_requests {
        app.on_save_plot(id);
    }
    app.state.retain_open_plots();
}

/// Returns true when the user asked to save the chart
fn render_plot_window(plot: &mut PlotWindow, ctx: &egui::Context) -> bool {
    let mut open = plot.open;
    let mut actions = Vec::new();

    egui::Window::new(plot.chart.kind.window_title())
        .id(egui::Id::new(("plot_window", plot.id)))
        .default_size(PLOT_WINDOW_SIZE)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🔍+ Zoom In").clicked() {
                    actions.push(PlotAction::ZoomIn);
                }
                if ui.button("🔍- Zoom Out").clicked() {
                    actions.push(PlotAction::ZoomOut);
                }
                if ui.button("Reset Zoom").clicked() {
                    actions.push(PlotAction::ResetZoom);
                }
                if ui.button("Fit to Window").clicked() {
                    actions.push(PlotAction::Fit);
                }
                ui.separator();
                if ui.button("💾 Save Plot").clicked() {
                    actions.push(PlotAction::Save);
                }
                ui.separator();
                ui.label(format!("Zoom: {}%", plot.viewport.zoom_percent()));
                if plot.viewport.is_scrollable() {
                    ui.separator();
                    ui.weak("Arrows / PgUp / PgDn to scroll");
                }
            });
            ui.separator();

            let available = ui.available_size();
            let window = [available.x as f64, available.y as f64];
            if plot.needs_fit {
                plot.viewport.fit_to_window(window);
                plot.needs_fit = false;
            } else {
                plot.viewport.resize(window);
            }

            // Keys go to the frontmost plot window only
            let focused = ctx.top_layer_id() == Some(ui.layer_id()) && !ctx.wants_keyboard_input();
            if focused {
                ctx.input(|i| {
                    for event in &i.events {
                        if let egui::Event::Key { key, pressed: true, .. } = event {
                            actions.extend(key_action(*key));
                        }
                    }
                });
            }
            for action in &actions {
                apply_action(&mut plot.viewport, *action);
            }

            let [w, h] = plot.viewport.content_size();
            let [x, y] = plot.viewport.scroll_offset;
            let output = egui::ScrollArea::both()
                .id_salt(("plot_scroll", plot.id))
                .auto_shrink([false, false])
                .scroll_offset(egui::vec2(x as f32, y as f32))
                .show(ui, |ui| {
                    draw_chart(ui, &plot.chart, plot.id, egui::vec2(w as f32, h as f32));
                });
            let offset = output.state.offset;
            plot.viewport.set_scroll_offset([offset.x as f64, offset.y as f64]);
        });

    plot.open = open && !actions.contains(&PlotAction::Close);
    actions.contains(&PlotAction::Save)
}

fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, id: u64, size: egui::Vec2) {
    ui.set_min_size(size);
    let (rows, cols) = chart.kind.layout();

    let mut body = size;
    if let Some(title) = &chart.title {
        ui.allocate_ui(egui::vec2(size.x, FIGURE_HEADER), |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(title.as_str());
            });
        });
        body.y -= FIGURE_HEADER;
    }

    let spacing = ui.spacing().item_spacing;
    let cell = egui::vec2(
        (body.x - spacing.x * (cols - 1) as f32) / cols as f32,
        (body.y - spacing.y * (rows - 1) as f32) / rows as f32,
    );

    for (r, row) in chart.panels.chunks(cols).enumerate() {
        ui.horizontal(|ui| {
            for (c, panel) in row.iter().enumerate() {
                let plot_id = egui::Id::new(("panel", id, r * cols + c));
                draw_panel(ui, panel, plot_id, cell);
            }
        });
    }
}

fn draw_panel(ui: &mut egui::Ui, panel: &Panel, id: egui::Id, size: egui::Vec2) {
    ui.allocate_ui(size, |ui| {
        ui.vertical(|ui| {
            ui.set_width(size.x);
            ui.vertical_centered(|ui| {
                ui.strong(panel.title.as_str());
                ui.small(panel.subtitle.as_str());
            });
            if !panel.annotation.is_empty() {
                ui.small(panel.annotation.join("   "));
            }

            let (x_min, x_max, y_min, y_max) = panel.bounds();
            let mut plot = Plot::new(id)
                .width(size.x)
                .height((size.y - PANEL_HEADER).max(40.0))
                .x_axis_label(panel.x_label.as_str())
                .y_axis_label(panel.y_label.as_str())
                .include_x(x_min)
                .include_x(x_max)
                .include_y(y_min)
                .include_y(y_max)
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false);
            if matches!(panel.content, PanelContent::Lines(_)) {
                plot = plot.legend(Legend::default().position(Corner::RightTop));
            }

            plot.show(ui, |plot_ui| match &panel.content {
                PanelContent::Histogram { bins, color } => {
                    let bars: Vec<Bar> = bins
                        .iter()
                        .map(|b| Bar::new(b.center(), b.density).width(b.width))
                        .collect();
                    plot_ui.bar_chart(BarChart::new(panel.title.clone(), bars).color(*color));
                }
                PanelContent::Lines(series) => {
                    for s in series {
                        plot_ui.line(Line::new(s.name.clone(), s.points.clone()).color(s.color));
                    }
                }
            });
        });
    });
}
