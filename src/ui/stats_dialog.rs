use crate::app::IotForge;
use crate::constants::export::DATE_FORMAT;
use crate::constants::layout::STATS_DIALOG_SIZE;
use crate::data::Measurement;
use crate::data::stats::{ColumnSummary, group_thousands};

const ROWS: [(&str, fn(&ColumnSummary) -> String); 8] = [
    ("Count", |s| group_thousands(s.count)),
    ("Mean", |s| format!("{:.2}", s.mean)),
    ("Std Dev", |s| format!("{:.2}", s.std_dev)),
    ("Min", |s| format!("{:.2}", s.min)),
    ("25%", |s| format!("{:.2}", s.p25)),
    ("50% (Median)", |s| format!("{:.2}", s.median)),
    ("75%", |s| format!("{:.2}", s.p75)),
    ("Max", |s| format!("{:.2}", s.max)),
];

pub fn render_stats_dialog(app: &mut IotForge, ctx: &egui::Context) {
    if !app.state.ui.show_stats_dialog {
        return;
    }
    let Some(report) = app.state.report.as_ref() else {
        app.state.ui.show_stats_dialog = false;
        return;
    };

    let mut open = true;
    let mut copy = false;
    let mut close = false;

    egui::Window::new("Descriptive Statistics")
        .default_size(STATS_DIALOG_SIZE)
        .collapsible(false)
        .open(&mut open)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 30.0)
                .show(ui, |ui| {
                    egui::Grid::new("stats_grid")
                        .striped(true)
                        .num_columns(Measurement::ALL.len() + 1)
                        .show(ui, |ui| {
                            ui.label("");
                            for m in Measurement::ALL {
                                ui.strong(format!("{} ({})", m.label(), m.unit()));
                            }
                            ui.end_row();

                            for (name, value) in ROWS {
                                ui.label(name);
                                for m in Measurement::ALL {
                                    ui.monospace(report.column(m).map(value).unwrap_or_default());
                                }
                                ui.end_row();
                            }
                        });

                    ui.separator();
                    ui.strong("Additional Statistics");
                    ui.label(format!("Total Users: {}", group_thousands(report.user_count)));
                    ui.label(format!(
                        "Total Sensor Records: {}",
                        group_thousands(report.record_count)
                    ));
                    ui.label(format!(
                        "Date Range: {} to {}",
                        report.first_timestamp.format(DATE_FORMAT),
                        report.last_timestamp.format(DATE_FORMAT)
                    ));
                });
            ui.separator();
            ui.horizontal(|ui| {
                copy = ui.button("📋 Copy to Clipboard").clicked();
                close = ui.button("Close").clicked();
            });
        });

    if copy {
        app.on_copy_report();
    }
    if close || !open {
        app.state.ui.show_stats_dialog = false;
    }
}
