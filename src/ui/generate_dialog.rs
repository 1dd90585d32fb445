use crate::app::IotForge;
use crate::constants::generation::HUMIDITY_BOUNDS;
use crate::data::stats::group_thousands;
use crate::widgets::RangeInput;

pub fn render_generate_dialog(app: &mut IotForge, ctx: &egui::Context) {
    if !app.state.ui.show_generate_dialog {
        return;
    }

    let mut open = true;
    let mut submit = false;
    let mut cancel = false;

    if let Some(form) = app.state.ui.generate_form.as_mut() {
        egui::Window::new("Generate IoT Data")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("generate_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Users");
                        ui.add(egui::DragValue::new(&mut form.config.user_count).range(1..=1_000_000));
                        ui.end_row();

                        ui.label("Samples per user");
                        ui.add(egui::DragValue::new(&mut form.config.samples_per_user).range(1..=1_000_000));
                        ui.end_row();

                        ui.label("Start date");
                        ui.add(egui::TextEdit::singleline(&mut form.start_date).hint_text("YYYY-MM-DD"));
                        ui.end_row();

                        ui.label("End date");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.end_date)
                                .hint_text("YYYY-MM-DD HH:MM:SS"),
                        );
                        ui.end_row();

                        ui.label("Sample interval");
                        ui.add(
                            egui::DragValue::new(&mut form.interval_hours)
                                .speed(0.25)
                                .range(0.0..=8760.0)
                                .suffix(" h"),
                        );
                        ui.end_row();

                        ui.label("Seed");
                        ui.add(egui::DragValue::new(&mut form.config.seed));
                        ui.end_row();
                    });

                ui.separator();
                ui.strong("Measurement bands");
                let ranges = &mut form.config.field_ranges;
                RangeInput::new("Outside temperature", &mut ranges.outside_temperature)
                    .speed(0.5)
                    .suffix(" °F")
                    .show(ui);
                RangeInput::new("Outside humidity", &mut ranges.outside_humidity)
                    .bounds(HUMIDITY_BOUNDS.0, HUMIDITY_BOUNDS.1)
                    .speed(0.5)
                    .suffix(" %")
                    .show(ui);
                RangeInput::new("Room temperature drop", &mut ranges.room_temperature_drop)
                    .bounds(0.0, 100.0)
                    .suffix(" °F")
                    .show(ui);
                RangeInput::new("Room humidity drop", &mut ranges.room_humidity_drop)
                    .bounds(0.0, 100.0)
                    .suffix(" %")
                    .show(ui);

                ui.separator();
                ui.label(format!(
                    "{} sensor records will be generated",
                    group_thousands(form.config.total_samples())
                ));
                ui.horizontal(|ui| {
                    submit = ui.button("Generate").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
    }

    if submit {
        app.submit_generate_form();
    }
    if cancel || !open {
        app.state.ui.close_generate_dialog();
    }
}
