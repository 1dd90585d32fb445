use crate::app::IotForge;
use crate::data::ExportFormat;
use crate::render::PlotKind;

pub fn render_menu_bar(app: &mut IotForge, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Generate IoT Data...").clicked() {
                    app.on_generate();
                    ui.close();
                }
                if ui.button("Open JSON...").clicked() {
                    app.on_open_json();
                    ui.close();
                }
                ui.separator();
                if ui.button("Save as JSON...").clicked() {
                    app.on_save(ExportFormat::Json);
                    ui.close();
                }
                if ui.button("Save as CSV...").clicked() {
                    app.on_save(ExportFormat::Csv);
                    ui.close();
                }
                ui.separator();
                if ui.button("Save Settings...").clicked() {
                    app.on_save_settings();
                    ui.close();
                }
                if ui.button("Load Settings...").clicked() {
                    app.on_load_settings();
                    ui.close();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Statistics", |ui| {
                if !app.state.has_data() {
                    ui.weak("Generate or open data first");
                    ui.separator();
                }
                if ui.button("Descriptive Statistics").clicked() {
                    app.on_statistics();
                    ui.close();
                }
                ui.separator();
                for kind in PlotKind::ALL {
                    if ui.button(kind.menu_label()).clicked() {
                        app.on_plot(kind);
                        ui.close();
                    }
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("Keyboard Shortcuts (F1)").clicked() {
                    app.state.ui.show_help = true;
                    ui.close();
                }
            });
        });
    });
}
