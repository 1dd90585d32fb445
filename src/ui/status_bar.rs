use crate::app::IotForge;
use crate::data::stats::group_thousands;

pub fn render_status_bar(app: &IotForge, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(&app.state.ui.status);
            if let Some(dataset) = &app.state.dataset {
                ui.separator();
                ui.label(format!(
                    "Users: {} | Records: {}",
                    group_thousands(dataset.users().len()),
                    group_thousands(dataset.sensors().len())
                ));
            }
            if let Some(name) = app.state.current_file.as_ref().and_then(|f| f.file_name()) {
                ui.separator();
                ui.label(format!("📁 {}", name.to_string_lossy()));
            }
        });
    });
}

/// Modal-style banner for the last error, dismissed with OK
pub fn render_error_banner(app: &mut IotForge, ctx: &egui::Context) {
    let Some(banner) = app.state.ui.error.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new(format!("⚠ {}", banner.title))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.colored_label(ui.visuals().error_fg_color, &banner.message);
            ui.add_space(6.0);
            dismissed = ui.button("OK").clicked();
        });

    if dismissed {
        app.state.ui.clear_error();
    }
}
