use crate::app::IotForge;

pub fn render_help_dialog(app: &mut IotForge, ctx: &egui::Context) {
    if app.state.ui.show_help {
        egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Main Window");
                ui.label("Ctrl+G - Generate IoT data");
                ui.label("Ctrl+O - Open JSON");
                ui.label("Ctrl+S - Save as JSON");
                ui.label("H / F1 - Toggle help");

                ui.separator();
                ui.heading("Plot Windows");
                ui.label("+ / = - Zoom in");
                ui.label("- - Zoom out");
                ui.label("0 / Home - Reset zoom (100%)");
                ui.label("F / F11 - Fit to window");
                ui.label("Page Up / Page Down - Scroll vertically");
                ui.label("Arrow keys - Scroll");
                ui.label("ESC - Close plot window");

                ui.separator();
                ui.heading("Mouse Controls");
                ui.label("Scroll - Move around a zoomed plot");
                ui.label("Drag scrollbars - Pan the view");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.ui.show_help = false;
                }
            });
    }
}
