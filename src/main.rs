#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::App;
use eframe::egui::{self, CentralPanel};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod constants;
mod data;
mod error;
mod render;
mod state;
mod ui;
mod widgets;

use app::IotForge;
use config::Settings;
use data::ExportFormat;

impl App for IotForge {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        // Handle keyboard shortcuts; actions run after the input lock is released
        let typing = ctx.wants_keyboard_input();
        let (generate, open, save, toggle_help, escape) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && i.key_pressed(egui::Key::G),
                command && i.key_pressed(egui::Key::O),
                command && i.key_pressed(egui::Key::S),
                !typing && (i.key_pressed(egui::Key::H) || i.key_pressed(egui::Key::F1)),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if generate {
            self.on_generate();
        }
        if open {
            self.on_open_json();
        }
        if save {
            self.on_save(ExportFormat::Json);
        }
        if toggle_help {
            self.state.ui.show_help = !self.state.ui.show_help;
        }
        // Esc dismisses the error banner first, then the help window
        if escape {
            if self.state.ui.has_error() {
                self.state.ui.clear_error();
            } else {
                self.state.ui.show_help = false;
            }
        }

        ui::render_menu_bar(self, ctx);
        ui::render_status_bar(self, ctx);

        CentralPanel::default().show(ctx, |ui| {
            ui::render_preview_panel(self, ui);
        });

        ui::render_generate_dialog(self, ctx);
        ui::render_stats_dialog(self, ctx);
        ui::render_plot_windows(self, ctx);
        ui::render_help_dialog(self, ctx);
        ui::render_error_banner(self, ctx);
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(feature = "profile-with-puffin")]
fn start_profiler() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            tracing::info!("Puffin server listening on {}", addr);
            Some(server)
        }
        Err(e) => {
            tracing::warn!("Failed to start puffin server: {}", e);
            None
        }
    }
}

fn main() -> eframe::Result {
    setup_logging();

    #[cfg(feature = "profile-with-puffin")]
    let _profiler = start_profiler();

    let settings = Settings::load_or_default(Path::new(constants::config::CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("IoT Data Generator")
            .with_inner_size(constants::layout::WINDOW_SIZE),
        ..Default::default()
    };
    eframe::run_native(
        "IoT Data Generator",
        options,
        Box::new(|_| Ok(Box::new(IotForge::new(settings)))),
    )
}
