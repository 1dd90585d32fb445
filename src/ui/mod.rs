mod generate_dialog;
mod help_dialog;
mod menu;
mod plot_window;
mod preview_table;
mod stats_dialog;
mod status_bar;

pub use generate_dialog::render_generate_dialog;
pub use help_dialog::render_help_dialog;
pub use menu::render_menu_bar;
pub use plot_window::render_plot_windows;
pub use preview_table::render_preview_panel;
pub use stats_dialog::render_stats_dialog;
pub use status_bar::{render_error_banner, render_status_bar};
