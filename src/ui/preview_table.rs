use egui_extras::{Column, TableBuilder};

use crate::app::IotForge;
use crate::constants::export::{DATE_FORMAT, TIME_FORMAT};
use crate::constants::layout::{PREVIEW_ADDRESS_CHARS, PREVIEW_ROWS, TABLE_HEADER_HEIGHT};
use crate::data::Dataset;
use crate::data::stats::group_thousands;

const PREVIEW_COLUMNS: [&str; 13] = [
    "Firstname",
    "Lastname",
    "Age",
    "Gender",
    "Username",
    "Address",
    "Email",
    "Date",
    "Time",
    "Outside Temp",
    "Outside Hum",
    "Room Temp",
    "Room Hum",
];

/// First users, each with their first sensor record
pub fn preview_rows(dataset: &Dataset) -> Vec<[String; 13]> {
    dataset
        .users()
        .iter()
        .enumerate()
        .take(PREVIEW_ROWS)
        .filter_map(|(id, user)| {
            let sensor = dataset.sensors_of(id).first()?;
            Some([
                user.first_name.clone(),
                user.last_name.clone(),
                user.age.to_string(),
                user.gender.to_string(),
                user.username.clone(),
                truncate(&user.address, PREVIEW_ADDRESS_CHARS),
                user.email.clone(),
                sensor.timestamp.format(DATE_FORMAT).to_string(),
                sensor.timestamp.format(TIME_FORMAT).to_string(),
                format!("{:.2}", sensor.outside_temperature),
                format!("{:.2}", sensor.outside_humidity),
                format!("{:.2}", sensor.room_temperature),
                format!("{:.2}", sensor.room_humidity),
            ])
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Central panel: dataset summary plus the preview grid
pub fn render_preview_panel(app: &IotForge, ui: &mut egui::Ui) {
    profiling::scope!("render_preview_panel");

    ui.vertical_centered(|ui| {
        ui.heading("IoT Data Generator");
        ui.label("Use the File menu to generate IoT data, then use the Statistics menu to analyze it.");
    });
    ui.add_space(10.0);

    let Some(dataset) = app.state.dataset.as_ref().filter(|d| !d.is_empty()) else {
        ui.label("No data generated yet.");
        return;
    };

    ui.label(format!(
        "{} user records with {} total sensor records",
        group_thousands(dataset.users().len()),
        group_thousands(dataset.sensors().len())
    ));
    ui.separator();

    let rows = preview_rows(dataset);
    egui::ScrollArea::horizontal().show(ui, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0).resizable(true), PREVIEW_COLUMNS.len())
            .header(TABLE_HEADER_HEIGHT, |mut header| {
                for name in PREVIEW_COLUMNS {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for cells in &rows {
                    body.row(18.0, |mut row| {
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset_with_temperatures;

    #[test]
    fn test_preview_rows() {
        let values: Vec<f64> = (0..12).map(|i| 70.0 + i as f64).collect();
        let rows = preview_rows(&dataset_with_temperatures(&values));

        assert_eq!(rows.len(), PREVIEW_ROWS);
        assert_eq!(rows[0][0], "U0");
        assert_eq!(rows[0][2], "30");
        assert_eq!(rows[0][3], "Female");
        assert_eq!(rows[3][7], "2015-01-01");
        assert_eq!(rows[3][8], "03:00:00");
        assert_eq!(rows[3][9], "73.00");
        assert_eq!(rows[3][10], "60.00");
        assert_eq!(rows[3][11], "68.00");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate("short", 50), "short");
        let long = "a".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.len(), 53);
        assert!(cut.ends_with("..."));
    }
}
