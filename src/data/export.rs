//! JSON and CSV export, plus reading exported JSON back
//!
//! JSON nests each user's readings under `sensor_data`. CSV flattens one row
//! per reading, joined with its owner's profile, and stops silently at the
//! configured row limit.

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::model::{Dataset, SensorRecord, UserRecord};
use crate::config::ExportSettings;
use crate::constants::export::{DATE_FORMAT, TIME_FORMAT};
use crate::error::{AppError, Result};

/// Column order of CSV exports
pub const CSV_COLUMNS: [&str; 13] = [
    "firstname",
    "lastname",
    "age",
    "gender",
    "username",
    "address",
    "email",
    "date",
    "time",
    "outside_temperature",
    "outside_humidity",
    "room_temperature",
    "room_humidity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(AppError::UnsupportedFormat { extension }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub format: ExportFormat,
    pub path: PathBuf,
    /// Sensor records written
    pub rows: usize,
    /// Sensor records left out by the CSV row limit
    pub skipped: usize,
}

impl ExportSummary {
    pub fn status_message(&self) -> String {
        format!(
            "Saved {} sensor records as {} to {}",
            self.rows,
            self.format.label(),
            self.path.display()
        )
    }
}

/// Write `dataset` to `path` in `format`
pub fn export(
    dataset: &Dataset,
    format: ExportFormat,
    path: &Path,
    options: &ExportSettings,
) -> Result<ExportSummary> {
    profiling::scope!("export", format.label());
    let rows = match format {
        ExportFormat::Json => export_json(dataset, path)?,
        ExportFormat::Csv => export_csv(dataset, path, options.csv_row_limit)?,
    };

    let summary = ExportSummary {
        format,
        path: path.to_path_buf(),
        rows,
        skipped: dataset.sensors().len() - rows,
    };
    tracing::info!(
        rows = summary.rows,
        skipped = summary.skipped,
        "Exported {} to {}",
        format.label(),
        path.display()
    );
    Ok(summary)
}

#[derive(Serialize)]
struct UserDocumentRef<'a> {
    #[serde(flatten)]
    user: &'a UserRecord,
    sensor_data: Vec<SensorDocument>,
}

#[derive(Deserialize)]
struct UserDocument {
    #[serde(flatten)]
    user: UserRecord,
    #[serde(default)]
    sensor_data: Vec<SensorDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SensorDocument {
    date: String,
    time: String,
    outside_temperature: f64,
    outside_humidity: f64,
    room_temperature: f64,
    room_humidity: f64,
}

impl From<&SensorRecord> for SensorDocument {
    fn from(record: &SensorRecord) -> Self {
        Self {
            date: record.timestamp.format(DATE_FORMAT).to_string(),
            time: record.timestamp.format(TIME_FORMAT).to_string(),
            outside_temperature: record.outside_temperature,
            outside_humidity: record.outside_humidity,
            room_temperature: record.room_temperature,
            room_humidity: record.room_humidity,
        }
    }
}

impl SensorDocument {
    fn into_record(self, user_id: usize) -> Result<SensorRecord> {
        let stamp = format!("{} {}", self.date, self.time);
        let timestamp = NaiveDateTime::parse_from_str(
            &stamp,
            &format!("{} {}", DATE_FORMAT, TIME_FORMAT),
        )
        .map_err(|e| AppError::Serialization(format!("Bad timestamp '{}': {}", stamp, e)))?;

        Ok(SensorRecord {
            user_id,
            timestamp,
            outside_temperature: self.outside_temperature,
            outside_humidity: self.outside_humidity,
            room_temperature: self.room_temperature,
            room_humidity: self.room_humidity,
        })
    }
}

/// Pretty-printed nested JSON, returns the number of sensor records written
pub fn export_json(dataset: &Dataset, path: &Path) -> Result<usize> {
    dataset.check_finite()?;

    let documents: Vec<UserDocumentRef> = dataset
        .users()
        .iter()
        .enumerate()
        .map(|(user_id, user)| UserDocumentRef {
            user,
            sensor_data: dataset.sensors_of(user_id).iter().map(SensorDocument::from).collect(),
        })
        .collect();

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &documents)?;
    writer.flush()?;
    Ok(dataset.sensors().len())
}

/// Flat CSV of at most `row_limit` sensor records, returns the rows written
pub fn export_csv(dataset: &Dataset, path: &Path, row_limit: usize) -> Result<usize> {
    dataset.check_finite()?;

    let mut df = csv_frame(dataset, row_limit)?;
    let rows = df.height();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(rows)
}

/// Sensor rows joined with their owner, in table order
fn csv_frame(dataset: &Dataset, row_limit: usize) -> Result<DataFrame> {
    let records = &dataset.sensors()[..dataset.sensors().len().min(row_limit)];
    let n = records.len();

    let mut first = Vec::with_capacity(n);
    let mut last = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut gender = Vec::with_capacity(n);
    let mut username = Vec::with_capacity(n);
    let mut address = Vec::with_capacity(n);
    let mut email = Vec::with_capacity(n);
    let mut date = Vec::with_capacity(n);
    let mut time = Vec::with_capacity(n);

    for record in records {
        let owner = dataset.owner(record).ok_or_else(|| {
            AppError::Serialization(format!("Sensor record refers to unknown user {}", record.user_id))
        })?;
        first.push(owner.first_name.clone());
        last.push(owner.last_name.clone());
        age.push(owner.age as i64);
        gender.push(owner.gender.to_string());
        username.push(owner.username.clone());
        address.push(owner.address.clone());
        email.push(owner.email.clone());
        date.push(record.timestamp.format(DATE_FORMAT).to_string());
        time.push(record.timestamp.format(TIME_FORMAT).to_string());
    }

    let measurement = |f: fn(&SensorRecord) -> f64| -> Vec<f64> { records.iter().map(f).collect() };

    let df = DataFrame::new(vec![
        Series::new(CSV_COLUMNS[0].into(), first).into(),
        Series::new(CSV_COLUMNS[1].into(), last).into(),
        Series::new(CSV_COLUMNS[2].into(), age).into(),
        Series::new(CSV_COLUMNS[3].into(), gender).into(),
        Series::new(CSV_COLUMNS[4].into(), username).into(),
        Series::new(CSV_COLUMNS[5].into(), address).into(),
        Series::new(CSV_COLUMNS[6].into(), email).into(),
        Series::new(CSV_COLUMNS[7].into(), date).into(),
        Series::new(CSV_COLUMNS[8].into(), time).into(),
        Series::new(CSV_COLUMNS[9].into(), measurement(|r| r.outside_temperature)).into(),
        Series::new(CSV_COLUMNS[10].into(), measurement(|r| r.outside_humidity)).into(),
        Series::new(CSV_COLUMNS[11].into(), measurement(|r| r.room_temperature)).into(),
        Series::new(CSV_COLUMNS[12].into(), measurement(|r| r.room_humidity)).into(),
    ])?;
    Ok(df)
}

/// Read a file written by [`export_json`]
pub fn import_json(path: &Path) -> Result<Dataset> {
    profiling::scope!("import_json");
    let reader = BufReader::new(File::open(path)?);
    let documents: Vec<UserDocument> = serde_json::from_reader(reader)?;

    let mut users = Vec::with_capacity(documents.len());
    let mut sensors = Vec::new();
    for (user_id, document) in documents.into_iter().enumerate() {
        users.push(document.user);
        for reading in document.sensor_data {
            sensors.push(reading.into_record(user_id)?);
        }
    }

    let dataset = Dataset::new(users, sensors);
    tracing::info!(
        users = dataset.users().len(),
        sensors = dataset.sensors().len(),
        "Imported {}",
        path.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::data::model::tests::dataset_with_temperatures;
    use crate::data::synth::generate;
    use chrono::NaiveDate;
    use tempfile::Builder;

    fn sample(users: usize, samples: usize) -> Dataset {
        let config = GeneratorConfig {
            user_count: users,
            samples_per_user: samples,
            end_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ..Default::default()
        };
        generate(&config).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.json")).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("a.CSV")).unwrap(), ExportFormat::Csv);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.xlsx")),
            Err(AppError::UnsupportedFormat { extension }) if extension == "xlsx"
        ));
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dataset = sample(4, 6);
        let file = Builder::new().suffix(".json").tempfile().unwrap();

        let summary = export(&dataset, ExportFormat::Json, file.path(), &ExportSettings::default())
            .unwrap();
        assert_eq!(summary.rows, 24);
        assert_eq!(summary.skipped, 0);

        let imported = import_json(file.path()).unwrap();
        assert_eq!(imported, dataset);
    }

    #[test]
    fn test_json_layout() {
        let dataset = sample(1, 2);
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        export_json(&dataset, file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let user = &value[0];
        for key in ["firstname", "lastname", "age", "gender", "username", "address", "email"] {
            assert!(user.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(user["sensor_data"][0]["date"], "2015-01-01");
        assert_eq!(user["sensor_data"][0]["time"], "00:00:00");
        assert_eq!(user["sensor_data"][1]["time"], "06:00:00");
        assert!(text.contains("\n  "), "output should be pretty-printed");
    }

    #[test]
    fn test_csv_respects_row_limit() {
        let dataset = sample(5, 10);
        let file = Builder::new().suffix(".csv").tempfile().unwrap();
        let options = ExportSettings { csv_row_limit: 12 };

        let summary = export(&dataset, ExportFormat::Csv, file.path(), &options).unwrap();
        assert_eq!(summary.rows, 12);
        assert_eq!(summary.skipped, 38);

        let df = LazyCsvReader::new(file.path())
            .with_has_header(true)
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(df.height(), 12);
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, CSV_COLUMNS.to_vec());
    }

    #[test]
    fn test_csv_quotes_addresses() {
        let dataset = sample(1, 1);
        let file = Builder::new().suffix(".csv").tempfile().unwrap();
        export_csv(&dataset, file.path(), 100).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CSV_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.contains(&format!("\"{}\"", dataset.users()[0].address)));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_small_dataset_not_truncated() {
        let dataset = sample(2, 3);
        let file = Builder::new().suffix(".csv").tempfile().unwrap();
        assert_eq!(export_csv(&dataset, file.path(), 10_000).unwrap(), 6);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let dataset = dataset_with_temperatures(&[70.0, f64::INFINITY]);
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("out.json");
        assert!(matches!(export_json(&dataset, &json), Err(AppError::Serialization(_))));
        assert!(!json.exists());

        let csv = dir.path().join("out.csv");
        assert!(matches!(export_csv(&dataset, &csv, 10), Err(AppError::Serialization(_))));
    }

    #[test]
    fn test_unwritable_destination() {
        let dataset = sample(1, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        assert!(matches!(export_json(&dataset, &path), Err(AppError::Io(_))));
        assert!(matches!(export_csv(&dataset, &path.with_extension("csv"), 5), Err(AppError::Io(_))));
    }

    #[test]
    fn test_import_rejects_bad_timestamp() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"firstname":"A","lastname":"B","age":30,"gender":"Male","username":"ab",
                "address":"x","email":"a@b.com","sensor_data":[{"date":"2015-13-01","time":"00:00:00",
                "outside_temperature":70.0,"outside_humidity":60.0,"room_temperature":65.0,
                "room_humidity":55.0}]}]"#,
        )
        .unwrap();

        assert!(matches!(import_json(file.path()), Err(AppError::Serialization(_))));
    }
}
