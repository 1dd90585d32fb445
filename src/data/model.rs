use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Profile of one synthetic device owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub age: u8,
    pub gender: Gender,
    pub username: String,
    pub address: String,
    pub email: String,
}

/// One reading taken for a user at a point of their schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRecord {
    /// Index of the owner in [`Dataset::users`]
    pub user_id: usize,
    pub timestamp: NaiveDateTime,
    pub outside_temperature: f64,
    pub outside_humidity: f64,
    pub room_temperature: f64,
    pub room_humidity: f64,
}

/// The four measurement columns of the sensor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    OutsideTemperature,
    OutsideHumidity,
    RoomTemperature,
    RoomHumidity,
}

impl Measurement {
    /// Column order used by exports and the statistics report
    pub const ALL: [Measurement; 4] = [
        Measurement::OutsideTemperature,
        Measurement::OutsideHumidity,
        Measurement::RoomTemperature,
        Measurement::RoomHumidity,
    ];

    /// Field name in JSON and CSV files
    pub fn column(&self) -> &'static str {
        match self {
            Measurement::OutsideTemperature => "outside_temperature",
            Measurement::OutsideHumidity => "outside_humidity",
            Measurement::RoomTemperature => "room_temperature",
            Measurement::RoomHumidity => "room_humidity",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            Measurement::OutsideTemperature => "Outside Temperature",
            Measurement::OutsideHumidity => "Outside Humidity",
            Measurement::RoomTemperature => "Room Temperature",
            Measurement::RoomHumidity => "Room Humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Measurement::OutsideTemperature | Measurement::RoomTemperature => "°F",
            Measurement::OutsideHumidity | Measurement::RoomHumidity => "%",
        }
    }

    pub fn value(&self, record: &SensorRecord) -> f64 {
        match self {
            Measurement::OutsideTemperature => record.outside_temperature,
            Measurement::OutsideHumidity => record.outside_humidity,
            Measurement::RoomTemperature => record.room_temperature,
            Measurement::RoomHumidity => record.room_humidity,
        }
    }
}

/// User table plus sensor table, sensors grouped by owner in generation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    users: Vec<UserRecord>,
    sensors: Vec<SensorRecord>,
}

impl Dataset {
    pub fn new(users: Vec<UserRecord>, sensors: Vec<SensorRecord>) -> Self {
        debug_assert!(
            sensors.windows(2).all(|w| w[0].user_id <= w[1].user_id),
            "sensor records must be grouped by owner"
        );
        debug_assert!(sensors.iter().all(|s| s.user_id < users.len()));
        Self { users, sensors }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn sensors(&self) -> &[SensorRecord] {
        &self.sensors
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Sensor records owned by `user_id`
    pub fn sensors_of(&self, user_id: usize) -> &[SensorRecord] {
        &self.sensors[self.owner_range(user_id)]
    }

    fn owner_range(&self, user_id: usize) -> Range<usize> {
        let start = self.sensors.partition_point(|s| s.user_id < user_id);
        let end = self.sensors.partition_point(|s| s.user_id <= user_id);
        start..end
    }

    /// Owner of a sensor record
    pub fn owner(&self, record: &SensorRecord) -> Option<&UserRecord> {
        self.users.get(record.user_id)
    }

    /// All values of one measurement column in table order
    pub fn values(&self, measurement: Measurement) -> Vec<f64> {
        self.sensors.iter().map(|s| measurement.value(s)).collect()
    }

    /// Earliest and latest timestamp
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.sensors.iter().map(|s| s.timestamp).min()?;
        let max = self.sensors.iter().map(|s| s.timestamp).max()?;
        Some((min, max))
    }

    /// Fail on the first NaN or infinite measurement
    pub fn check_finite(&self) -> Result<()> {
        for (row, record) in self.sensors.iter().enumerate() {
            for measurement in Measurement::ALL {
                let value = measurement.value(record);
                if !value.is_finite() {
                    return Err(AppError::Serialization(format!(
                        "{} of sensor record {} is {}",
                        measurement.column(),
                        row,
                        value
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn user(name: &str) -> UserRecord {
        UserRecord {
            first_name: name.to_string(),
            last_name: "Tester".to_string(),
            age: 30,
            gender: Gender::Female,
            username: name.to_lowercase(),
            address: "1 Main Street, Springfield, IL 62701".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    pub(crate) fn sensor(user_id: usize, hour: u32, outside_temperature: f64) -> SensorRecord {
        SensorRecord {
            user_id,
            timestamp: NaiveDate::from_ymd_opt(2015, 1, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            outside_temperature,
            outside_humidity: 60.0,
            room_temperature: outside_temperature - 5.0,
            room_humidity: 55.0,
        }
    }

    /// One user per temperature value
    pub(crate) fn dataset_with_temperatures(values: &[f64]) -> Dataset {
        let users = values.iter().enumerate().map(|(i, _)| user(&format!("U{}", i))).collect();
        let sensors = values
            .iter()
            .enumerate()
            .map(|(i, &t)| sensor(i, i as u32 % 24, t))
            .collect();
        Dataset::new(users, sensors)
    }

    #[test]
    fn test_sensors_of_groups_by_owner() {
        let dataset = Dataset::new(
            vec![user("Ann"), user("Bob"), user("Cid")],
            vec![sensor(0, 0, 70.0), sensor(0, 6, 71.0), sensor(2, 0, 80.0)],
        );

        assert_eq!(dataset.sensors_of(0).len(), 2);
        assert!(dataset.sensors_of(1).is_empty());
        assert_eq!(dataset.sensors_of(2)[0].outside_temperature, 80.0);
        assert_eq!(dataset.owner(&dataset.sensors()[2]).unwrap().first_name, "Cid");
    }

    #[test]
    fn test_date_range_and_values() {
        let dataset = dataset_with_temperatures(&[10.0, 20.0, 30.0]);
        let (min, max) = dataset.date_range().unwrap();
        assert_eq!(min.format("%H").to_string(), "00");
        assert_eq!(max.format("%H").to_string(), "02");
        assert_eq!(
            dataset.values(Measurement::OutsideTemperature),
            vec![10.0, 20.0, 30.0]
        );
        assert!(Dataset::default().date_range().is_none());
    }

    #[test]
    fn test_check_finite() {
        assert!(dataset_with_temperatures(&[70.0, 71.0]).check_finite().is_ok());

        let err = dataset_with_temperatures(&[70.0, f64::NAN]).check_finite().unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
        assert!(err.to_string().contains("outside_temperature"));
    }
}
