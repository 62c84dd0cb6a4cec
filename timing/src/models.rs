use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::lap::LapTime;

/// Driver name used when the upstream record carries none.
pub const UNKNOWN_DRIVER: &str = "Unknown";

/// One pull of the AC server's `leaderboard.json`. Drivers that left the
/// server keep their times in `DisconnectedDrivers`, so both lists feed
/// the rankings.
#[derive(Deserialize, Debug, Default)]
pub struct RawSnapshot {
    #[serde(rename = "ConnectedDrivers", default, deserialize_with = "null_to_default")]
    pub connected_drivers: Vec<RawDriver>,

    #[serde(rename = "DisconnectedDrivers", default, deserialize_with = "null_to_default")]
    pub disconnected_drivers: Vec<RawDriver>,
}

impl RawSnapshot {
    /// All driver records, connected first. The same driver may appear in
    /// both lists; merging is the aggregator's job.
    pub fn drivers(&self) -> impl Iterator<Item = &RawDriver> {
        self.connected_drivers
            .iter()
            .chain(self.disconnected_drivers.iter())
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct RawDriver {
    #[serde(rename = "CarInfo", default, deserialize_with = "null_to_default")]
    pub car_info: CarInfo,

    /// Model code -> timing, one entry per car this driver ran.
    #[serde(rename = "Cars", default, deserialize_with = "null_to_default")]
    pub cars: HashMap<String, CarTiming>,
}

impl RawDriver {
    pub fn name(&self) -> &str {
        match self.car_info.driver_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_DRIVER,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CarInfo {
    #[serde(rename = "DriverName", default)]
    pub driver_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CarTiming {
    #[serde(rename = "BestLap", default, deserialize_with = "lenient_lap")]
    pub best_lap: LapTime,
}

/// Upstream servers have been seen sending negative, float and string
/// `BestLap` values. Floats are truncated to whole nanoseconds; anything
/// else that is not a non-negative number decodes to the invalid lap
/// rather than poisoning the whole snapshot.
fn lenient_lap<'de, D>(deserializer: D) -> Result<LapTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let ns = match value.as_u64() {
        Some(ns) => ns,
        None => value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
    };

    Ok(LapTime::from_nanos(ns))
}

/// `#[serde(default)]` only covers absent fields; upstream also sends
/// explicit `null` for empty driver lists, `Cars` and `CarInfo`.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;

    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{RawSnapshot, UNKNOWN_DRIVER};
    use crate::lap::LapTime;

    #[test]
    fn test_decode_snapshot() {
        let json = r#"{
            "ConnectedDrivers": [
                {
                    "CarInfo": {"DriverName": "Ana"},
                    "Cars": {"ks_audi_r8": {"BestLap": 75123000000}}
                }
            ],
            "DisconnectedDrivers": []
        }"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
        let drivers: Vec<_> = snapshot.drivers().collect();

        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].name(), "Ana");
        assert_eq!(
            drivers[0].cars["ks_audi_r8"].best_lap,
            LapTime::from_nanos(75_123_000_000)
        );
    }

    #[test]
    fn test_missing_name_is_unknown() {
        let json = r#"{"ConnectedDrivers": [{"Cars": {}}]}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.drivers().next().unwrap().name(), UNKNOWN_DRIVER);
    }

    #[test]
    fn test_empty_name_is_unknown() {
        let json = r#"{"ConnectedDrivers": [{"CarInfo": {"DriverName": ""}}]}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.drivers().next().unwrap().name(), UNKNOWN_DRIVER);
    }

    #[test]
    fn test_null_driver_lists() {
        let json = r#"{"ConnectedDrivers": null, "DisconnectedDrivers": null}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.drivers().count(), 0);
    }

    #[test]
    fn test_null_sub_fields_do_not_break_the_batch() {
        let json = r#"{"ConnectedDrivers": [
            {"CarInfo": null, "Cars": null},
            {
                "CarInfo": {"DriverName": "Ana"},
                "Cars": {"ks_audi_r8": {"BestLap": 75123000000}}
            }
        ]}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
        let drivers: Vec<_> = snapshot.drivers().collect();

        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].name(), UNKNOWN_DRIVER);
        assert!(drivers[0].cars.is_empty());
        assert_eq!(drivers[1].name(), "Ana");
    }

    #[test]
    fn test_float_laps_truncate_to_nanos() {
        let json = r#"{"ConnectedDrivers": [{
            "CarInfo": {"DriverName": "Flo"},
            "Cars": {
                "a": {"BestLap": 75123000000.0},
                "b": {"BestLap": 70500000000.9}
            }
        }]}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
        let driver = snapshot.drivers().next().unwrap();

        assert_eq!(
            driver.cars["a"].best_lap,
            LapTime::from_nanos(75_123_000_000)
        );
        assert_eq!(
            driver.cars["b"].best_lap,
            LapTime::from_nanos(70_500_000_000)
        );
    }

    #[test]
    fn test_negative_float_lap_is_invalid() {
        let json = r#"{"ConnectedDrivers": [{
            "Cars": {"a": {"BestLap": -75123000000.0}}
        }]}"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
        let driver = snapshot.drivers().next().unwrap();

        assert!(!driver.cars["a"].best_lap.is_valid());
    }

    #[test]
    fn test_bad_laps_decode_to_invalid() {
        let json = r#"{
            "ConnectedDrivers": [{
                "CarInfo": {"DriverName": "Bo"},
                "Cars": {
                    "a": {"BestLap": -5},
                    "b": {"BestLap": "fast"},
                    "c": {"BestLap": null},
                    "d": {}
                }
            }]
        }"#;

        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
        let driver = snapshot.drivers().next().unwrap();

        for car in driver.cars.values() {
            assert!(!car.best_lap.is_valid());
        }
    }
}
