//! Station Registry
//!
//! Owns the fixed set of sensor producers, reads them all once per cycle and
//! extracts the tuple persisted for that cycle.

use crate::error::SensorError;
use crate::keys;
use crate::measurement::MeasurementTuple;
use crate::quantity::{Quantity, Reading};
use crate::sensor::{ClimateSensor, OzoneSensor, ParticulateSensor, Sensor, SensorState, UvSensor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of reading every sensor once, keyed by sensor key
pub type StationReadings = BTreeMap<String, Result<Reading, SensorError>>;

/// Where each tuple field comes from, in persistence order
const LAYOUT: [(&str, Quantity); 5] = [
    (keys::PM25, Quantity::Pm25),
    (keys::OZONE, Quantity::Ozone),
    (keys::UV, Quantity::UvIntensity),
    (keys::CLIMATE, Quantity::Temperature),
    (keys::CLIMATE, Quantity::Humidity),
];

/// Station-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StationState {
    Initialized,
}

/// State of the station and every sensor it owns
#[derive(Debug, Clone, Serialize)]
pub struct StationStatus {
    pub state: StationState,
    pub sensors: BTreeMap<String, SensorState>,
}

/// The fixed collection of sensors aggregated per cycle
pub struct Station {
    sensors: Vec<(String, Box<dyn Sensor>)>,
    state: StationState,
}

impl Station {
    /// Create the station with its four standard sensors
    pub fn new() -> Self {
        Self::empty()
            .with_sensor(keys::PM25, ParticulateSensor::new())
            .with_sensor(keys::OZONE, OzoneSensor::new())
            .with_sensor(keys::CLIMATE, ClimateSensor::new())
            .with_sensor(keys::UV, UvSensor::new())
    }

    /// Create the standard station with deterministic generators
    pub fn seeded(seed: u64) -> Self {
        let rng = |offset: u64| StdRng::seed_from_u64(seed.wrapping_add(offset));
        Self::empty()
            .with_sensor(keys::PM25, ParticulateSensor::with_rng(rng(0)))
            .with_sensor(keys::OZONE, OzoneSensor::with_rng(rng(1)))
            .with_sensor(keys::CLIMATE, ClimateSensor::with_rng(rng(2)))
            .with_sensor(keys::UV, UvSensor::with_rng(rng(3)))
    }

    /// Create a station without sensors
    pub fn empty() -> Self {
        Self {
            sensors: Vec::new(),
            state: StationState::Initialized,
        }
    }

    /// Register a sensor under a key.
    ///
    /// A sensor already registered under the same key is replaced in place.
    pub fn with_sensor(mut self, key: impl Into<String>, sensor: impl Sensor + 'static) -> Self {
        let key = key.into();
        let sensor: Box<dyn Sensor> = Box::new(sensor);

        match self.sensors.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                warn!(
                    "Replacing sensor {} under {} with {}",
                    slot.1.name(),
                    key,
                    sensor.name()
                );
                slot.1 = sensor;
            }
            None => {
                debug!("Registering sensor {} under {}", sensor.name(), key);
                self.sensors.push((key, sensor));
            }
        }
        self
    }

    /// Read every sensor exactly once.
    ///
    /// A failing sensor is recorded as an error under its key; the others
    /// are still read.
    pub fn read_all(&mut self) -> StationReadings {
        let mut readings = BTreeMap::new();
        for (key, sensor) in self.sensors.iter_mut() {
            let result = sensor.read();
            if let Err(e) = &result {
                warn!("Sensor {} ({}) failed: {}", key, sensor.name(), e);
            }
            readings.insert(key.clone(), result);
        }
        readings
    }

    /// Read every sensor and extract the persisted tuple
    pub fn aggregate_for_persistence(&mut self) -> MeasurementTuple {
        let readings = self.read_all();
        let tuple = Self::aggregate(&readings);
        debug!("Aggregated measurement: {:?}", tuple);
        tuple
    }

    /// Extract the tuple from a set of readings.
    ///
    /// Missing sensors, failed reads and absent quantities all contribute 0.
    pub fn aggregate(readings: &StationReadings) -> MeasurementTuple {
        let mut values = [0.0; 5];
        for (slot, (key, quantity)) in values.iter_mut().zip(LAYOUT) {
            *slot = readings
                .get(key)
                .and_then(|r| r.as_ref().ok())
                .and_then(|r| r.value(quantity))
                .unwrap_or(0.0);
        }
        MeasurementTuple::from(values)
    }

    /// Station and per-sensor state
    pub fn status(&self) -> StationStatus {
        StationStatus {
            state: self.state,
            sensors: self
                .sensors
                .iter()
                .map(|(key, sensor)| (key.clone(), sensor.state()))
                .collect(),
        }
    }

    /// Number of sensors owned by the station
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SensorStatus;

    /// Sensor whose every read fails
    struct BrokenSensor {
        status: SensorStatus,
    }

    impl BrokenSensor {
        fn new() -> Self {
            Self {
                status: SensorStatus::Inactive,
            }
        }
    }

    impl Sensor for BrokenSensor {
        fn name(&self) -> &str {
            "BROKEN"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn read(&mut self) -> Result<Reading, SensorError> {
            self.status = SensorStatus::Error;
            Err(SensorError::Synthesis {
                sensor: "BROKEN".to_string(),
                reason: "bus timeout".to_string(),
            })
        }

        fn state(&self) -> SensorState {
            SensorState {
                name: "BROKEN".to_string(),
                description: "always fails".to_string(),
                status: self.status,
                last_reading: None,
            }
        }
    }

    fn in_range(quantity: Quantity, value: f64) -> bool {
        let (min, max) = quantity.range();
        value >= min && value <= max
    }

    #[test]
    fn test_read_all_covers_every_sensor() {
        let mut station = Station::seeded(42);
        let readings = station.read_all();

        assert_eq!(readings.len(), 4);
        for key in [keys::PM25, keys::OZONE, keys::CLIMATE, keys::UV] {
            assert!(readings[key].is_ok(), "{key}");
        }
    }

    #[test]
    fn test_aggregate_order() {
        let mut station = Station::seeded(1);
        let tuple = station.aggregate_for_persistence();

        let values = tuple.as_array();
        for (quantity, value) in Quantity::ALL.into_iter().zip(values) {
            assert!(in_range(quantity, value), "{quantity:?} = {value}");
        }
    }

    #[test]
    fn test_failed_sensor_contributes_zero() {
        let mut station = Station::empty()
            .with_sensor(keys::PM25, ParticulateSensor::new())
            .with_sensor(keys::OZONE, BrokenSensor::new())
            .with_sensor(keys::CLIMATE, BrokenSensor::new())
            .with_sensor(keys::UV, UvSensor::new());

        let tuple = station.aggregate_for_persistence();
        assert!(in_range(Quantity::Pm25, tuple.pm25));
        assert_eq!(tuple.ozone, 0.0);
        assert!(in_range(Quantity::UvIntensity, tuple.uv_intensity));
        assert_eq!(tuple.temperature, 0.0);
        assert_eq!(tuple.humidity, 0.0);

        let status = station.status();
        assert_eq!(status.sensors[keys::OZONE].status, SensorStatus::Error);
        assert_eq!(status.sensors[keys::PM25].status, SensorStatus::Active);
    }

    #[test]
    fn test_failure_does_not_short_circuit() {
        let mut station = Station::empty()
            .with_sensor(keys::PM25, BrokenSensor::new())
            .with_sensor(keys::UV, UvSensor::new());

        let readings = station.read_all();
        assert!(readings[keys::PM25].is_err());
        assert!(readings[keys::UV].is_ok());
    }

    #[test]
    fn test_duplicate_key_replaces_sensor() {
        let mut station = Station::empty()
            .with_sensor(keys::OZONE, BrokenSensor::new())
            .with_sensor(keys::UV, UvSensor::new())
            .with_sensor(keys::OZONE, OzoneSensor::new());

        assert_eq!(station.sensor_count(), 2);
        let readings = station.read_all();
        assert!(readings[keys::OZONE].is_ok());
        assert_eq!(station.status().sensors[keys::OZONE].name, OzoneSensor::MODEL);
    }

    #[test]
    fn test_missing_sensors_default_to_zero() {
        let mut station = Station::empty();
        assert_eq!(station.aggregate_for_persistence(), MeasurementTuple::default());
    }

    #[test]
    fn test_status_reports_all_sensors() {
        let mut station = Station::new();
        let before = station.status();
        assert_eq!(before.state, StationState::Initialized);
        assert!(before
            .sensors
            .values()
            .all(|s| s.status == SensorStatus::Inactive));

        station.read_all();
        let after = station.status();
        assert_eq!(after.sensors[keys::CLIMATE].name, "DHT22");
        assert!(after
            .sensors
            .values()
            .all(|s| s.status == SensorStatus::Active && s.last_reading.is_some()));
    }
}
