//! Environmental Sensors
//!
//! Simulated sensor producers for the air-quality station and the
//! [`Station`] that reads them once per cycle and aggregates the result
//! into the five-value tuple persisted by the storage layer.

mod error;
mod measurement;
mod quantity;
mod sensor;
mod station;

pub use error::SensorError;
pub use measurement::MeasurementTuple;
pub use quantity::{round2, Quantity, Reading, Value};
pub use sensor::{
    ClimateSensor, OzoneSensor, ParticulateSensor, Sensor, SensorState, SensorStatus, UvSensor,
};
pub use station::{Station, StationReadings, StationState, StationStatus};

/// Sensor keys used by the station
pub mod keys {
    /// Particulate matter sensor (PMS5003)
    pub const PM25: &str = "pm25";
    /// Ozone sensor (MQ131)
    pub const OZONE: &str = "ozone";
    /// Temperature and humidity sensor (DHT22)
    pub const CLIMATE: &str = "clima";
    /// UV radiation sensor (GUVA-S12SD)
    pub const UV: &str = "uv";
}
