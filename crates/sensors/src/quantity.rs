//! Measured Quantities and Readings
//!
//! Defines the five physical quantities the station measures, their units
//! and simulated ranges, and the immutable [`Reading`] a sensor produces.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Physical quantities measured by the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Fine particulate matter concentration
    Pm25,
    /// Ozone concentration
    Ozone,
    /// Ultraviolet radiation intensity
    UvIntensity,
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
}

impl Quantity {
    /// All quantities, in persistence order
    pub const ALL: [Quantity; 5] = [
        Quantity::Pm25,
        Quantity::Ozone,
        Quantity::UvIntensity,
        Quantity::Temperature,
        Quantity::Humidity,
    ];

    /// Unit the value is expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Pm25 => "μg/m³",
            Quantity::Ozone => "ppb",
            Quantity::UvIntensity => "mW/cm²",
            Quantity::Temperature => "°C",
            Quantity::Humidity => "%",
        }
    }

    /// Inclusive range the simulated sensor samples from
    pub fn range(&self) -> (f64, f64) {
        match self {
            Quantity::Pm25 => (10.0, 50.0),
            Quantity::Ozone => (20.0, 40.0),
            Quantity::UvIntensity => (0.5, 1.5),
            Quantity::Temperature => (20.0, 30.0),
            Quantity::Humidity => (40.0, 70.0),
        }
    }

    /// Column in the `mediciones` table
    pub fn column(&self) -> &'static str {
        match self {
            Quantity::Pm25 => "pm25_ugm3",
            Quantity::Ozone => "ozono_ppb",
            Quantity::UvIntensity => "intensidad_uv",
            Quantity::Temperature => "temperatura",
            Quantity::Humidity => "humedad_relativa",
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single measured value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Value {
    pub quantity: Quantity,
    pub value: f64,
    pub unit: &'static str,
}

impl Value {
    /// Create a value in the quantity's native unit
    pub fn new(quantity: Quantity, value: f64) -> Self {
        Self {
            quantity,
            value,
            unit: quantity.unit(),
        }
    }
}

/// One timestamped output of a sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    values: Vec<Value>,
    captured_at: DateTime<Utc>,
}

impl Reading {
    pub fn new(values: Vec<Value>, captured_at: DateTime<Utc>) -> Self {
        Self {
            values,
            captured_at,
        }
    }

    /// Values carried by this reading
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value for a quantity, if this reading carries it
    pub fn value(&self, quantity: Quantity) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.quantity == quantity)
            .map(|v| v.value)
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}
