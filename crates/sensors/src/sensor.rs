//! Simulated Sensor Producers
//!
//! Each producer stands in for one piece of station hardware and
//! synthesizes values uniformly over its quantity's range. Producers own
//! their state; nothing is shared between them.

use crate::error::SensorError;
use crate::quantity::{round2, Quantity, Reading, Value};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

/// Operational status of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    /// Never read
    Inactive,
    /// Last read succeeded
    Active,
    /// Last read failed
    Error,
}

/// Snapshot of a sensor's state
#[derive(Debug, Clone, Serialize)]
pub struct SensorState {
    pub name: String,
    pub description: String,
    pub status: SensorStatus,
    pub last_reading: Option<Reading>,
}

/// A value-producing unit for one or more physical quantities
pub trait Sensor: Send {
    /// Hardware model name
    fn name(&self) -> &str;

    /// Human readable description
    fn description(&self) -> &str;

    /// Produce a new reading.
    ///
    /// Sets the status to [`SensorStatus::Active`] on success and to
    /// [`SensorStatus::Error`] on failure.
    fn read(&mut self) -> Result<Reading, SensorError>;

    /// Current state, including the last successful reading
    fn state(&self) -> SensorState;
}

/// State and sampling shared by the simulated producers.
///
/// Each producer owns its own instance.
struct Simulator {
    name: &'static str,
    description: &'static str,
    quantities: &'static [Quantity],
    status: SensorStatus,
    last_reading: Option<Reading>,
    last_captured_at: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl Simulator {
    fn new(
        name: &'static str,
        description: &'static str,
        quantities: &'static [Quantity],
        rng: StdRng,
    ) -> Self {
        Self {
            name,
            description,
            quantities,
            status: SensorStatus::Inactive,
            last_reading: None,
            last_captured_at: None,
            rng,
        }
    }

    /// Sample every quantity and mark the producer `Active`
    fn read(&mut self) -> Reading {
        let reading = self.sample();
        debug!("{} read {:?}", self.name, reading.values());
        self.status = SensorStatus::Active;
        self.last_reading = Some(reading.clone());
        reading
    }

    fn sample(&mut self) -> Reading {
        let values = self
            .quantities
            .iter()
            .map(|&quantity| {
                let (min, max) = quantity.range();
                Value::new(quantity, round2(self.rng.gen_range(min..=max)))
            })
            .collect();

        Reading::new(values, self.next_timestamp())
    }

    /// Current time, strictly after the previous reading's timestamp
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let captured_at = match self.last_captured_at {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        self.last_captured_at = Some(captured_at);
        captured_at
    }

    fn state(&self) -> SensorState {
        SensorState {
            name: self.name.to_string(),
            description: self.description.to_string(),
            status: self.status,
            last_reading: self.last_reading.clone(),
        }
    }
}

/// PM2.5 particulate matter sensor (PMS5003)
pub struct ParticulateSensor {
    sim: Simulator,
}

impl ParticulateSensor {
    pub const MODEL: &'static str = "PMS5003";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a sensor sampling from the given generator
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            sim: Simulator::new(
                Self::MODEL,
                "Sensor de partículas PM2.5",
                &[Quantity::Pm25],
                rng,
            ),
        }
    }
}

impl Default for ParticulateSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for ParticulateSensor {
    fn name(&self) -> &str {
        self.sim.name
    }

    fn description(&self) -> &str {
        self.sim.description
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        Ok(self.sim.read())
    }

    fn state(&self) -> SensorState {
        self.sim.state()
    }
}

/// Ozone sensor (MQ131)
pub struct OzoneSensor {
    sim: Simulator,
}

impl OzoneSensor {
    pub const MODEL: &'static str = "MQ131";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            sim: Simulator::new(Self::MODEL, "Sensor de ozono", &[Quantity::Ozone], rng),
        }
    }
}

impl Default for OzoneSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for OzoneSensor {
    fn name(&self) -> &str {
        self.sim.name
    }

    fn description(&self) -> &str {
        self.sim.description
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        Ok(self.sim.read())
    }

    fn state(&self) -> SensorState {
        self.sim.state()
    }
}

/// Temperature and relative humidity sensor (DHT22).
///
/// Produces both quantities in a single reading.
pub struct ClimateSensor {
    sim: Simulator,
}

impl ClimateSensor {
    pub const MODEL: &'static str = "DHT22";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            sim: Simulator::new(
                Self::MODEL,
                "Sensor de temperatura y humedad",
                &[Quantity::Temperature, Quantity::Humidity],
                rng,
            ),
        }
    }
}

impl Default for ClimateSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for ClimateSensor {
    fn name(&self) -> &str {
        self.sim.name
    }

    fn description(&self) -> &str {
        self.sim.description
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        Ok(self.sim.read())
    }

    fn state(&self) -> SensorState {
        self.sim.state()
    }
}

/// UV radiation sensor (GUVA-S12SD)
pub struct UvSensor {
    sim: Simulator,
}

impl UvSensor {
    pub const MODEL: &'static str = "GUVAS12SD";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            sim: Simulator::new(
                Self::MODEL,
                "Sensor de radiación UV",
                &[Quantity::UvIntensity],
                rng,
            ),
        }
    }
}

impl Default for UvSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for UvSensor {
    fn name(&self) -> &str {
        self.sim.name
    }

    fn description(&self) -> &str {
        self.sim.description
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        Ok(self.sim.read())
    }

    fn state(&self) -> SensorState {
        self.sim.state()
    }
}
