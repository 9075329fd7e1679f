//! Aggregated Station Measurement

use serde::Serialize;

/// The five values persisted for one cycle.
///
/// Field order is the persistence contract: pm25, ozone, uv, temperature,
/// humidity. The storage layer binds [`MeasurementTuple::as_array`]
/// positionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MeasurementTuple {
    pub pm25: f64,
    pub ozone: f64,
    pub uv_intensity: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl MeasurementTuple {
    pub fn new(pm25: f64, ozone: f64, uv_intensity: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            pm25,
            ozone,
            uv_intensity,
            temperature,
            humidity,
        }
    }

    /// Values in persistence order
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.pm25,
            self.ozone,
            self.uv_intensity,
            self.temperature,
            self.humidity,
        ]
    }
}

impl From<[f64; 5]> for MeasurementTuple {
    fn from(v: [f64; 5]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order() {
        let tuple = MeasurementTuple::new(23.5, 30.1, 0.8, 25.0, 55.0);
        assert_eq!(tuple.as_array(), [23.5, 30.1, 0.8, 25.0, 55.0]);
        assert_eq!(MeasurementTuple::from(tuple.as_array()), tuple);
    }
}
