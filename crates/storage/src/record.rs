//! Persisted measurement row

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire form of a row: the table's columns in declaration order
pub type MeasurementRow = (
    i32,
    Option<NaiveDateTime>,
    Option<f32>,
    Option<f32>,
    Option<f32>,
    Option<f32>,
    Option<f32>,
);

/// One row of the `mediciones` table.
///
/// Every column but `id` is nullable in the table, so rows written by other
/// clients may lack values. Serialized as a positional array in column
/// order: `[id, fecha_hora, pm25_ugm3, ozono_ppb, intensidad_uv,
/// temperatura, humedad_relativa]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(into = "MeasurementRow", from = "MeasurementRow")]
pub struct MeasurementRecord {
    pub id: i32,

    /// Set by the database when the row is inserted
    #[sqlx(rename = "fecha_hora")]
    pub captured_at: Option<NaiveDateTime>,

    #[sqlx(rename = "pm25_ugm3")]
    pub pm25: Option<f32>,

    #[sqlx(rename = "ozono_ppb")]
    pub ozone: Option<f32>,

    #[sqlx(rename = "intensidad_uv")]
    pub uv_intensity: Option<f32>,

    #[sqlx(rename = "temperatura")]
    pub temperature: Option<f32>,

    #[sqlx(rename = "humedad_relativa")]
    pub humidity: Option<f32>,
}

impl MeasurementRecord {
    /// Numeric fields in persistence order
    pub fn values(&self) -> [Option<f32>; 5] {
        [
            self.pm25,
            self.ozone,
            self.uv_intensity,
            self.temperature,
            self.humidity,
        ]
    }
}

impl From<MeasurementRecord> for MeasurementRow {
    fn from(r: MeasurementRecord) -> Self {
        (
            r.id,
            r.captured_at,
            r.pm25,
            r.ozone,
            r.uv_intensity,
            r.temperature,
            r.humidity,
        )
    }
}

impl From<MeasurementRow> for MeasurementRecord {
    fn from(row: MeasurementRow) -> Self {
        let (id, captured_at, pm25, ozone, uv_intensity, temperature, humidity) = row;
        Self {
            id,
            captured_at,
            pm25,
            ozone,
            uv_intensity,
            temperature,
            humidity,
        }
    }
}
