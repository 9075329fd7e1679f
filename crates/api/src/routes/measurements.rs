//! Measurement Routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::MeasurementRecord;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Response for the measurements endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct MeasurementsResponse {
    pub success: bool,
    pub data: Vec<MeasurementRecord>,
    pub message: String,
}

/// List every stored measurement
pub async fn list_measurements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MeasurementsResponse>, ApiError> {
    let data = state.repository.fetch_all().await?;
    debug!("Returning {} measurements", data.len());

    Ok(Json(MeasurementsResponse {
        success: true,
        data,
        message: "Mediciones obtenidas exitosamente".to_string(),
    }))
}
