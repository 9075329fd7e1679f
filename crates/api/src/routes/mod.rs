//! HTTP Routes

pub mod measurements;
pub mod metrics;
