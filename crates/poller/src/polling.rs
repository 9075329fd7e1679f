//! Polling Loop Implementation

use crate::PollerError;
use sensors::{MeasurementTuple, Station};
use std::time::Duration;
use storage::Repository;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Configuration for the polling loop
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time slept between cycles (default: 30s)
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

impl PollerConfig {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(secs),
        }
    }
}

/// Where the loop currently is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Sampling,
    Persisting,
    Sleeping,
    Stopped,
}

/// Result of one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    /// The tuple handed to the repository
    pub measurement: MeasurementTuple,
    /// Whether the insert succeeded
    pub persisted: bool,
}

/// Counters since the loop was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub cycles: u64,
    pub failed_inserts: u64,
}

/// Samples the station and persists one measurement per cycle
pub struct PollingLoop {
    station: Station,
    repository: Repository,
    config: PollerConfig,
    state: LoopState,
    stats: PollerStats,
}

impl PollingLoop {
    /// Create a new polling loop
    pub fn new(
        station: Station,
        repository: Repository,
        config: PollerConfig,
    ) -> Result<Self, PollerError> {
        if config.interval.is_zero() {
            return Err(PollerError::InvalidInterval(config.interval));
        }

        info!(
            "Polling loop created for {} sensors every {:?}",
            station.sensor_count(),
            config.interval
        );

        Ok(Self {
            station,
            repository,
            config,
            state: LoopState::Idle,
            stats: PollerStats::default(),
        })
    }

    /// Run one sample → persist cycle.
    ///
    /// A failed insert is counted and logged; it never aborts the loop.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = LoopState::Sampling;
        let measurement = self.station.aggregate_for_persistence();

        self.state = LoopState::Persisting;
        let persisted = self.repository.insert(&measurement).await;

        self.stats.cycles += 1;
        metrics::counter!("station_cycles_total").increment(1);

        if persisted {
            info!(
                "Stored measurement: pm25={} ozone={} uv={} temperature={} humidity={}",
                measurement.pm25,
                measurement.ozone,
                measurement.uv_intensity,
                measurement.temperature,
                measurement.humidity
            );
        } else {
            self.stats.failed_inserts += 1;
            metrics::counter!("station_insert_failures_total").increment(1);
            warn!(
                "Cycle {} could not persist its measurement ({} failures so far)",
                self.stats.cycles, self.stats.failed_inserts
            );
        }

        CycleOutcome {
            measurement,
            persisted,
        }
    }

    /// Run cycles until `shutdown` changes.
    ///
    /// Cycles are strictly sequential: an overrunning cycle delays the next
    /// one, and missed cycles are not caught up. The signal interrupts both
    /// the sleep and an in-flight cycle.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting polling loop");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = self.run_cycle() => {}
                _ = shutdown.changed() => {
                    debug!("Shutdown requested during cycle");
                    break;
                }
            }

            self.state = LoopState::Sleeping;
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown.changed() => {
                    debug!("Shutdown requested during sleep");
                    break;
                }
            }
        }

        self.state = LoopState::Stopped;
        info!(
            "Polling loop stopped after {} cycles ({} failed inserts)",
            self.stats.cycles, self.stats.failed_inserts
        );
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> PollerStats {
        self.stats
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// The station being sampled
    pub fn station(&self) -> &Station {
        &self.station
    }
}
