//! # Heading Sensors
//!
//! Concrete [`HeadingSensor`] implementations for the terminal build, which has
//! no magnetometer:
//! - [`SimulatedCompass`]: a device slowly turning in place, driven by a tokio
//!   interval
//! - [`NoCompass`]: a device without heading support

use crate::heading::{HeadingCallback, HeadingSensor};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Sensor that is never available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCompass;

impl HeadingSensor for NoCompass {
    fn heading_available(&self) -> bool {
        false
    }

    fn start_updating_heading(&self, _on_sample: HeadingCallback) {}

    fn stop_updating_heading(&self) {}
}

/// Rotating compass that emits one raw sample per tick.
///
/// Raw samples are reported in (-180, 180] the way some platform services
/// report magnetic heading, so consumers must normalize them.
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct SimulatedCompass {
    interval: Duration,
    step_degrees: f64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedCompass {
    pub fn new(interval: Duration, step_degrees: f64) -> Self {
        Self {
            // tokio::time::interval panics on a zero period
            interval: interval.max(Duration::from_millis(1)),
            step_degrees,
            task: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

/// Express a heading in [0, 360) as a signed reading in (-180, 180].
pub fn signed_heading(heading: f64) -> f64 {
    if heading > 180.0 {
        heading - 360.0
    } else {
        heading
    }
}

impl HeadingSensor for SimulatedCompass {
    fn heading_available(&self) -> bool {
        true
    }

    fn start_updating_heading(&self, on_sample: HeadingCallback) {
        let period = self.interval;
        let step = self.step_degrees;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut heading = 0.0_f64;
            loop {
                ticker.tick().await;
                on_sample(signed_heading(heading));
                heading = (heading + step).rem_euclid(360.0);
            }
        });

        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn stop_updating_heading(&self) {
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for SimulatedCompass {
    fn drop(&mut self) {
        self.stop_updating_heading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[test]
    fn test_signed_heading() {
        assert_eq!(signed_heading(0.0), 0.0);
        assert_eq!(signed_heading(180.0), 180.0);
        assert_eq!(signed_heading(270.0), -90.0);
    }

    #[test]
    fn test_no_compass_is_unavailable() {
        assert!(!NoCompass.heading_available());
    }

    #[tokio::test]
    async fn test_simulated_compass_sweeps_through_negative_readings() {
        let compass = SimulatedCompass::new(Duration::from_millis(2), 120.0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        compass.start_updating_heading(Arc::new(move |raw: f64| {
            let _ = tx.send(raw);
        }));

        let mut readings = Vec::new();
        for _ in 0..3 {
            let raw = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("sample in time")
                .expect("channel open");
            readings.push(raw);
        }
        assert_eq!(readings, vec![0.0, 120.0, -120.0]);

        compass.stop_updating_heading();
        assert!(!compass.is_running());
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_task() {
        let compass = SimulatedCompass::new(Duration::from_millis(2), 1.0);
        compass.start_updating_heading(Arc::new(|_: f64| {}));
        compass.start_updating_heading(Arc::new(|_: f64| {}));
        assert!(compass.is_running());

        compass.stop_updating_heading();
        assert!(!compass.is_running());
    }
}
