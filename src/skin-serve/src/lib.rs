//! Skin analysis over HTTP.
//!
//! An uploaded image is handed to an external [`SkinAnalyzer`], and the
//! analyzer's output is validated and reshaped into the fixed JSON schema
//! served by `POST /analyze`.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

pub mod analyzer;
pub mod error;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod response;

pub use analyzer::{RemoteAnalyzer, SkinAnalyzer};
pub use error::{AnalysisError, ErrorKind, ServeError};
pub use model::{AnalysisResult, Assessment, MetricKey, SkinMetric, SkinMetrics};
pub use pipeline::{analyze_upload, Upload};
pub use response::{MetricView, Outcome, SkinMetricsResponse, NON_LIVING_MESSAGE};

/// Named stopwatch that reports through the `log` facade.
pub struct Timer {
    name: String,
    started: Option<DateTime<Utc>>,
    elapsed: Option<Duration>,
}

impl Timer {
    /// Create a new timer
    pub fn new(name: &str) -> Self {
        Timer {
            name: name.to_owned(),
            started: None,
            elapsed: None,
        }
    }

    /// Create a timer and start it
    pub fn new_start(name: &str) -> Self {
        let mut t = Timer::new(name);
        t.start();
        t
    }

    /// Start the timer
    pub fn start(&mut self) {
        info!("{}: starting", self.name);

        self.started = Some(Utc::now());
        self.elapsed = None;
    }

    /// Stop the timer
    pub fn stop(&mut self) {
        match self.started.take() {
            None => debug!("{}: not running!", self.name),
            Some(started) => {
                let d = Utc::now() - started;

                self.elapsed = Some(d);
                info!("{} duration: {} msec", self.name, d.num_milliseconds());
            }
        }
    }

    /// Get duration in milliseconds
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed.map_or(0, |d| d.num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn timer_reports_zero_until_stopped() {
        let mut t = Timer::new_start("test");
        assert_eq!(t.elapsed_ms(), 0);

        t.stop();
        assert!(t.elapsed_ms() >= 0);

        // a second stop keeps the first measurement
        let first = t.elapsed_ms();
        t.stop();
        assert_eq!(t.elapsed_ms(), first);
    }

    #[test]
    fn stopping_an_idle_timer_is_harmless() {
        let mut t = Timer::new("idle");
        t.stop();
        assert_eq!(t.elapsed_ms(), 0);
    }
}
