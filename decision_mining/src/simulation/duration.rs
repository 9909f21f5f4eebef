use std::collections::HashMap;

use chrono::Duration;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

/// Fallback mean duration (in minutes) for activities without a configured mean
pub const DEFAULT_MEAN_DURATION_MINUTES: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Stochastic duration model: per-activity mean durations (in minutes)
///
/// Durations are sampled from an exponential distribution around the configured mean.
/// Activities without an entry fall back to [`DEFAULT_MEAN_DURATION_MINUTES`]
/// (or a custom default set via [`ActivityDurations::with_default_mean`]).
pub struct ActivityDurations {
    /// Mean duration in minutes per activity
    pub mean_minutes: HashMap<String, f64>,
    /// Fallback mean (minutes) for unconfigured activities
    pub default_mean_minutes: f64,
}

impl Default for ActivityDurations {
    fn default() -> Self {
        Self {
            mean_minutes: HashMap::new(),
            default_mean_minutes: DEFAULT_MEAN_DURATION_MINUTES,
        }
    }
}

impl ActivityDurations {
    /// Create an empty duration model (all activities use the default mean)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a duration model from (activity, mean minutes) pairs
    pub fn from_means<S: Into<String>>(means: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            mean_minutes: means.into_iter().map(|(a, m)| (a.into(), m)).collect(),
            default_mean_minutes: DEFAULT_MEAN_DURATION_MINUTES,
        }
    }

    /// Set a custom fallback mean (minutes) for unconfigured activities
    pub fn with_default_mean(mut self, minutes: f64) -> Self {
        self.default_mean_minutes = minutes;
        self
    }

    /// The mean duration (minutes) used for the given activity
    pub fn mean_for(&self, activity: &str) -> f64 {
        self.mean_minutes
            .get(activity)
            .copied()
            .filter(|m| *m > 0.0)
            .unwrap_or(self.default_mean_minutes)
    }

    /// Sample a duration for one execution of `activity`
    ///
    /// Exponentially distributed around the activity's mean duration.
    pub fn sample<R: Rng + ?Sized>(&self, activity: &str, rng: &mut R) -> Duration {
        let mean = self.mean_for(activity);
        let minutes = match Exp::new(1.0 / mean) {
            Ok(exp) => exp.sample(rng),
            // Non-positive rate (degenerate configuration): fall back to the mean itself
            Err(_) => mean,
        };
        Duration::milliseconds((minutes * 60_000.0) as i64)
    }
}
