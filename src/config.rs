use serde::Deserialize;

use crate::error::LandingError;

/// Upper bound on `feed.max_rows`.
pub const MAX_FEED_ROWS: usize = 50;

/// Timings for the load progress indicator, in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressTimings {
    pub resource_sample_interval_ms: u32,
    /// Delay between the full-load signal and the start of dismissal.
    pub load_dismiss_delay_ms: u32,
    /// Hard deadline after which the indicator is dismissed regardless.
    pub deadline_ms: u32,
    /// Time the bar rests at 100% before it starts fading.
    pub settle_delay_ms: u32,
    /// Length of the fade-out before the indicator is detached.
    pub fade_out_ms: u32,
}

impl Default for ProgressTimings {
    fn default() -> Self {
        Self {
            resource_sample_interval_ms: 100,
            load_dismiss_delay_ms: 200,
            deadline_ms: 4000,
            settle_delay_ms: 280,
            fade_out_ms: 550,
        }
    }
}

/// Sizing and timings for the live activity feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedTimings {
    pub max_rows: usize,
    pub cycle_period_ms: u32,
    /// Duration of both the enter and the exit transition.
    pub transition_ms: u32,
}

impl Default for FeedTimings {
    fn default() -> Self {
        Self {
            max_rows: 6,
            cycle_period_ms: 3800,
            transition_ms: 460,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub progress: ProgressTimings,
    pub feed: FeedTimings,
}

impl LandingConfig {
    /// Parses a JSON override block. Missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, LandingError> {
        let config: LandingConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LandingError> {
        if self.feed.max_rows == 0 || self.feed.max_rows > MAX_FEED_ROWS {
            return Err(LandingError::InvalidConfig(format!(
                "feed.max_rows must be between 1 and {}, got {}",
                MAX_FEED_ROWS, self.feed.max_rows
            )));
        }
        // A cycle's enter/exit choreography has to finish before the next one starts.
        if self.feed.cycle_period_ms <= self.feed.transition_ms {
            return Err(LandingError::InvalidConfig(format!(
                "feed.cycle_period_ms ({}) must exceed feed.transition_ms ({})",
                self.feed.cycle_period_ms, self.feed.transition_ms
            )));
        }
        if self.progress.deadline_ms == 0 {
            return Err(LandingError::InvalidConfig(
                "progress.deadline_ms must be positive".to_string(),
            ));
        }
        if self.progress.resource_sample_interval_ms == 0 {
            return Err(LandingError::InvalidConfig(
                "progress.resource_sample_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
