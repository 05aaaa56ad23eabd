//! Randomized inter-action delays.
//!
//! Every browser interaction is bracketed by a pause drawn uniformly from a
//! configured window, so the request timing does not form a fingerprintable
//! fixed cadence.

use crate::config::ScraperConfig;
use rand::Rng;
use std::time::Duration;

/// Produces delays uniformly distributed in `[min_ms, max_ms]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomJitter {
    min_ms: u64,
    max_ms: u64,
}

impl RandomJitter {
    /// A swapped window is normalized rather than rejected.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms <= max_ms {
            Self { min_ms, max_ms }
        } else {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.delay_min_ms, config.delay_max_ms)
    }

    /// Draw one delay from the window.
    pub fn sample(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleep for one sampled delay.
    pub async fn pause(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_window() {
        let jitter = RandomJitter::new(100, 300);
        for _ in 0..200 {
            let d = jitter.sample().as_millis() as u64;
            assert!((100..=300).contains(&d), "sampled {d}ms outside window");
        }
    }

    #[test]
    fn test_swapped_window_is_normalized() {
        let jitter = RandomJitter::new(500, 50);
        for _ in 0..50 {
            let d = jitter.sample().as_millis() as u64;
            assert!((50..=500).contains(&d));
        }
    }

    #[test]
    fn test_degenerate_window_is_constant() {
        let jitter = RandomJitter::new(250, 250);
        assert_eq!(jitter.sample(), Duration::from_millis(250));
    }
}
