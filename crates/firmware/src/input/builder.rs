//! Fluent builder API for push button configuration.
//!
//! Stores the timing thresholds and wiring polarity, validates them once, and
//! builds either a bare [`ClickClassifier`] (for code that samples the pin
//! itself) or a complete [`PushButton`] around an `embedded-hal` input pin.
//!
//! # Usage
//!
//! ```no_run
//! use firmware::input::{ClassifierBuilder, PushButton};
//! use platform::ActiveLevel;
//! # fn pin() -> embedded_hal_mock::eh1::digital::Mock { embedded_hal_mock::eh1::digital::Mock::new(&[]) }
//!
//! let button: PushButton<_, ()> = ClassifierBuilder::new()
//!     .debounce_ms(30)
//!     .long_click_ms(500)
//!     .active_level(ActiveLevel::Low)
//!     .build_button(pin())
//!     .unwrap();
//! ```

use embedded_hal::digital::InputPin;
use platform::ActiveLevel;

use super::classifier::{ClickClassifier, PushButton, TimingConfig, TimingError};

/// Fluent builder for a push button classifier.
///
/// Defaults: 50 ms debounce, 300 ms long click, 250 ms double-click gap,
/// active-low (pull-up) wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierBuilder {
    debounce_ms: u64,
    long_click_ms: u64,
    double_click_gap_ms: u64,
    active_level: ActiveLevel,
}

impl ClassifierBuilder {
    /// Start from the default thresholds.
    pub fn new() -> Self {
        Self {
            debounce_ms: 50,
            long_click_ms: 300,
            double_click_gap_ms: 250,
            active_level: ActiveLevel::Low,
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Set the debounce window in milliseconds.
    #[must_use]
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the long-click threshold in milliseconds.
    #[must_use]
    pub fn long_click_ms(mut self, ms: u64) -> Self {
        self.long_click_ms = ms;
        self
    }

    /// Set the double-click gap in milliseconds.
    #[must_use]
    pub fn double_click_gap_ms(mut self, ms: u64) -> Self {
        self.double_click_gap_ms = ms;
        self
    }

    /// Set which electrical level means "pressed".
    #[must_use]
    pub fn active_level(mut self, level: ActiveLevel) -> Self {
        self.active_level = level;
        self
    }

    /// Configured debounce window in milliseconds.
    pub fn debounce(&self) -> u64 {
        self.debounce_ms
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Validate the thresholds.
    ///
    /// # Errors
    ///
    /// [`TimingError`] if the debounce window is not below the long-click
    /// threshold.
    pub fn timing(&self) -> Result<TimingConfig, TimingError> {
        TimingConfig::from_millis(
            self.debounce_ms,
            self.long_click_ms,
            self.double_click_gap_ms,
        )
    }

    /// Build a pin-free classifier.
    ///
    /// # Errors
    ///
    /// See [`ClassifierBuilder::timing`].
    pub fn build(&self) -> Result<ClickClassifier, TimingError> {
        self.timing().map(ClickClassifier::new)
    }

    /// Build a push button that samples `pin`.
    ///
    /// # Errors
    ///
    /// See [`ClassifierBuilder::timing`].
    pub fn build_button<P: InputPin, C>(&self, pin: P) -> Result<PushButton<P, C>, TimingError> {
        let classifier = self.build()?;
        Ok(PushButton::with_polarity(pin, classifier, self.active_level))
    }
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    #[test]
    fn test_defaults_match_timing_default() {
        assert_eq!(ClassifierBuilder::new().timing().unwrap(), TimingConfig::DEFAULT);
    }

    #[test]
    fn test_chain_overrides() {
        let timing = ClassifierBuilder::new()
            .debounce_ms(20)
            .long_click_ms(800)
            .double_click_gap_ms(400)
            .timing()
            .unwrap();
        assert_eq!(timing.debounce(), Duration::from_millis(20));
        assert_eq!(timing.long_click(), Duration::from_millis(800));
        assert_eq!(timing.double_click_gap(), Duration::from_millis(400));
    }

    #[test]
    fn test_invalid_chain_rejected() {
        assert!(ClassifierBuilder::new()
            .debounce_ms(400)
            .long_click_ms(300)
            .build()
            .is_err());
    }
}
