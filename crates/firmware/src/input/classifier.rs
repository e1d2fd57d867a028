//! Push button gesture classification.
//!
//! [`ClickClassifier`] is a pure, pin-free state machine: feed it one logical
//! level per poll together with the current time and it reports at most one
//! [`Gesture`]. [`PushButton`] wraps a classifier around an
//! `embedded-hal` input pin and dispatches gestures to registered handlers.
//!
//! # Timing
//!
//! On release, the press duration `d` decides what the press was:
//!
//! | Press duration                     | Result                                |
//! |------------------------------------|---------------------------------------|
//! | `d < debounce`                     | bounce noise, ignored                 |
//! | `debounce <= d <= long_click`      | counted as a click, not yet reported  |
//! | `d > long_click`                   | `LongClick` at once, pending cleared  |
//!
//! Counted clicks are resolved on later polls without a level change: a
//! single click is reported once `double_click_gap` has passed since it was
//! released, two or more are reported together as one `DoubleClick`.
//!
//! The poll rate must be no coarser than the debounce window (10 ms or
//! faster for the defaults).

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use platform::{elapsed, read_level, ActiveLevel, PinLevel};

// ── Timing configuration ─────────────────────────────────────────────────────

/// Classifier thresholds. Immutable once the classifier is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    debounce: Duration,
    long_click: Duration,
    double_click_gap: Duration,
}

impl TimingConfig {
    /// 50 ms debounce, 300 ms long-click threshold, 250 ms double-click gap.
    pub const DEFAULT: Self = Self {
        debounce: Duration::from_millis(50),
        long_click: Duration::from_millis(300),
        double_click_gap: Duration::from_millis(250),
    };

    /// Validate and build a timing configuration.
    ///
    /// # Errors
    ///
    /// [`TimingError::DebounceNotBelowLongClick`] when
    /// `debounce_ms >= long_click_ms`.
    pub fn from_millis(
        debounce_ms: u64,
        long_click_ms: u64,
        double_click_gap_ms: u64,
    ) -> Result<Self, TimingError> {
        if debounce_ms >= long_click_ms {
            return Err(TimingError::DebounceNotBelowLongClick {
                debounce_ms,
                long_click_ms,
            });
        }
        Ok(Self {
            debounce: Duration::from_millis(debounce_ms),
            long_click: Duration::from_millis(long_click_ms),
            double_click_gap: Duration::from_millis(double_click_gap_ms),
        })
    }

    /// Presses shorter than this are bounce noise.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Presses longer than this are long clicks.
    pub fn long_click(&self) -> Duration {
        self.long_click
    }

    /// How long a single click waits for a second one.
    pub fn double_click_gap(&self) -> Duration {
        self.double_click_gap
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rejected classifier timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// The debounce window must be strictly shorter than the long-click
    /// threshold, otherwise no press could ever count as a click.
    DebounceNotBelowLongClick {
        /// Requested debounce window.
        debounce_ms: u64,
        /// Requested long-click threshold.
        long_click_ms: u64,
    },
}

impl core::fmt::Display for TimingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DebounceNotBelowLongClick {
                debounce_ms,
                long_click_ms,
            } => write!(
                f,
                "debounce window {debounce_ms} ms must be shorter than long-click threshold {long_click_ms} ms"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimingError {}

// ── Classifier ───────────────────────────────────────────────────────────────

/// A classified user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// One short press, not followed by another within the gap.
    Click,
    /// One press held longer than the long-click threshold.
    LongClick,
    /// Two (or more) short presses in quick succession.
    DoubleClick,
}

/// Pure click / long-click / double-click state machine.
#[derive(Debug, Clone)]
pub struct ClickClassifier {
    timing: TimingConfig,
    level: PinLevel,
    press_start: Instant,
    first_click: Instant,
    pending_clicks: u8,
}

impl ClickClassifier {
    /// Create a classifier in the released state.
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            level: PinLevel::Inactive,
            press_start: Instant::from_ticks(0),
            first_click: Instant::from_ticks(0),
            pending_clicks: 0,
        }
    }

    /// Feed one sample. Returns the gesture completed by this sample, if any.
    pub fn update(&mut self, level: PinLevel, now: Instant) -> Option<Gesture> {
        let previous = core::mem::replace(&mut self.level, level);
        match (previous, level) {
            (PinLevel::Inactive, PinLevel::Active) => {
                self.press_start = now;
                None
            }
            (PinLevel::Active, PinLevel::Inactive) => self.on_release(now),
            _ => self.resolve_pending(now),
        }
    }

    fn on_release(&mut self, now: Instant) -> Option<Gesture> {
        let held = elapsed(now, self.press_start);
        if held < self.timing.debounce {
            None
        } else if held > self.timing.long_click {
            self.pending_clicks = 0;
            Some(Gesture::LongClick)
        } else {
            self.pending_clicks = self.pending_clicks.saturating_add(1);
            if self.pending_clicks == 1 {
                self.first_click = now;
            }
            None
        }
    }

    fn resolve_pending(&mut self, now: Instant) -> Option<Gesture> {
        match self.pending_clicks {
            0 => None,
            1 if elapsed(now, self.first_click) > self.timing.double_click_gap => {
                self.pending_clicks = 0;
                Some(Gesture::Click)
            }
            1 => None,
            _ => {
                self.pending_clicks = 0;
                Some(Gesture::DoubleClick)
            }
        }
    }

    /// Clicks counted but not yet reported.
    pub fn pending_clicks(&self) -> u8 {
        self.pending_clicks
    }

    /// Last level seen.
    pub fn level(&self) -> PinLevel {
        self.level
    }

    /// Thresholds in use.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }
}

impl Default for ClickClassifier {
    fn default() -> Self {
        Self::new(TimingConfig::DEFAULT)
    }
}

// ── Push button ──────────────────────────────────────────────────────────────

/// Gesture handler. Receives the context passed to [`PushButton::poll`].
pub type Handler<C> = fn(&mut C);

/// A debounced push button with per-gesture handlers.
///
/// `C` is the context handed to every handler, typically the playback
/// supervisor. Unregistered gestures are still classified and returned from
/// [`poll`](Self::poll); they just run no handler.
pub struct PushButton<P, C> {
    pin: P,
    polarity: ActiveLevel,
    classifier: ClickClassifier,
    on_click: Option<Handler<C>>,
    on_long_click: Option<Handler<C>>,
    on_double_click: Option<Handler<C>>,
}

impl<P: InputPin, C> PushButton<P, C> {
    /// Wrap `pin` (pull-up wiring) with `classifier`.
    pub fn new(pin: P, classifier: ClickClassifier) -> Self {
        Self::with_polarity(pin, classifier, ActiveLevel::Low)
    }

    /// Wrap `pin` with explicit wiring polarity.
    pub fn with_polarity(pin: P, classifier: ClickClassifier, polarity: ActiveLevel) -> Self {
        Self {
            pin,
            polarity,
            classifier,
            on_click: None,
            on_long_click: None,
            on_double_click: None,
        }
    }

    /// Replace the click handler.
    pub fn register_on_click(&mut self, handler: Handler<C>) {
        self.on_click = Some(handler);
    }

    /// Replace the long-click handler.
    pub fn register_on_long_click(&mut self, handler: Handler<C>) {
        self.on_long_click = Some(handler);
    }

    /// Replace the double-click handler.
    pub fn register_on_double_click(&mut self, handler: Handler<C>) {
        self.on_double_click = Some(handler);
    }

    /// Sample the pin once, run the matching handler and return the gesture.
    ///
    /// A failed pin read counts as no sample: the classifier is not touched.
    pub fn poll(&mut self, now: Instant, ctx: &mut C) -> Option<Gesture> {
        let Some(level) = read_level(&mut self.pin, self.polarity) else {
            tracing::trace!("button pin read failed, sample skipped");
            return None;
        };
        let gesture = self.classifier.update(level, now)?;
        let handler = match gesture {
            Gesture::Click => self.on_click,
            Gesture::LongClick => self.on_long_click,
            Gesture::DoubleClick => self.on_double_click,
        };
        tracing::debug!(?gesture, "button gesture");
        if let Some(handler) = handler {
            handler(ctx);
        }
        Some(gesture)
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &ClickClassifier {
        &self.classifier
    }

    /// Wiring polarity.
    pub fn polarity(&self) -> ActiveLevel {
        self.polarity
    }

    /// Release the pin.
    pub fn into_pin(self) -> P {
        self.pin
    }
}
