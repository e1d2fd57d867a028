//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumePercent`: clamps 0–100, the user-facing volume knob
//! - `Gain`: linear output gain 0.0–1.0, derived from `VolumePercent` or clamped
//!
//! The stream decoder's output stage takes a linear gain, while configuration
//! files and the console speak in percent. Keeping both as distinct types makes
//! it impossible to hand a percentage to `set_gain`.

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside allowed range {}..={}",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── VolumePercent ────────────────────────────────────────────────────────────

/// Volume as a percentage, clamped to 0–100.
///
/// Wraps a `u8` with the invariant `0 <= value <= 100`.
/// Construct with [`VolumePercent::new`] (clamping) or
/// [`VolumePercent::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Full volume, the factory default of the radio.
    pub const MAX: Self = Self(100);

    /// Create a `VolumePercent`, clamping values above 100 to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Create a `VolumePercent`, returning an error if `value > 100`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 100`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > 100 {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: 100,
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume value (0–100).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Convert to the linear gain expected by the output stage.
    #[must_use]
    pub fn to_gain(self) -> Gain {
        Gain::from_volume(self)
    }
}

impl Default for VolumePercent {
    fn default() -> Self {
        Self::MAX
    }
}

// ── Gain ─────────────────────────────────────────────────────────────────────

/// Linear output gain in the closed range `0.0..=1.0`.
///
/// `0.0` is silence, `1.0` passes decoded samples through unchanged.
/// NaN inputs collapse to `0.0` so a corrupt value can never reach the DAC.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Gain(f32);

impl Gain {
    /// Silence.
    pub const MUTE: Self = Self(0.0);
    /// Unity gain.
    pub const UNITY: Self = Self(1.0);

    /// Create a `Gain`, clamping into `0.0..=1.0`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::MUTE;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `volume / 100`.
    #[must_use]
    pub fn from_volume(volume: VolumePercent) -> Self {
        Self(f32::from(volume.get()) / 100.0)
    }

    /// Return the raw linear factor.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::UNITY
    }
}

impl From<VolumePercent> for Gain {
    fn from(volume: VolumePercent) -> Self {
        Self::from_volume(volume)
    }
}
