//! Button pin sampling.
//!
//! Pins are read through [`embedded_hal::digital::InputPin`]. The radio's
//! button is wired to ground with the internal pull-up enabled, so the
//! electrical level is inverted relative to the logical "pressed" state.
//! [`ActiveLevel`] captures the wiring, [`PinLevel`] the logical result.

use embedded_hal::digital::InputPin;

/// Electrical pin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Which electrical level means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum ActiveLevel {
    /// Button pulls the line to ground (pull-up wiring). The default.
    #[default]
    Low,
    /// Button drives the line high (pull-down wiring).
    High,
}

/// Logical button state after applying [`ActiveLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    /// Button held down.
    Active,
    /// Button released.
    Inactive,
}

impl PinLevel {
    /// Map an electrical state to a logical level under `polarity`.
    #[must_use]
    pub fn from_state(state: PinState, polarity: ActiveLevel) -> Self {
        let pressed = match polarity {
            ActiveLevel::Low => state == PinState::Low,
            ActiveLevel::High => state == PinState::High,
        };
        if pressed {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// `true` for [`PinLevel::Active`].
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Sample `pin` and translate it to a logical level.
///
/// Returns `None` when the read fails; callers treat that as "no sample this
/// iteration" rather than as a level change.
pub fn read_level<P: InputPin>(pin: &mut P, polarity: ActiveLevel) -> Option<PinLevel> {
    pin.is_high()
        .ok()
        .map(|high| PinLevel::from_state(PinState::from(high), polarity))
}
