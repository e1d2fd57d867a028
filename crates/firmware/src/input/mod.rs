//! Push button input.
//!
//! | Item                  | Role                                              |
//! |-----------------------|---------------------------------------------------|
//! | [`ClickClassifier`]   | pure state machine: level + time → gesture        |
//! | [`PushButton`]        | pin sampling and per-gesture handler dispatch     |
//! | [`ClassifierBuilder`] | fluent timing/polarity configuration              |
//!
//! The button is polled from the main loop; there is no interrupt path.
//! Any `embedded_hal::digital::InputPin` works, so hardware GPIO, the
//! simulator's scripted pin and test mocks share one code path.

pub mod builder;
pub mod classifier;

pub use builder::ClassifierBuilder;
pub use classifier::{ClickClassifier, Gesture, Handler, PushButton, TimingConfig, TimingError};
