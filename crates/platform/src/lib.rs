//! Hardware Abstraction Layer (HAL) for the pushbutton internet radio
//!
//! This crate provides trait-based abstractions for every piece of hardware
//! the radio touches, enabling development and testing without a board.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: button wiring, boot, simulator)
//!         ↓
//! Feature Layer (playback crate: station catalog, supervisor)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (WiFi stack, MP3 decoder, I2S/PWM output)
//! ```
//!
//! # Abstractions
//!
//! - [`AudioSession`] / [`SessionFactory`] - one stream decode attempt
//! - [`NetworkLink`] - station-mode WiFi association
//! - [`Clock`] - monotonic milliseconds
//! - [`gpio`] - push button sampling over `embedded-hal` input pins
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `serde`: `Deserialize` for configuration-facing types
//! - `defmt`: Enable defmt formatting on hardware builds
//!
//! # Example
//!
//! ```no_run
//! use platform::{AudioSession, StepOutcome};
//!
//! fn pump<S: AudioSession>(session: &mut S) -> bool {
//!     session.poll_step() == StepOutcome::Progress
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod audio_types;
pub mod clock;
pub mod config;
pub mod gpio;
pub mod network;
pub mod text;

pub mod mocks;

// Re-export main high-level traits
pub use audio::{AudioSession, SessionEvent, SessionFactory, StepOutcome};
pub use clock::{elapsed, Clock, SystemClock};
pub use network::{Credentials, LinkInfo, NetworkLink};

// Re-export value types
pub use audio_types::{Gain, OutOfRangeError, VolumePercent};
pub use gpio::{read_level, ActiveLevel, PinLevel, PinState};
pub use text::{bounded, truncated, StationName, StreamUri, TextTooLong};
