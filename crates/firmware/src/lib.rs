//! Pushbutton Radio Firmware
//!
//! One button, one stream. A click tunes to the next station, a long click to
//! the previous one, a double click logs what is playing.
//!
//! # Architecture
//!
//! ```text
//! Entry point (main.rs / board crate)
//!         ↓
//! boot ── config, buffers, network
//!         ↓
//! app ─── cooperative loop: supervisor tick + button poll
//!         ↓
//! input (gesture classifier)     playback (catalog + supervisor)
//!         ↓                               ↓
//! platform (pins, clock, audio session, network traits)
//! ```
//!
//! # Features
//!
//! - `std` - Enable standard library, JSON configuration and the [`sim`] module
//! - `emulator` - Desktop simulator binary (tokio, tracing-subscriber)
//! - `defmt` - defmt formatting for embedded logging
//!
//! The JSON configuration tests need `std`; a plain `cargo test -p firmware`
//! skips them:
//!
//! ```bash
//! cargo test -p firmware --features std
//! ```
//!
//! # Examples
//!
//! ## Desktop simulator
//!
//! ```bash
//! cargo run -p firmware --features emulator -- radio.json
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod app;
pub mod boot;
pub mod config;
pub mod input;

#[cfg(feature = "std")]
pub mod sim;

pub use app::{Iteration, RadioApp};
pub use boot::{boot, BootError, BootResources, BufferPlan};
pub use config::{ConfigError, RadioConfig};
pub use input::{ClassifierBuilder, ClickClassifier, Gesture, PushButton, TimingConfig};
