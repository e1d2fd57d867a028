//! Streaming audio session abstraction
//!
//! One [`AudioSession`] is one attempt to play one stream: it owns the
//! network source, the read-ahead buffer and the decoder feeding the output
//! stage. Sessions are cheap to build and never reused; a [`SessionFactory`]
//! hands out a fresh one for every attempt so that a failed stream cannot
//! leave stale state behind.

use crate::audio_types::Gain;
use crate::text::{META_KEY_CAPACITY, META_VALUE_CAPACITY};

/// Result of one decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Samples were decoded (or the pipeline is still filling); keep polling.
    Progress,
    /// The stream ended or the decoder gave up. The session is dead.
    Ended,
}

/// Out-of-band notifications raised while a stream plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// In-band stream metadata (ICY block, ID3 tag, ...).
    Metadata {
        /// Metadata kind, e.g. `StreamTitle`.
        kind: heapless::String<META_KEY_CAPACITY>,
        /// Metadata value, truncated to capacity.
        value: heapless::String<META_VALUE_CAPACITY>,
    },
    /// Warning or error from the buffer or decoder (underflow, decode hiccup).
    Status {
        /// Component-specific status code.
        code: i32,
        /// Human readable description, truncated to capacity.
        message: heapless::String<META_VALUE_CAPACITY>,
    },
}

/// A single decode attempt for one stream.
///
/// # Resource ownership
///
/// A session owns three resources: source, buffer and decoder. [`stop`]
/// must release all of them, decoder first, then buffer, then source, and
/// must tolerate a session whose construction stopped half-way (e.g. the
/// source connected but the decoder never started). Calling `stop` twice is
/// a no-op.
///
/// [`stop`]: AudioSession::stop
pub trait AudioSession {
    /// Error returned when a stream cannot be opened.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Open `uri` and start decoding into the output stage.
    fn start(&mut self, uri: &str) -> Result<(), Self::Error>;

    /// Run one decode step. Must not block.
    fn poll_step(&mut self) -> StepOutcome;

    /// Whether the decoder is currently running.
    fn is_running(&self) -> bool;

    /// Release decoder, buffer and source, in that order.
    fn stop(&mut self);

    /// Set the output gain.
    fn set_gain(&mut self, gain: Gain);

    /// Take the oldest pending metadata/status notification, if any.
    fn take_event(&mut self) -> Option<SessionEvent> {
        None
    }
}

/// Builds fresh sessions on demand.
///
/// The factory is where long-lived allocations (preallocated buffer and
/// codec scratch memory) live; sessions borrow them for their lifetime.
pub trait SessionFactory {
    /// Session type produced by this factory.
    type Session: AudioSession;

    /// Create a new, not yet started session.
    fn create(&mut self) -> Self::Session;
}
