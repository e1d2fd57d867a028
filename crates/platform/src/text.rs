//! Bounded text helpers.
//!
//! Station names, stream URIs and stream metadata all live in fixed-capacity
//! [`heapless::String`]s. Configuration text must fit exactly (an overlong
//! station URI is a configuration error), while telemetry text from the
//! network is untrusted and gets truncated on a UTF-8 boundary instead.

use heapless::String;

/// Capacity of a station display name.
pub const NAME_CAPACITY: usize = 32;
/// Capacity of a stream URI.
pub const URI_CAPACITY: usize = 128;
/// Capacity of a metadata key (e.g. `StreamTitle`).
pub const META_KEY_CAPACITY: usize = 32;
/// Capacity of a metadata value or status message.
pub const META_VALUE_CAPACITY: usize = 120;

/// Station display name.
pub type StationName = String<NAME_CAPACITY>;
/// Stream URI.
pub type StreamUri = String<URI_CAPACITY>;

/// Returned by [`bounded`] when the input does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextTooLong {
    /// Length of the rejected input in bytes.
    pub len: usize,
    /// Capacity of the destination in bytes.
    pub capacity: usize,
}

impl core::fmt::Display for TextTooLong {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "text of {} bytes exceeds capacity of {} bytes",
            self.len, self.capacity
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TextTooLong {}

/// Copy `s` into a bounded string, failing if it does not fit.
///
/// # Errors
///
/// Returns [`TextTooLong`] when `s.len() > N`.
pub fn bounded<const N: usize>(s: &str) -> Result<String<N>, TextTooLong> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| TextTooLong {
        len: s.len(),
        capacity: N,
    })?;
    Ok(out)
}

/// Copy as much of `s` as fits, cutting on a character boundary.
#[must_use]
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
