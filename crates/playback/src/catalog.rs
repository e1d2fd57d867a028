//! Station catalog.
//!
//! An ordered, fixed list of stations with a wrapping cursor. The list is
//! built once from configuration and never resized; only the cursor moves.
//! Cursor arithmetic is written with checked operations so that it cannot
//! overflow or divide by zero, which the non-empty invariant guarantees
//! anyway.

use heapless::Vec;
use platform::text::{bounded, StationName, StreamUri};

/// Maximum number of stations a catalog can hold.
pub const CATALOG_CAPACITY: usize = 32;

/// A named stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Station {
    /// Display name, e.g. `SWISS JAZZ`.
    pub name: StationName,
    /// Stream URL handed to the audio session.
    pub uri: StreamUri,
}

impl Station {
    /// Build a station from borrowed text.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Capacity`] when the name or URI is too long.
    pub fn new(name: &str, uri: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            name: bounded(name).map_err(|_| CatalogError::Capacity)?,
            uri: bounded(uri).map_err(|_| CatalogError::Capacity)?,
        })
    }
}

/// Which way to move the cursor before starting playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// One station forward, wrapping to the first.
    Next,
    /// One station back, wrapping to the last.
    Previous,
    /// Stay on the current station.
    Same,
}

/// Catalog construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// No stations were supplied.
    Empty,
    /// The initial cursor does not index a station.
    CursorOutOfRange {
        /// Requested cursor.
        cursor: usize,
        /// Number of stations.
        len: usize,
    },
    /// Too many stations, or a name/URI longer than its bound.
    Capacity,
}

impl core::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => f.write_str("station catalog is empty"),
            Self::CursorOutOfRange { cursor, len } => {
                write!(f, "start index {cursor} outside catalog of {len} stations")
            }
            Self::Capacity => write!(
                f,
                "station list exceeds {CATALOG_CAPACITY} entries or a name/URI is too long"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CatalogError {}

/// Ordered station list with a wrapping cursor.
///
/// Invariant: the list is non-empty and `cursor < len()`.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    stations: Vec<Station, CATALOG_CAPACITY>,
    cursor: usize,
}

impl StationCatalog {
    /// Build a catalog positioned on the first station.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Empty`] for an empty list, [`CatalogError::Capacity`]
    /// for more than [`CATALOG_CAPACITY`] stations.
    pub fn new<I>(stations: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Station>,
    {
        Self::with_cursor(stations, 0)
    }

    /// Build a catalog positioned on `cursor`.
    ///
    /// # Errors
    ///
    /// As [`StationCatalog::new`], plus [`CatalogError::CursorOutOfRange`].
    pub fn with_cursor<I>(stations: I, cursor: usize) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Station>,
    {
        let mut list = Vec::new();
        for station in stations {
            list.push(station).map_err(|_| CatalogError::Capacity)?;
        }
        if list.is_empty() {
            return Err(CatalogError::Empty);
        }
        if cursor >= list.len() {
            return Err(CatalogError::CursorOutOfRange {
                cursor,
                len: list.len(),
            });
        }
        Ok(Self {
            stations: list,
            cursor,
        })
    }

    /// Advance one station, wrapping past the end.
    pub fn next(&mut self) {
        self.cursor = self
            .cursor
            .checked_add(1)
            .filter(|&c| c < self.stations.len())
            .unwrap_or(0);
    }

    /// Go back one station, wrapping before the start.
    pub fn previous(&mut self) {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or_else(|| self.stations.len().saturating_sub(1));
    }

    /// Move the cursor in `direction`.
    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Next => self.next(),
            Direction::Previous => self.previous(),
            Direction::Same => {}
        }
    }

    /// Station under the cursor.
    #[allow(clippy::indexing_slicing)] // cursor < len is upheld by every mutator
    pub fn current(&self) -> &Station {
        &self.stations[self.cursor]
    }

    /// Station at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Number of stations. Never zero.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All stations in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Station> {
        self.stations.iter()
    }
}

impl<'a> IntoIterator for &'a StationCatalog {
    type Item = &'a Station;
    type IntoIter = core::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
