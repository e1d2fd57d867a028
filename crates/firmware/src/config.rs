//! Radio configuration.
//!
//! Everything the radio needs at startup: the station table, which station
//! to start on, output volume, WiFi credentials, button timing and the
//! stream retry policy. Loaded once and never changed afterwards.
//!
//! The default configuration carries the built-in station table. With the
//! `std` feature a configuration can also be read from JSON; omitted fields
//! keep their defaults:
//!
//! ```json
//! {
//!   "start_index": 0,
//!   "volume": 60,
//!   "credentials": { "ssid": "home", "psk": "secret" },
//!   "stations": [ { "name": "DLF", "uri": "http://st01.dlf.de/dlf/01/128/mp3/stream.mp3" } ],
//!   "retry": { "max_retries": 3 },
//!   "verbose": true
//! }
//! ```
//!
//! Without `start_index` the built-in table starts on SWISS CLASSIC and a
//! custom table starts on its first station. `verbose` defaults to `false`.

use embassy_time::Duration;
use heapless::Vec;
use platform::{ActiveLevel, Credentials, VolumePercent};
use playback::{CatalogError, RetryPolicy, Station, StationCatalog, CATALOG_CAPACITY};

use crate::input::{ClassifierBuilder, TimingError};

/// Station table shipped with the radio.
pub const BUILTIN_STATIONS: &[(&str, &str)] = &[
    ("SRF1 AG-SO", "http://stream.srg-ssr.ch/m/regi_ag_so/mp3_128"),
    ("SRF2", "http://stream.srg-ssr.ch/m/drs2/mp3_128"),
    ("SRF3", "http://stream.srg-ssr.ch/m/drs3/mp3_128"),
    ("SRF4 NEWS", "http://stream.srg-ssr.ch/m/drs4news/mp3_128"),
    ("SWISS CLASSIC", "http://stream.srg-ssr.ch/m/rsc_de/mp3_128"),
    ("SWISS JAZZ", "http://stream.srg-ssr.ch/m/rsj/mp3_128"),
    ("MUSIKWELLE", "http://stream.srg-ssr.ch/m/drsmw/mp3_128"),
    ("BLASMUSIK", "http://stream.bayerwaldradio.com/allesblasmusik"),
    ("KVB", "http://kvbstreams.dyndns.org:8000/wkvi-am"),
    (
        "Klassik Radio",
        "http://stream.klassikradio.de/live/mp3-128/stream.klassikradio.de/",
    ),
    ("DLF", "http://st01.dlf.de/dlf/01/128/mp3/stream.mp3"),
    (
        "WDR",
        "http://wdr-1live-live.icecast.wdr.de/wdr/1live/live/mp3/128/stream.mp3",
    ),
    (
        "SWR4",
        "http://swr-swr4-bw.cast.addradio.de/swr/swr4/bw/mp3/128/stream.mp3",
    ),
];

/// Index of the preselected station (SWISS CLASSIC).
pub const DEFAULT_START_INDEX: usize = 4;

/// Build the built-in station list.
pub fn builtin_stations() -> Vec<Station, CATALOG_CAPACITY> {
    let mut stations = Vec::new();
    for (name, uri) in BUILTIN_STATIONS {
        // Every built-in entry fits its bounds; see `test_builtin_table_fits`.
        if let Ok(station) = Station::new(name, uri) {
            let _ = stations.push(station);
        }
    }
    stations
}

// ── Sections ─────────────────────────────────────────────────────────────────

/// Button timing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct ButtonSettings {
    /// Presses shorter than this are bounce noise.
    pub debounce_ms: u64,
    /// Presses longer than this are long clicks.
    pub long_click_ms: u64,
    /// How long a single click waits for a second one.
    pub double_click_gap_ms: u64,
    /// Wiring polarity.
    pub active_level: ActiveLevel,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_click_ms: 300,
            double_click_gap_ms: 250,
            active_level: ActiveLevel::Low,
        }
    }
}

/// Stream retry section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct RetrySettings {
    /// Wait after a stream failure before retrying.
    pub cooldown_ms: u64,
    /// Restarts of the same station before moving on.
    pub max_retries: u8,
    /// Spacing of "still playing" log lines in verbose mode.
    pub heartbeat_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            cooldown_ms: 2_000,
            max_retries: 2,
            heartbeat_ms: 5_000,
        }
    }
}

// ── RadioConfig ──────────────────────────────────────────────────────────────

/// Complete startup configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct RadioConfig {
    /// Station table, in button order.
    pub stations: Vec<Station, CATALOG_CAPACITY>,
    /// Station played after boot. When unset, see
    /// [`start_index`](Self::start_index).
    pub start_index: Option<usize>,
    /// Output volume in percent; values above 100 are clamped.
    pub volume: u8,
    /// Access point to join.
    pub credentials: Credentials,
    /// Button timing.
    pub button: ButtonSettings,
    /// Stream retry policy.
    pub retry: RetrySettings,
    /// Log a heartbeat while a stream plays. Off by default.
    pub verbose: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            stations: builtin_stations(),
            start_index: None,
            volume: 100,
            credentials: Credentials::default(),
            button: ButtonSettings::default(),
            retry: RetrySettings::default(),
            verbose: false,
        }
    }
}

impl RadioConfig {
    /// Station played after boot.
    ///
    /// An explicit `start_index` wins. Otherwise the built-in table starts on
    /// [`DEFAULT_START_INDEX`] and a custom table starts on its first entry.
    pub fn start_index(&self) -> usize {
        match self.start_index {
            Some(index) => index,
            None if self.stations == builtin_stations() => DEFAULT_START_INDEX,
            None => 0,
        }
    }

    /// Build the station catalog positioned on [`start_index`](Self::start_index).
    ///
    /// # Errors
    ///
    /// [`CatalogError`] for an empty table or an out-of-range start index.
    pub fn catalog(&self) -> Result<StationCatalog, CatalogError> {
        StationCatalog::with_cursor(self.stations.iter().cloned(), self.start_index())
    }

    /// Classifier builder preloaded with the button section.
    pub fn classifier(&self) -> ClassifierBuilder {
        ClassifierBuilder::new()
            .debounce_ms(self.button.debounce_ms)
            .long_click_ms(self.button.long_click_ms)
            .double_click_gap_ms(self.button.double_click_gap_ms)
            .active_level(self.button.active_level)
    }

    /// Retry policy from the retry section.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            cooldown: Duration::from_millis(self.retry.cooldown_ms),
            max_retries: self.retry.max_retries,
            heartbeat: Duration::from_millis(self.retry.heartbeat_ms),
        }
    }

    /// Output volume.
    pub fn volume(&self) -> VolumePercent {
        VolumePercent::new(self.volume)
    }

    /// Check every section that can be invalid.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Catalog`] or [`ConfigError::Timing`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog().map_err(ConfigError::Catalog)?;
        self.classifier().timing().map_err(ConfigError::Timing)?;
        Ok(())
    }
}

#[cfg(feature = "std")]
impl RadioConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or a field that does not fit
    /// its bound, otherwise as [`RadioConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`RadioConfig::from_json_str`].
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.kind()))?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), stations = config.stations.len(), "configuration loaded");
        Ok(config)
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Invalid or unreadable configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Station table problem.
    Catalog(CatalogError),
    /// Button timing problem.
    Timing(TimingError),
    /// JSON could not be parsed at the given position.
    Parse {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },
    /// The configuration file could not be read.
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "invalid station table: {e}"),
            Self::Timing(e) => write!(f, "invalid button timing: {e}"),
            Self::Parse { line, column } => {
                write!(f, "malformed configuration at line {line}, column {column}")
            }
            #[cfg(feature = "std")]
            Self::Io(kind) => write!(f, "cannot read configuration: {kind}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<TimingError> for ConfigError {
    fn from(e: TimingError) -> Self {
        Self::Timing(e)
    }
}
