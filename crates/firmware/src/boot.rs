//! Boot sequence for the pushbutton radio.
//!
//! Initialization order (MUST be respected):
//!   1. Buffers: reserve the stream buffer and codec scratch memory
//!   2. Button: build the classifier and register the gesture handlers
//!   3. Network: join the access point, retrying forever
//!   4. Audio: start the preselected station
//!
//! Buffers come first so that a board without enough free memory halts
//! before it touches the network. The network join is the only blocking step
//! in the whole program; once [`boot`] returns, everything runs from the
//! cooperative loop in [`RadioApp::run_iteration`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use platform::{Clock, Credentials, LinkInfo, NetworkLink, SessionFactory};
use playback::{CatalogError, Direction, PlaybackSupervisor};

use crate::app::RadioApp;
use crate::config::{ConfigError, RadioConfig};
use crate::input::TimingError;

/// Ordered list of boot sequence steps for documentation and testing.
///
/// [`boot`] logs each entry as it reaches it; tests assert the order.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[STEP_BUFFERS, STEP_BUTTON, STEP_NETWORK, STEP_AUDIO];

const STEP_BUFFERS: &str = "1. Buffers: reserve 4 KiB stream buffer + 10 KiB codec scratch";
const STEP_BUTTON: &str =
    "2. Button: build classifier, register click/long-click/double-click handlers";
const STEP_NETWORK: &str = "3. Network: associate with access point (retry forever, 1 s period)";
const STEP_AUDIO: &str = "4. Audio: start preselected station";

/// Delay between association polls.
pub const ASSOCIATION_POLL_MS: u32 = 1_000;

// ── Buffer plan ──────────────────────────────────────────────────────────────

/// Memory the audio pipeline needs for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferPlan {
    /// Read-ahead buffer between network source and decoder, in bytes.
    pub stream_buffer: usize,
    /// Decoder working memory, in bytes.
    pub codec_scratch: usize,
}

impl BufferPlan {
    /// 4 KiB stream buffer, 10 KiB codec scratch.
    pub const DEFAULT: Self = Self {
        stream_buffer: 4 * 1024,
        codec_scratch: 10 * 1024,
    };

    /// Total bytes required.
    pub fn total(&self) -> usize {
        self.stream_buffer.saturating_add(self.codec_scratch)
    }

    /// Check the plan against the memory available to the audio pipeline.
    ///
    /// # Errors
    ///
    /// [`BootError::OutOfMemory`] when `available < total()`.
    pub fn check(&self, available: usize) -> Result<(), BootError> {
        let required = self.total();
        if available < required {
            return Err(BootError::OutOfMemory {
                required,
                available,
            });
        }
        Ok(())
    }
}

impl Default for BufferPlan {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Fatal startup failure. The entry point logs it and halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// Not enough memory for the audio buffers.
    OutOfMemory {
        /// Bytes the buffer plan needs.
        required: usize,
        /// Bytes available.
        available: usize,
    },
    /// The configuration is invalid.
    Config(ConfigError),
    /// The network interface refused to start associating.
    NetworkUnavailable,
}

impl core::fmt::Display for BootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfMemory {
                required,
                available,
            } => write!(
                f,
                "audio buffers need {required} bytes but only {available} are available"
            ),
            Self::Config(e) => write!(f, "{e}"),
            Self::NetworkUnavailable => f.write_str("network interface refused to start"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BootError {}

impl From<ConfigError> for BootError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CatalogError> for BootError {
    fn from(e: CatalogError) -> Self {
        Self::Config(ConfigError::Catalog(e))
    }
}

impl From<TimingError> for BootError {
    fn from(e: TimingError) -> Self {
        Self::Config(ConfigError::Timing(e))
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

/// Join the access point, polling once per second until associated.
///
/// Blocks for as long as it takes; there is no timeout, the radio has nothing
/// to do without a network.
///
/// # Errors
///
/// [`BootError::NetworkUnavailable`] if the interface will not even begin.
pub fn associate_blocking<L, D>(
    link: &mut L,
    credentials: &Credentials,
    delay: &mut D,
) -> Result<LinkInfo, BootError>
where
    L: NetworkLink,
    D: DelayNs,
{
    tracing::info!(ssid = %credentials.ssid, "connecting to WiFi");
    link.begin(credentials).map_err(|error| {
        tracing::error!(%error, "WiFi interface refused to start");
        BootError::NetworkUnavailable
    })?;

    let mut attempts: u32 = 0;
    while !link.is_associated() {
        attempts = attempts.saturating_add(1);
        tracing::debug!(attempts, "...connecting to WiFi");
        delay.delay_ms(ASSOCIATION_POLL_MS);
    }

    let info = link.info();
    tracing::info!("connected\n{info}");
    Ok(info)
}

// ── Boot ─────────────────────────────────────────────────────────────────────

/// Hardware handed to [`boot`].
pub struct BootResources<'a, P, F, K, L, D> {
    /// Button input pin.
    pub pin: P,
    /// Audio session factory.
    pub factory: F,
    /// Monotonic clock.
    pub clock: K,
    /// WiFi interface.
    pub link: &'a mut L,
    /// Blocking delay for the association loop.
    pub delay: &'a mut D,
    /// Memory available to the audio pipeline, in bytes.
    pub available_memory: usize,
}

/// Run the boot sequence and return the ready-to-run application.
///
/// # Errors
///
/// Any [`BootError`]; all of them are fatal.
pub fn boot<P, F, K, L, D>(
    config: &RadioConfig,
    resources: BootResources<'_, P, F, K, L, D>,
) -> Result<(RadioApp<P, F, K>, LinkInfo), BootError>
where
    P: InputPin,
    F: SessionFactory,
    K: Clock,
    L: NetworkLink,
    D: DelayNs,
{
    tracing::info!("{}", platform::config::boot_banner());

    tracing::info!("{STEP_BUFFERS}");
    BufferPlan::DEFAULT.check(resources.available_memory)?;

    tracing::info!("{STEP_BUTTON}");
    let catalog = config.catalog()?;
    let push_button = config.classifier().build_button(resources.pin)?;
    let supervisor =
        PlaybackSupervisor::new(catalog, resources.factory, resources.clock, config.retry_policy())
            .with_volume(config.volume());
    let mut app = RadioApp::new(push_button, supervisor, config.verbose);

    tracing::info!("{STEP_NETWORK}");
    let info = associate_blocking(resources.link, &config.credentials, resources.delay)?;

    tracing::info!("{STEP_AUDIO}");
    app.supervisor_mut().select_and_play(Direction::Same);
    app.supervisor().show_current();

    Ok((app, info))
}
