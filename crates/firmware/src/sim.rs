//! Desktop stand-ins for the radio's hardware.
//!
//! - [`SimSessionFactory`] / [`SimSession`]: a stream pipeline (source →
//!   buffer → decoder) that produces fake MP3 frames and can be told to fail
//! - [`SimLink`]: a WiFi link that associates after a few polls
//! - [`ScriptedPin`] / [`ButtonScript`]: a button pin driven by a timeline of
//!   presses, fed from the keyboard by the simulator binary
//! - [`StdDelay`]: `DelayNs` on top of `std::thread::sleep`
//!
//! The mocks in `platform::mocks` are for assertions; these are for watching
//! the radio behave in real time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use platform::{
    truncated, AudioSession, Credentials, Gain, LinkInfo, NetworkLink, SessionEvent,
    SessionFactory, StepOutcome,
};

use crate::boot::{BootError, BufferPlan};

/// Bytes in one 128 kbit/s MP3 frame at 44.1 kHz.
const FRAME_BYTES: usize = 417;

// ── Stream pipeline ──────────────────────────────────────────────────────────

/// Simulated stream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimStreamError {
    /// The host did not answer.
    Unreachable(String),
}

impl core::fmt::Display for SimStreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unreachable(uri) => write!(f, "host unreachable: {uri}"),
        }
    }
}

impl std::error::Error for SimStreamError {}

#[derive(Debug)]
struct Source {
    uri: String,
    frames_left: Option<u32>,
}

#[derive(Debug)]
struct Buffer {
    memory: Rc<RefCell<Vec<u8>>>,
    fill: usize,
}

#[derive(Debug)]
struct Decoder {
    frames: u64,
}

/// Factory for [`SimSession`]s. Owns the preallocated pipeline memory.
#[derive(Debug, Clone)]
pub struct SimSessionFactory {
    stream_buffer: Rc<RefCell<Vec<u8>>>,
    codec_scratch: Rc<RefCell<Vec<u8>>>,
    unreachable: Vec<String>,
    frames_per_stream: Option<u32>,
}

impl SimSessionFactory {
    /// Reserve the memory described by `plan`.
    ///
    /// # Errors
    ///
    /// [`BootError::OutOfMemory`] when the allocator refuses.
    pub fn preallocate(plan: BufferPlan) -> Result<Self, BootError> {
        let oom = BootError::OutOfMemory {
            required: plan.total(),
            available: 0,
        };
        let mut stream_buffer = Vec::new();
        stream_buffer
            .try_reserve_exact(plan.stream_buffer)
            .map_err(|_| oom)?;
        let mut codec_scratch = Vec::new();
        codec_scratch
            .try_reserve_exact(plan.codec_scratch)
            .map_err(|_| oom)?;
        codec_scratch.resize(plan.codec_scratch, 0);
        tracing::debug!(
            stream_buffer = plan.stream_buffer,
            codec_scratch = plan.codec_scratch,
            "audio buffers reserved"
        );
        Ok(Self {
            stream_buffer: Rc::new(RefCell::new(stream_buffer)),
            codec_scratch: Rc::new(RefCell::new(codec_scratch)),
            unreachable: Vec::new(),
            frames_per_stream: None,
        })
    }

    /// Treat `uri` as an unreachable host.
    #[must_use]
    pub fn with_unreachable(mut self, uri: &str) -> Self {
        self.unreachable.push(uri.to_owned());
        self
    }

    /// End every stream after `frames` decoded frames.
    #[must_use]
    pub fn with_frames_per_stream(mut self, frames: u32) -> Self {
        self.frames_per_stream = Some(frames);
        self
    }

    /// Capacity of the shared stream buffer.
    pub fn stream_buffer_capacity(&self) -> usize {
        self.stream_buffer.borrow().capacity()
    }

    /// Size of the codec scratch area.
    pub fn codec_scratch_len(&self) -> usize {
        self.codec_scratch.borrow().len()
    }
}

impl SessionFactory for SimSessionFactory {
    type Session = SimSession;

    fn create(&mut self) -> SimSession {
        SimSession {
            memory: Rc::clone(&self.stream_buffer),
            unreachable: self.unreachable.clone(),
            frames_per_stream: self.frames_per_stream,
            source: None,
            buffer: None,
            decoder: None,
            gain: Gain::UNITY,
            events: VecDeque::new(),
        }
    }
}

/// One simulated stream.
#[derive(Debug)]
pub struct SimSession {
    memory: Rc<RefCell<Vec<u8>>>,
    unreachable: Vec<String>,
    frames_per_stream: Option<u32>,
    source: Option<Source>,
    buffer: Option<Buffer>,
    decoder: Option<Decoder>,
    gain: Gain,
    events: VecDeque<SessionEvent>,
}

impl SimSession {
    /// Frames decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.decoder.as_ref().map_or(0, |d| d.frames)
    }

    /// Gain last applied.
    pub fn gain(&self) -> Gain {
        self.gain
    }

    fn push_status(&mut self, code: i32, message: &str) {
        self.events.push_back(SessionEvent::Status {
            code,
            message: truncated(message),
        });
    }
}

impl AudioSession for SimSession {
    type Error = SimStreamError;

    fn start(&mut self, uri: &str) -> Result<(), Self::Error> {
        self.source = Some(Source {
            uri: uri.to_owned(),
            frames_left: self.frames_per_stream,
        });
        if self.unreachable.iter().any(|u| u == uri) {
            return Err(SimStreamError::Unreachable(uri.to_owned()));
        }

        self.memory.borrow_mut().clear();
        self.buffer = Some(Buffer {
            memory: Rc::clone(&self.memory),
            fill: 0,
        });
        self.decoder = Some(Decoder { frames: 0 });

        let title = uri.rsplit('/').find(|s| !s.is_empty()).unwrap_or(uri);
        self.events.push_back(SessionEvent::Metadata {
            kind: truncated("StreamTitle"),
            value: truncated(title),
        });
        Ok(())
    }

    fn poll_step(&mut self) -> StepOutcome {
        let (Some(source), Some(buffer), Some(decoder)) =
            (self.source.as_mut(), self.buffer.as_mut(), self.decoder.as_mut())
        else {
            return StepOutcome::Ended;
        };

        if source.frames_left == Some(0) {
            self.decoder = None;
            self.push_status(-1, "stream closed by server");
            return StepOutcome::Ended;
        }

        // Source fills the buffer up to capacity, decoder drains one frame.
        {
            let mut memory = buffer.memory.borrow_mut();
            let room = memory.capacity().saturating_sub(buffer.fill);
            let chunk = room.min(FRAME_BYTES.saturating_mul(2));
            memory.extend(core::iter::repeat(0u8).take(chunk));
            buffer.fill = buffer.fill.saturating_add(chunk);
        }
        if buffer.fill >= FRAME_BYTES {
            buffer.fill = buffer.fill.saturating_sub(FRAME_BYTES);
            buffer.memory.borrow_mut().drain(..FRAME_BYTES);
            decoder.frames = decoder.frames.saturating_add(1);
            if let Some(left) = source.frames_left.as_mut() {
                *left = left.saturating_sub(1);
            }
        }
        StepOutcome::Progress
    }

    fn is_running(&self) -> bool {
        self.decoder.is_some()
    }

    fn stop(&mut self) {
        if self.decoder.take().is_some() {
            tracing::debug!("decoder stopped");
        }
        if let Some(buffer) = self.buffer.take() {
            buffer.memory.borrow_mut().clear();
            tracing::debug!("buffer released");
        }
        if let Some(source) = self.source.take() {
            tracing::debug!(uri = %source.uri, "source closed");
        }
    }

    fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    fn take_event(&mut self) -> Option<SessionEvent> {
        self.events.pop_front()
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

/// Simulated association failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimLinkError;

impl core::fmt::Display for SimLinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("simulated WiFi interface is down")
    }
}

impl std::error::Error for SimLinkError {}

/// WiFi link that associates after a fixed number of polls.
#[derive(Debug, Clone)]
pub struct SimLink {
    polls_needed: u32,
    polls: u32,
    info: LinkInfo,
    started: bool,
}

impl SimLink {
    /// Associate on the `polls_needed`-th poll.
    pub fn new(polls_needed: u32) -> Self {
        let mut info = LinkInfo {
            ip: [10, 0, 0, 42],
            mac: [0x02, 0x52, 0x41, 0x44, 0x49, 0x4F],
            rssi: -55,
            ..LinkInfo::default()
        };
        let _ = info.hostname.push_str("pushbutton-radio");
        Self {
            polls_needed,
            polls: 0,
            info,
            started: false,
        }
    }
}

impl NetworkLink for SimLink {
    type Error = SimLinkError;

    fn begin(&mut self, credentials: &Credentials) -> Result<(), Self::Error> {
        self.info.ssid.clone_from(&credentials.ssid);
        self.started = true;
        Ok(())
    }

    fn is_associated(&mut self) -> bool {
        self.polls = self.polls.saturating_add(1);
        self.started && self.polls >= self.polls_needed
    }

    fn info(&self) -> LinkInfo {
        self.info.clone()
    }
}

/// Blocking delay backed by the OS scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ── Button ───────────────────────────────────────────────────────────────────

/// Hold time of a simulated click.
pub const CLICK_HOLD: Duration = Duration::from_millis(100);
/// Hold time of a simulated long click.
pub const LONG_CLICK_HOLD: Duration = Duration::from_millis(600);
/// Release time between the two presses of a simulated double click.
pub const DOUBLE_CLICK_PAUSE: Duration = Duration::from_millis(100);
/// Release time after every simulated gesture. Longer than the default
/// double-click gap.
pub const GESTURE_SETTLE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy)]
struct Segment {
    pressed: bool,
    until: Instant,
}

#[derive(Debug, Default)]
struct Script {
    segments: VecDeque<Segment>,
}

impl Script {
    fn pressed_at(&mut self, now: Instant) -> bool {
        while self.segments.front().is_some_and(|s| s.until <= now) {
            self.segments.pop_front();
        }
        self.segments.front().is_some_and(|s| s.pressed)
    }

    fn push(&mut self, pressed: bool, hold: Duration, now: Instant) {
        let start = self.segments.back().map_or(now, |s| s.until.max(now));
        let until = start.checked_add(hold).unwrap_or(start);
        self.segments.push_back(Segment { pressed, until });
    }
}

/// Feeds presses to a [`ScriptedPin`].
#[derive(Debug, Clone)]
pub struct ButtonScript {
    script: Rc<RefCell<Script>>,
}

impl ButtonScript {
    /// Queue a short press.
    pub fn click(&self) {
        self.queue(&[CLICK_HOLD], Instant::now());
    }

    /// Queue a long press.
    pub fn long_click(&self) {
        self.queue(&[LONG_CLICK_HOLD], Instant::now());
    }

    /// Queue two short presses.
    pub fn double_click(&self) {
        self.queue(&[CLICK_HOLD, CLICK_HOLD], Instant::now());
    }

    /// Queue one gesture: the given presses separated by
    /// [`DOUBLE_CLICK_PAUSE`], then a [`GESTURE_SETTLE`] release so the next
    /// queued gesture is classified on its own.
    fn queue(&self, holds: &[Duration], now: Instant) {
        let mut script = self.script.borrow_mut();
        for (i, hold) in holds.iter().enumerate() {
            if i > 0 {
                script.push(false, DOUBLE_CLICK_PAUSE, now);
            }
            script.push(true, *hold, now);
        }
        script.push(false, GESTURE_SETTLE, now);
    }
}

/// Active-low button pin whose level follows a [`ButtonScript`].
#[derive(Debug)]
pub struct ScriptedPin {
    script: Rc<RefCell<Script>>,
}

impl ScriptedPin {
    /// A released pin and the script that drives it.
    pub fn new() -> (Self, ButtonScript) {
        let script = Rc::new(RefCell::new(Script::default()));
        (
            Self {
                script: Rc::clone(&script),
            },
            ButtonScript { script },
        )
    }
}

impl ErrorType for ScriptedPin {
    type Error = core::convert::Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.script.borrow_mut().pressed_at(Instant::now()))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.script.borrow_mut().pressed_at(Instant::now()))
    }
}
