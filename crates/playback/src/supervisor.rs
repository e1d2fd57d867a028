//! Playback supervisor.
//!
//! `PlaybackSupervisor` owns the station catalog and at most one live
//! [`AudioSession`]. It is driven from the cooperative main loop: gestures
//! call [`select_and_play`], and every loop iteration calls [`tick`] while
//! the supervisor is active.
//!
//! ```text
//!   Idle ──select_and_play──► Starting ──start ok──► Running
//!                                │                      │ stream ended
//!                      start fails│                      ▼
//!                  (skip forward, │                   Failed { since }
//!                  ≤ len attempts)│                      │ cooldown elapsed
//!                                ▼                      ▼
//!                        AllStationsDown      retry (Same) or failover (Next)
//! ```
//!
//! Nothing here blocks. The retry cooldown is a timestamp compared on each
//! tick, not a sleep.
//!
//! [`select_and_play`]: PlaybackSupervisor::select_and_play
//! [`tick`]: PlaybackSupervisor::tick

use embassy_time::{Duration, Instant};
use platform::{
    elapsed, AudioSession, Clock, Gain, SessionEvent, SessionFactory, StepOutcome, VolumePercent,
};

use crate::catalog::{Direction, Station, StationCatalog};

/// Retry and heartbeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after a stream failure before acting on it.
    pub cooldown: Duration,
    /// Restarts of the same station before failing over to the next.
    pub max_retries: u8,
    /// Minimum spacing of "still playing" notifications in verbose mode.
    pub heartbeat: Duration,
}

impl RetryPolicy {
    /// 2 s cooldown, 2 retries, 5 s heartbeat.
    pub const DEFAULT: Self = Self {
        cooldown: Duration::from_millis(2_000),
        max_retries: 2,
        heartbeat: Duration::from_millis(5_000),
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Supervisor lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No session; nothing to do until a gesture arrives.
    Idle,
    /// A session is being constructed. Only observable from inside
    /// `select_and_play`.
    Starting,
    /// A session is live and decoding.
    Running,
    /// The last session ended at `since`; waiting out the cooldown.
    Failed {
        /// When the failure was detected.
        since: Instant,
    },
    /// One full pass over the catalog found no station that would start.
    AllStationsDown,
}

/// What a single [`PlaybackSupervisor::tick`] did. Observational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Supervisor is idle; nothing was polled.
    Idle,
    /// One decode step made progress.
    Playing,
    /// Progress, and the verbose heartbeat fired.
    StillPlaying,
    /// The stream ended this tick; cooldown started.
    StreamEnded,
    /// Still inside the cooldown window.
    CoolingDown,
    /// Cooldown over; restarted the same station.
    Retried,
    /// Moved on to another station, either because retries were exhausted
    /// or because the retry itself would not start.
    FailedOver,
    /// No station in the catalog would start.
    AllStationsDown,
}

/// Owns the catalog and the single live session.
pub struct PlaybackSupervisor<F: SessionFactory, K: Clock> {
    catalog: StationCatalog,
    factory: F,
    clock: K,
    session: Option<F::Session>,
    state: SupervisorState,
    retry_count: u8,
    policy: RetryPolicy,
    gain: Gain,
    last_heartbeat: Option<Instant>,
}

impl<F: SessionFactory, K: Clock> PlaybackSupervisor<F, K> {
    /// Create an idle supervisor. Nothing plays until
    /// [`select_and_play`](Self::select_and_play) is called.
    pub fn new(catalog: StationCatalog, factory: F, clock: K, policy: RetryPolicy) -> Self {
        Self {
            catalog,
            factory,
            clock,
            session: None,
            state: SupervisorState::Idle,
            retry_count: 0,
            policy,
            gain: Gain::UNITY,
            last_heartbeat: None,
        }
    }

    /// Set the initial volume (builder style).
    #[must_use]
    pub fn with_volume(mut self, volume: VolumePercent) -> Self {
        self.gain = volume.to_gain();
        self
    }

    /// Stop whatever is playing, move the cursor and start the resulting
    /// station.
    ///
    /// A station that fails to start, or starts but does not report running,
    /// is skipped in favour of the next one. At most `catalog.len()` stations
    /// are tried; if none starts the supervisor parks in
    /// [`SupervisorState::AllStationsDown`].
    pub fn select_and_play(&mut self, direction: Direction) -> SupervisorState {
        self.teardown();
        self.catalog.step(direction);
        if direction != Direction::Same {
            self.retry_count = 0;
        }

        let attempts = self.catalog.len();
        for attempt in 0..attempts {
            if attempt > 0 {
                self.catalog.next();
                self.retry_count = 0;
            }
            if self.try_start_current() {
                return self.state;
            }
        }

        tracing::warn!(attempts, "no station in the catalog would start");
        self.retry_count = 0;
        self.state = SupervisorState::AllStationsDown;
        self.state
    }

    fn try_start_current(&mut self) -> bool {
        self.state = SupervisorState::Starting;
        let station = self.catalog.current();
        tracing::info!(
            index = self.catalog.cursor(),
            name = %station.name,
            uri = %station.uri,
            "starting station"
        );

        let mut session = self.factory.create();
        if let Err(error) = session.start(station.uri.as_str()) {
            tracing::warn!(name = %station.name, %error, "stream failed to start, skipping");
            session.stop();
            return false;
        }
        session.set_gain(self.gain);
        if !session.is_running() {
            tracing::warn!(name = %station.name, "decoder not running, skipping");
            session.stop();
            return false;
        }

        self.session = Some(session);
        self.state = SupervisorState::Running;
        self.last_heartbeat = Some(self.clock.now());
        true
    }

    /// Advance the supervisor by one scheduler iteration.
    ///
    /// While running, performs one decode step. After a failure, waits out
    /// the cooldown and then retries the same station up to
    /// `max_retries` times before failing over to the next one.
    pub fn tick(&mut self, verbose: bool) -> TickOutcome {
        let now = self.clock.now();
        match self.state {
            SupervisorState::Idle | SupervisorState::Starting => TickOutcome::Idle,
            SupervisorState::AllStationsDown => TickOutcome::AllStationsDown,
            SupervisorState::Running => self.tick_running(now, verbose),
            SupervisorState::Failed { since } => self.tick_failed(now, since),
        }
    }

    fn tick_running(&mut self, now: Instant, verbose: bool) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            self.state = SupervisorState::Idle;
            return TickOutcome::Idle;
        };

        let step = session.poll_step();
        while let Some(event) = session.take_event() {
            log_event(&event);
        }

        match step {
            StepOutcome::Progress => {
                if verbose && self.heartbeat_due(now) {
                    self.last_heartbeat = Some(now);
                    let station = self.catalog.current();
                    tracing::info!(name = %station.name, "still playing");
                    TickOutcome::StillPlaying
                } else {
                    TickOutcome::Playing
                }
            }
            StepOutcome::Ended => {
                tracing::warn!(
                    name = %self.catalog.current().name,
                    retry = self.retry_count,
                    "stream ended"
                );
                self.teardown();
                self.state = SupervisorState::Failed { since: now };
                TickOutcome::StreamEnded
            }
        }
    }

    fn tick_failed(&mut self, now: Instant, since: Instant) -> TickOutcome {
        if elapsed(now, since) < self.policy.cooldown {
            return TickOutcome::CoolingDown;
        }

        let action = if self.retry_count < self.policy.max_retries {
            self.retry_count = self.retry_count.saturating_add(1);
            tracing::warn!(
                retry = self.retry_count,
                max = self.policy.max_retries,
                "retrying station"
            );
            let before = self.catalog.cursor();
            self.select_and_play(Direction::Same);
            if self.catalog.cursor() == before {
                TickOutcome::Retried
            } else {
                TickOutcome::FailedOver
            }
        } else {
            tracing::warn!("retries exhausted, failing over to next station");
            self.retry_count = 0;
            self.select_and_play(Direction::Next);
            TickOutcome::FailedOver
        };

        if self.state == SupervisorState::AllStationsDown {
            TickOutcome::AllStationsDown
        } else {
            action
        }
    }

    fn heartbeat_due(&self, now: Instant) -> bool {
        self.last_heartbeat
            .map_or(true, |last| elapsed(now, last) >= self.policy.heartbeat)
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
            tracing::debug!("session torn down");
        }
    }

    /// Log the current station and return it. Does not touch the session.
    pub fn show_current(&self) -> &Station {
        let station = self.catalog.current();
        tracing::info!("Current Station: {} --> {}", station.name, station.uri);
        station
    }

    /// Tear down the live session and go idle.
    pub fn stop(&mut self) {
        self.teardown();
        self.retry_count = 0;
        self.state = SupervisorState::Idle;
    }

    /// Change the output volume of the live session and all later ones.
    pub fn set_volume(&mut self, volume: VolumePercent) {
        self.gain = volume.to_gain();
        if let Some(session) = self.session.as_mut() {
            session.set_gain(self.gain);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Retries spent on the current station.
    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// The station catalog.
    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    /// The clock driving cooldowns and heartbeats.
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Gain applied to sessions.
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Whether [`tick`](Self::tick) has work to do.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            SupervisorState::Running | SupervisorState::Failed { .. }
        )
    }
}

impl<F: SessionFactory, K: Clock> Drop for PlaybackSupervisor<F, K> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::Metadata { kind, value } => {
            tracing::info!(kind = %kind, value = %value, "stream metadata");
        }
        SessionEvent::Status { code, message } => {
            tracing::warn!(code, message = %message, "stream status");
        }
    }
}
