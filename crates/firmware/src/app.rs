//! Event wiring and the cooperative main loop body.
//!
//! | Gesture       | Action                         |
//! |---------------|--------------------------------|
//! | `Click`       | next station                   |
//! | `LongClick`   | previous station               |
//! | `DoubleClick` | log the current station        |
//!
//! Each loop iteration first ticks the supervisor (only while it is running
//! or cooling down after a failure), then polls the button. A station change
//! requested by a gesture is therefore first ticked on the next iteration.

use embedded_hal::digital::InputPin;
use platform::{Clock, SessionFactory};
use playback::{Direction, PlaybackSupervisor, TickOutcome};

use crate::input::{Gesture, PushButton};

/// Supervisor type the button handlers operate on.
pub type Supervisor<F, K> = PlaybackSupervisor<F, K>;

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Iteration {
    /// Supervisor tick result; `None` when the supervisor was inactive.
    pub tick: Option<TickOutcome>,
    /// Gesture recognised this iteration.
    pub gesture: Option<Gesture>,
}

/// The radio: one button wired to one playback supervisor.
pub struct RadioApp<P, F: SessionFactory, K: Clock> {
    button: PushButton<P, Supervisor<F, K>>,
    supervisor: Supervisor<F, K>,
    verbose: bool,
}

impl<P, F, K> RadioApp<P, F, K>
where
    P: InputPin,
    F: SessionFactory,
    K: Clock,
{
    /// Wire `button` to `supervisor`, replacing any registered handlers.
    pub fn new(
        mut button: PushButton<P, Supervisor<F, K>>,
        supervisor: Supervisor<F, K>,
        verbose: bool,
    ) -> Self {
        wire_handlers(&mut button);
        Self {
            button,
            supervisor,
            verbose,
        }
    }

    /// One pass of the cooperative loop. Never blocks.
    pub fn run_iteration(&mut self) -> Iteration {
        let tick = self
            .supervisor
            .is_active()
            .then(|| self.supervisor.tick(self.verbose));
        let now = self.supervisor.clock().now();
        let gesture = self.button.poll(now, &mut self.supervisor);
        Iteration { tick, gesture }
    }

    /// The playback supervisor.
    pub fn supervisor(&self) -> &Supervisor<F, K> {
        &self.supervisor
    }

    /// Mutable access for console commands (stop, volume).
    pub fn supervisor_mut(&mut self) -> &mut Supervisor<F, K> {
        &mut self.supervisor
    }

    /// The push button.
    pub fn button(&self) -> &PushButton<P, Supervisor<F, K>> {
        &self.button
    }
}

/// Register the radio's gesture handlers on `button`.
pub fn wire_handlers<P, F, K>(button: &mut PushButton<P, Supervisor<F, K>>)
where
    P: InputPin,
    F: SessionFactory,
    K: Clock,
{
    button.register_on_click(next_station::<F, K>);
    button.register_on_long_click(previous_station::<F, K>);
    button.register_on_double_click(show_current::<F, K>);
}

fn next_station<F: SessionFactory, K: Clock>(supervisor: &mut Supervisor<F, K>) {
    supervisor.select_and_play(Direction::Next);
}

fn previous_station<F: SessionFactory, K: Clock>(supervisor: &mut Supervisor<F, K>) {
    supervisor.select_and_play(Direction::Previous);
}

fn show_current<F: SessionFactory, K: Clock>(supervisor: &mut Supervisor<F, K>) {
    supervisor.show_current();
}
