//! Gesture classification integration tests. Drive a `PushButton` through
//! scripted pin levels and check which handlers fire.
//!
//! The pin is an `embedded-hal-mock` digital mock, so every poll must consume
//! exactly one expected read; `done()` fails the test otherwise.
//!
//! Run with: cargo test -p firmware --test integration_gestures

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use embassy_time::Instant;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use firmware::input::{ClassifierBuilder, Gesture, PushButton};
use platform::mocks::MockPin;
use platform::ActiveLevel;
use proptest::prelude::*;

/// Poll period used by every test, matching the simulator loop.
const STEP_MS: u64 = 5;

#[derive(Debug, Default, PartialEq, Eq)]
struct Counts {
    clicks: u32,
    long_clicks: u32,
    double_clicks: u32,
}

fn wire<P: embedded_hal::digital::InputPin>(button: &mut PushButton<P, Counts>) {
    button.register_on_click(|c| c.clicks += 1);
    button.register_on_long_click(|c| c.long_clicks += 1);
    button.register_on_double_click(|c| c.double_clicks += 1);
}

/// Expand `(pressed, duration_ms)` segments into one sample per poll.
fn timeline(segments: &[(bool, u64)]) -> Vec<bool> {
    segments
        .iter()
        .flat_map(|&(pressed, ms)| std::iter::repeat(pressed).take((ms / STEP_MS) as usize))
        .collect()
}

/// Replay `pressed` samples (active-low wiring) and return every gesture with
/// the poll time it was reported at.
fn replay(pressed: &[bool]) -> (Vec<(u64, Gesture)>, Counts) {
    let expectations: Vec<PinTransaction> = pressed
        .iter()
        .map(|&p| PinTransaction::get(if p { PinState::Low } else { PinState::High }))
        .collect();
    let mut pin = PinMock::new(&expectations);
    let mut button = ClassifierBuilder::new()
        .build_button::<_, Counts>(pin.clone())
        .unwrap();
    wire(&mut button);

    let mut counts = Counts::default();
    let mut gestures = Vec::new();
    for i in 0..pressed.len() as u64 {
        let t = 10_000 + i * STEP_MS;
        if let Some(g) = button.poll(Instant::from_millis(t), &mut counts) {
            gestures.push((t, g));
        }
    }
    pin.done();
    (gestures, counts)
}

// ---------------------------------------------------------------------------
// Single gestures
// ---------------------------------------------------------------------------

#[test]
fn test_short_press_is_click_after_gap() {
    let (gestures, counts) = replay(&timeline(&[(false, 20), (true, 100), (false, 400)]));
    assert_eq!(gestures.len(), 1);
    let (t, g) = gestures[0];
    assert_eq!(g, Gesture::Click);
    // Released at 10_120; the click is held back until the gap has passed.
    assert!(t > 10_120 + 250, "click reported too early at {t}");
    assert_eq!(
        counts,
        Counts {
            clicks: 1,
            ..Counts::default()
        }
    );
}

#[test]
fn test_long_press_reported_on_release() {
    let (gestures, counts) = replay(&timeline(&[(false, 20), (true, 400), (false, 50)]));
    assert_eq!(gestures, vec![(10_420, Gesture::LongClick)]);
    assert_eq!(counts.long_clicks, 1);
    assert_eq!(counts.clicks, 0);
}

#[test]
fn test_two_quick_presses_are_one_double_click() {
    let (gestures, counts) = replay(&timeline(&[
        (false, 20),
        (true, 100),
        (false, 100),
        (true, 100),
        (false, 400),
    ]));
    assert_eq!(gestures.len(), 1);
    assert_eq!(gestures[0].1, Gesture::DoubleClick);
    assert_eq!(
        counts,
        Counts {
            double_clicks: 1,
            ..Counts::default()
        }
    );
}

#[test]
fn test_third_quick_press_starts_a_new_sequence() {
    let (gestures, counts) = replay(&timeline(&[
        (false, 20),
        (true, 100),
        (false, 60),
        (true, 100),
        (false, 60),
        (true, 100),
        (false, 400),
    ]));
    // The double click is reported right after the second release; the third
    // press resolves on its own once the gap has passed.
    assert_eq!(
        gestures,
        vec![(10_285, Gesture::DoubleClick), (10_695, Gesture::Click)]
    );
    assert_eq!(counts.double_clicks, 1);
    assert_eq!(counts.clicks, 1);
}

#[test]
fn test_bounce_is_ignored() {
    let (gestures, counts) = replay(&timeline(&[(false, 20), (true, 20), (false, 400)]));
    assert!(gestures.is_empty());
    assert_eq!(counts, Counts::default());
}

#[test]
fn test_slow_second_press_gives_two_clicks() {
    let (gestures, _) = replay(&timeline(&[
        (false, 20),
        (true, 100),
        (false, 400),
        (true, 100),
        (false, 400),
    ]));
    let kinds: Vec<Gesture> = gestures.iter().map(|&(_, g)| g).collect();
    assert_eq!(kinds, vec![Gesture::Click, Gesture::Click]);
}

#[test]
fn test_pending_click_resolves_while_next_press_is_held() {
    let (gestures, _) = replay(&timeline(&[
        (false, 20),
        (true, 100),
        (false, 50),
        (true, 500),
        (false, 400),
    ]));
    // The gap runs out during the long hold, so the first press is reported
    // as a click before the long click.
    assert_eq!(gestures, vec![(10_375, Gesture::Click), (10_670, Gesture::LongClick)]);
}

#[test]
fn test_long_press_discards_pending_click() {
    // A gap longer than the long-click threshold leaves the first click
    // pending when the long press ends.
    let pin = MockPin::new();
    let mut button: PushButton<_, Counts> = ClassifierBuilder::new()
        .long_click_ms(200)
        .double_click_gap_ms(1_000)
        .build_button(pin.clone())
        .unwrap();
    wire(&mut button);
    let mut counts = Counts::default();

    button.poll(Instant::from_millis(0), &mut counts);
    pin.press();
    button.poll(Instant::from_millis(10), &mut counts);
    pin.release();
    button.poll(Instant::from_millis(110), &mut counts);
    assert_eq!(button.classifier().pending_clicks(), 1);

    pin.press();
    button.poll(Instant::from_millis(150), &mut counts);
    pin.release();
    assert_eq!(
        button.poll(Instant::from_millis(450), &mut counts),
        Some(Gesture::LongClick)
    );
    assert_eq!(button.classifier().pending_clicks(), 0);
    assert_eq!(button.poll(Instant::from_millis(2_000), &mut counts), None);
    assert_eq!(counts.clicks, 0);
}

// ---------------------------------------------------------------------------
// Wiring and pin faults
// ---------------------------------------------------------------------------

#[test]
fn test_active_high_wiring() {
    let expectations: Vec<PinTransaction> = timeline(&[(false, 20), (true, 400), (false, 10)])
        .into_iter()
        .map(|p| PinTransaction::get(if p { PinState::High } else { PinState::Low }))
        .collect();
    let mut pin = PinMock::new(&expectations);
    let mut button = ClassifierBuilder::new()
        .active_level(ActiveLevel::High)
        .build_button::<_, Counts>(pin.clone())
        .unwrap();
    wire(&mut button);

    let mut counts = Counts::default();
    for i in 0..expectations.len() as u64 {
        button.poll(Instant::from_millis(i * STEP_MS), &mut counts);
    }
    pin.done();
    assert_eq!(counts.long_clicks, 1);
}

#[test]
fn test_read_errors_are_skipped() {
    let pin = MockPin::new();
    let mut button = ClassifierBuilder::new()
        .build_button::<_, Counts>(pin.clone())
        .unwrap();
    wire(&mut button);
    let mut counts = Counts::default();

    button.poll(Instant::from_millis(0), &mut counts);
    pin.press();
    button.poll(Instant::from_millis(10), &mut counts);
    // The release sample is lost; the classifier still believes the button
    // is held and picks up the release on the next good read.
    pin.release();
    pin.fail_next_reads(3);
    for t in [410, 415, 420] {
        assert_eq!(button.poll(Instant::from_millis(t), &mut counts), None);
    }
    assert_eq!(
        button.poll(Instant::from_millis(425), &mut counts),
        Some(Gesture::LongClick)
    );
}

#[test]
fn test_unregistered_gesture_still_returned() {
    let pin = MockPin::new();
    let mut button: PushButton<_, Counts> = ClassifierBuilder::new().build_button(pin.clone()).unwrap();
    let mut counts = Counts::default();
    button.poll(Instant::from_millis(0), &mut counts);
    pin.press();
    button.poll(Instant::from_millis(5), &mut counts);
    pin.release();
    assert_eq!(
        button.poll(Instant::from_millis(505), &mut counts),
        Some(Gesture::LongClick)
    );
    assert_eq!(counts, Counts::default());
}

// ---------------------------------------------------------------------------
// Property: press duration decides the gesture
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_press_duration_classification(held_ms in 0u64..1_000) {
        let pin = MockPin::new();
        let mut button: PushButton<_, Counts> =
            ClassifierBuilder::new().build_button(pin.clone()).unwrap();
        wire(&mut button);
        let mut counts = Counts::default();

        button.poll(Instant::from_millis(0), &mut counts);
        pin.press();
        button.poll(Instant::from_millis(100), &mut counts);
        pin.release();
        let released = 100 + held_ms;
        let on_release = button.poll(Instant::from_millis(released), &mut counts);
        let later = button.poll(Instant::from_millis(released + 1_000), &mut counts);

        if held_ms < 50 {
            prop_assert_eq!(on_release, None);
            prop_assert_eq!(later, None);
        } else if held_ms <= 300 {
            prop_assert_eq!(on_release, None);
            prop_assert_eq!(later, Some(Gesture::Click));
        } else {
            prop_assert_eq!(on_release, Some(Gesture::LongClick));
            prop_assert_eq!(later, None);
        }
    }
}
