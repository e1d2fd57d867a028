//! Property-based tests for volume and gain math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

use platform::audio_types::{Gain, VolumePercent};

proptest::proptest! {
    /// VolumePercent::new never panics for any u8 input (clamps to 100).
    #[test]
    fn volume_percent_new_never_panics(pct in 0u8..=255u8) {
        let v = VolumePercent::new(pct);
        assert!(v.get() <= 100);
    }

    /// Gain derived from any volume stays inside 0.0..=1.0.
    #[test]
    fn gain_from_volume_in_unit_range(pct in 0u8..=255u8) {
        let g = VolumePercent::new(pct).to_gain().get();
        assert!((0.0..=1.0).contains(&g), "gain {g} out of range for {pct}%");
    }

    /// Higher volume never produces a lower gain.
    #[test]
    fn gain_is_monotone_in_volume(a in 0u8..=100u8, b in 0u8..=100u8) {
        let ga = VolumePercent::new(a).to_gain();
        let gb = VolumePercent::new(b).to_gain();
        if a >= b {
            assert!(ga >= gb, "volume {a} → {ga:?} should be >= volume {b} → {gb:?}");
        }
    }

    /// Gain::new never escapes the unit range for any finite or infinite input.
    #[test]
    fn gain_new_always_clamped(x in proptest::num::f32::ANY) {
        let g = Gain::new(x).get();
        assert!((0.0..=1.0).contains(&g), "Gain::new({x}) produced {g}");
    }
}
