//! Type system enforcement tests for audio domain newtypes.
//! A percentage can never reach the decoder's gain input without conversion.

#![allow(clippy::float_cmp)]

// ── VolumePercent ────────────────────────────────────────────────────────────

#[test]
fn volume_percent_new_clamps_over_100() {
    use platform::audio_types::VolumePercent;
    let v = VolumePercent::new(150);
    assert_eq!(v.get(), 100, "VolumePercent::new(150) should clamp to 100");
}

#[test]
fn volume_percent_new_allows_0() {
    use platform::audio_types::VolumePercent;
    let v = VolumePercent::new(0);
    assert_eq!(v.get(), 0);
}

#[test]
fn volume_percent_try_new_rejects_over_100() {
    use platform::audio_types::{OutOfRangeError, VolumePercent};
    assert_eq!(
        VolumePercent::try_new(101),
        Err(OutOfRangeError {
            value: 101,
            min: 0,
            max: 100
        })
    );
    assert!(VolumePercent::try_new(255).is_err());
}

#[test]
fn volume_percent_try_new_accepts_valid_range() {
    use platform::audio_types::VolumePercent;
    assert!(VolumePercent::try_new(0).is_ok());
    assert!(VolumePercent::try_new(50).is_ok());
    assert!(VolumePercent::try_new(100).is_ok());
}

#[test]
fn volume_percent_defaults_to_full_volume() {
    use platform::audio_types::VolumePercent;
    assert_eq!(VolumePercent::default(), VolumePercent::MAX);
}

#[test]
fn volume_percent_is_one_byte() {
    use platform::audio_types::VolumePercent;
    assert_eq!(core::mem::size_of::<VolumePercent>(), 1);
}

// ── Gain ─────────────────────────────────────────────────────────────────────

#[test]
fn gain_from_full_volume_is_unity() {
    use platform::audio_types::{Gain, VolumePercent};
    assert_eq!(Gain::from(VolumePercent::MAX), Gain::UNITY);
}

#[test]
fn gain_from_half_volume_is_half() {
    use platform::audio_types::VolumePercent;
    assert_eq!(VolumePercent::new(50).to_gain().get(), 0.5);
}

#[test]
fn gain_new_clamps_out_of_range() {
    use platform::audio_types::Gain;
    assert_eq!(Gain::new(1.7), Gain::UNITY);
    assert_eq!(Gain::new(-0.3), Gain::MUTE);
}

#[test]
fn gain_new_maps_nan_to_mute() {
    use platform::audio_types::Gain;
    assert_eq!(Gain::new(f32::NAN), Gain::MUTE);
}

#[test]
fn out_of_range_error_display() {
    use platform::audio_types::OutOfRangeError;
    let err = OutOfRangeError {
        value: 120,
        min: 0,
        max: 100,
    };
    assert_eq!(err.to_string(), "value 120 outside allowed range 0..=100");
}
