//! Application constants
//!
//! Branding and banner strings used by the boot report and the simulator.
//! Everything else tunable lives in the firmware crate's `RadioConfig`.

/// The application name
pub const APP_NAME: &str = "Pushbutton Radio";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Banner printed first at boot
pub const fn boot_banner() -> &'static str {
    "Pushbutton Radio - booting"
}

/// Development mode banner
pub const fn dev_banner() -> &'static str {
    "Pushbutton Radio - Simulator"
}
