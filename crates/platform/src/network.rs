//! Network link abstraction (WiFi station mode).
//!
//! The radio joins a single access point at boot and never roams. The link
//! trait is deliberately small: kick off association, poll until associated,
//! then report what the link ended up with.

use core::fmt;

use heapless::String;

/// Capacity of an SSID (802.11 limit).
pub const SSID_CAPACITY: usize = 32;
/// Capacity of a WPA passphrase.
pub const PSK_CAPACITY: usize = 64;
/// Capacity of a DHCP hostname.
pub const HOSTNAME_CAPACITY: usize = 32;

/// Access point credentials.
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Credentials {
    /// Network name.
    pub ssid: String<SSID_CAPACITY>,
    /// Passphrase. Empty for open networks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub psk: String<PSK_CAPACITY>,
}

// Keep the passphrase out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("psk", &"<redacted>")
            .finish()
    }
}

/// Connection details reported once the link is up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkInfo {
    /// Network joined.
    pub ssid: String<SSID_CAPACITY>,
    /// Hostname announced over DHCP.
    pub hostname: String<HOSTNAME_CAPACITY>,
    /// IPv4 address.
    pub ip: [u8; 4],
    /// Station MAC address.
    pub mac: [u8; 6],
    /// Received signal strength in dBm.
    pub rssi: i8,
}

impl fmt::Display for LinkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.ip;
        let [m0, m1, m2, m3, m4, m5] = self.mac;
        writeln!(f, "Connection Details:")?;
        writeln!(f, "  SSID       : {}", self.ssid)?;
        writeln!(f, "  Hostname   : {}", self.hostname)?;
        writeln!(f, "  IP-Address : {a}.{b}.{c}.{d}")?;
        writeln!(
            f,
            "  MAC-Address: {m0:02X}:{m1:02X}:{m2:02X}:{m3:02X}:{m4:02X}:{m5:02X}"
        )?;
        write!(f, "  RSSI       : {} dBm", self.rssi)
    }
}

/// A station-mode network interface.
pub trait NetworkLink {
    /// Error returned when association cannot even be attempted
    /// (radio off, invalid credentials format).
    type Error: fmt::Debug + fmt::Display;

    /// Start associating with the access point. Non-blocking.
    fn begin(&mut self, credentials: &Credentials) -> Result<(), Self::Error>;

    /// Whether the link is associated and has an address.
    fn is_associated(&mut self) -> bool;

    /// Current connection details. Only meaningful once associated.
    fn info(&self) -> LinkInfo;
}
