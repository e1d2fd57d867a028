//! Station catalog and stream playback supervision with retry and failover
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod supervisor;

pub use catalog::{CatalogError, Direction, Station, StationCatalog, CATALOG_CAPACITY};
pub use supervisor::{PlaybackSupervisor, RetryPolicy, SupervisorState, TickOutcome};
