//! Event sources for `quadpad`.
//!
//! Implementations of [`EventSource`](crate::source::EventSource) for
//! platform-specific input mechanisms, plus a deterministic virtual source.
//!
//! # Feature flags
//! - **`joydev`** — enables the Linux `/dev/input/js*` backend (default).
//!
//! Most users should not touch these modules directly; prefer
//! [`Gamepads::discover`](crate::gamepads::Gamepads::discover), which picks
//! the platform backend, or
//! [`Gamepads::with_source`](crate::gamepads::Gamepads::with_source) to
//! inject a [`VirtualSource`](virtual_input::VirtualSource).

#[cfg(all(target_os = "linux", feature = "joydev"))]
#[cfg_attr(docsrs, doc(cfg(all(target_os = "linux", feature = "joydev"))))]
pub mod joydev;

pub mod virtual_input;

#[cfg(windows)]
#[cfg_attr(docsrs, doc(cfg(windows)))]
pub mod xinput;

use crate::source::EventSource;

/// The default event source for the current platform.
#[cfg(all(target_os = "linux", feature = "joydev"))]
pub fn default_source() -> Box<dyn EventSource> {
    Box::new(joydev::JoydevSource::new())
}

/// The default event source for the current platform.
#[cfg(windows)]
pub fn default_source() -> Box<dyn EventSource> {
    Box::new(xinput::XinputSource::new())
}

/// Fallback for platforms without a built backend: an empty virtual source,
/// so discovery still works with nothing to report.
#[cfg(not(any(all(target_os = "linux", feature = "joydev"), windows)))]
pub fn default_source() -> Box<dyn EventSource> {
    Box::new(virtual_input::VirtualSource::new())
}
