//! The raw event source seam.
//!
//! One [`EventSource`] implementation exists per platform; the device table,
//! normalizer and query surface never vary by platform. Sources deliver
//! small device-local deltas ([`RawEvent`]) plus connect/disconnect
//! notifications ([`PlugEvent`]), all through zero-timeout non-blocking
//! calls — the update cycle must never stall a frame.
//!
//! ## Value conventions
//! - `RawEvent::Button` carries the source-local button index; the source's
//!   [`PadLayout`] says which semantic button (if any) it maps to.
//! - `RawEvent::Axis` carries a source-local axis index and a raw `i16`
//!   sample. Whether a trigger axis spans the full `i16` range or only
//!   `0..=255` is declared by the layout, never guessed.

use crate::layout::PadLayout;

/// Opaque token for one attached device, minted by its source.
///
/// A slot owns the token for its connected lifetime; after a disconnect the
/// token is dead and must not be reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u32);

impl SourceId {
    pub const fn new(raw: u32) -> SourceId {
        SourceId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Per-device input change (delta).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawEvent {
    /// A platform button changed state.
    Button { index: u8, pressed: bool },
    /// A continuous channel moved.
    Axis { index: u8, value: i16 },
}

/// Hot-plug notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlugEvent {
    Added(SourceId),
    Removed(SourceId),
}

/// Outcome of draining one device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainStatus {
    Alive,
    /// The device vanished mid-read (unplugged between hot-plug polls).
    Gone,
}

/// A platform-specific raw event source.
///
/// Implementations absorb their own failures: a device that cannot be
/// opened simply never appears, and an empty read is "nothing this cycle",
/// not an error. Nothing here blocks.
pub trait EventSource {
    /// The index tables for devices of this source.
    fn layout(&self) -> &PadLayout;

    /// Devices already present when the table is built, in enumeration
    /// order. Called once.
    fn scan(&mut self) -> Vec<SourceId>;

    /// Drain pending hot-plug notifications. Called once per update cycle.
    fn poll_plug(&mut self, out: &mut Vec<PlugEvent>);

    /// Drain every pending event for `id`, in arrival order.
    fn drain(&mut self, id: SourceId, out: &mut Vec<RawEvent>) -> DrainStatus;

    /// Release the platform handle behind `id`. After this the token is dead.
    fn release(&mut self, id: SourceId);

    /// Best-effort force feedback; sources without support ignore the call.
    fn set_rumble(&mut self, id: SourceId, left: f32, right: f32) {
        let _ = (id, left, right);
    }
}
