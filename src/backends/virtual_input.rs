//! Deterministic in-memory event source.
//!
//! [`VirtualSource`] is the crate's fake pad bus: tests and demos inject
//! plug events and raw input, and a [`Gamepads`](crate::gamepads::Gamepads)
//! table polls them back out exactly like a platform source. Clones share
//! state, so one clone goes into the table while the caller keeps another
//! to feed:
//!
//! ```
//! use quadpad::backends::virtual_input::VirtualSource;
//! use quadpad::{Button, Gamepads, PadId, PollConfig};
//!
//! let source = VirtualSource::new();
//! let id = source.plug_in();
//! let mut pads = Gamepads::with_source(Box::new(source.clone()), PollConfig::default())?;
//!
//! source.press_button(id, 0);
//! pads.update();
//! assert!(pads.button_down(PadId::Pad0, Button::A));
//! # Ok::<(), quadpad::Error>(())
//! ```
//!
//! Virtual devices speak the standard layout: the same button and axis
//! indices as the Linux joystick backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::layout::PadLayout;
use crate::source::{DrainStatus, EventSource, PlugEvent, RawEvent, SourceId};

#[derive(Default)]
struct Inner {
    next_id: u32,
    plugs: VecDeque<PlugEvent>,
    devices: Vec<VirtualDevice>,
}

impl Inner {
    fn device_mut(&mut self, id: SourceId) -> Option<&mut VirtualDevice> {
        self.devices.iter_mut().find(|device| device.id == id)
    }
}

struct VirtualDevice {
    id: SourceId,
    alive: bool,
    queue: VecDeque<RawEvent>,
    rumble: Option<(f32, f32)>,
}

/// Shared-state fake source for tests and demos.
#[derive(Clone, Default)]
pub struct VirtualSource {
    inner: Arc<Mutex<Inner>>,
}

impl VirtualSource {
    pub fn new() -> VirtualSource {
        VirtualSource::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate plugging a pad in. The returned id accepts fed events.
    pub fn plug_in(&self) -> SourceId {
        let mut inner = self.lock();
        let id = SourceId::new(inner.next_id);
        inner.next_id += 1;
        inner.devices.push(VirtualDevice {
            id,
            alive: true,
            queue: VecDeque::new(),
            rumble: None,
        });
        inner.plugs.push_back(PlugEvent::Added(id));
        id
    }

    /// Simulate a clean unplug: a remove notification is queued.
    pub fn unplug(&self, id: SourceId) {
        let mut inner = self.lock();
        if let Some(device) = inner.device_mut(id) {
            device.alive = false;
        }
        inner.plugs.push_back(PlugEvent::Removed(id));
    }

    /// Simulate the device dying mid-read: no notification, the next drain
    /// reports it gone.
    pub fn vanish(&self, id: SourceId) {
        if let Some(device) = self.lock().device_mut(id) {
            device.alive = false;
        }
    }

    /// Inject a raw input event.
    pub fn feed(&self, id: SourceId, event: RawEvent) {
        if let Some(device) = self.lock().device_mut(id) {
            device.queue.push_back(event);
        }
    }

    pub fn press_button(&self, id: SourceId, index: u8) {
        self.feed(
            id,
            RawEvent::Button {
                index,
                pressed: true,
            },
        );
    }

    pub fn release_button(&self, id: SourceId, index: u8) {
        self.feed(
            id,
            RawEvent::Button {
                index,
                pressed: false,
            },
        );
    }

    pub fn set_axis(&self, id: SourceId, index: u8, value: i16) {
        self.feed(id, RawEvent::Axis { index, value });
    }

    /// The last rumble strengths forwarded for `id`, if any.
    pub fn last_rumble(&self, id: SourceId) -> Option<(f32, f32)> {
        self.lock().device_mut(id).and_then(|device| device.rumble)
    }
}

impl EventSource for VirtualSource {
    fn layout(&self) -> &PadLayout {
        static LAYOUT: OnceLock<PadLayout> = OnceLock::new();
        LAYOUT.get_or_init(PadLayout::standard)
    }

    fn scan(&mut self) -> Vec<SourceId> {
        // Devices plugged in before the table was built are claimed here;
        // their pending add notifications are consumed with them.
        let mut inner = self.lock();
        inner.plugs.clear();
        inner
            .devices
            .iter()
            .filter(|device| device.alive)
            .map(|device| device.id)
            .collect()
    }

    fn poll_plug(&mut self, out: &mut Vec<PlugEvent>) {
        out.extend(self.lock().plugs.drain(..));
    }

    fn drain(&mut self, id: SourceId, out: &mut Vec<RawEvent>) -> DrainStatus {
        let mut inner = self.lock();
        let Some(device) = inner.device_mut(id) else {
            return DrainStatus::Gone;
        };
        out.extend(device.queue.drain(..));
        if device.alive {
            DrainStatus::Alive
        } else {
            DrainStatus::Gone
        }
    }

    fn release(&mut self, id: SourceId) {
        self.lock().devices.retain(|device| device.id != id);
    }

    fn set_rumble(&mut self, id: SourceId, left: f32, right: f32) {
        if let Some(device) = self.lock().device_mut(id) {
            device.rumble = Some((left, right));
        }
    }
}
