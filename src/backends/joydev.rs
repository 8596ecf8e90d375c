//! Linux joystick backend (`/dev/input/js*`).
//!
//! Reads the kernel joystick interface with non-blocking descriptors: the
//! four fixed nodes `js0..js3` are probed once at scan, and a non-blocking
//! inotify watch on `/dev/input` serves as the hot-plug monitor channel.
//! A node that fails to open stays unconnected — the failure is absorbed,
//! and a later inotify event for the same node arrives as a normal add.
//!
//! On open the kernel replays the device's current state as synthetic init
//! events, so a freshly added pad reads correctly by the end of its first
//! update cycle.
//!
//! The js interface has no force-feedback path; rumble is accepted and
//! ignored.

#![cfg(all(target_os = "linux", feature = "joydev"))]

use std::ffi::CStr;
use std::io;
use std::mem;

use tracing::{debug, trace, warn};

use crate::layout::PadLayout;
use crate::pad::PAD_COUNT;
use crate::source::{DrainStatus, EventSource, PlugEvent, RawEvent, SourceId};

/// Kernel `struct js_event`.
#[repr(C)]
#[derive(Clone, Copy, Default)]
struct JsEvent {
    time: u32,
    value: i16,
    kind: u8,
    number: u8,
}

const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
/// Set on the synthetic events replaying current state after open.
const JS_EVENT_INIT: u8 = 0x80;

struct JoyDevice {
    id: SourceId,
    fd: libc::c_int,
    /// Kernel node index (the N of `jsN`); device identity for hot-plug.
    node: u32,
}

/// `/dev/input/js*` event source.
pub struct JoydevSource {
    layout: PadLayout,
    devices: Vec<JoyDevice>,
    /// Non-blocking inotify fd watching `/dev/input`; `None` when inotify
    /// is unavailable (hot-plug detection disabled, polling still works).
    monitor: Option<libc::c_int>,
    next_id: u32,
}

impl JoydevSource {
    pub fn new() -> JoydevSource {
        let monitor = init_monitor();
        if monitor.is_none() {
            warn!("inotify unavailable, joystick hot-plug detection disabled");
        }
        JoydevSource {
            layout: PadLayout::standard(),
            devices: Vec::new(),
            monitor,
            next_id: 0,
        }
    }

    fn mint(&mut self) -> SourceId {
        let id = SourceId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn open_node(&mut self, node: u32) -> Option<SourceId> {
        if self.devices.iter().any(|device| device.node == node) {
            return None;
        }
        let path = format!("/dev/input/js{node}\0");
        let fd = unsafe {
            // SAFETY: `path` is NUL-terminated and outlives the call.
            libc::open(
                path.as_ptr().cast::<libc::c_char>(),
                libc::O_RDONLY | libc::O_NONBLOCK | libc::O_CLOEXEC,
            )
        };
        if fd < 0 {
            trace!(node, "joystick node not openable");
            return None;
        }
        debug!(node, "joystick opened");
        let id = self.mint();
        self.devices.push(JoyDevice { id, fd, node });
        Some(id)
    }
}

impl Default for JoydevSource {
    fn default() -> JoydevSource {
        JoydevSource::new()
    }
}

impl EventSource for JoydevSource {
    fn layout(&self) -> &PadLayout {
        &self.layout
    }

    fn scan(&mut self) -> Vec<SourceId> {
        (0..PAD_COUNT as u32)
            .filter_map(|node| self.open_node(node))
            .collect()
    }

    fn poll_plug(&mut self, out: &mut Vec<PlugEvent>) {
        let Some(monitor) = self.monitor else {
            return;
        };
        // u64 storage keeps the record headers aligned; the kernel pads
        // each record so successive headers stay aligned too.
        let mut buf = [0u64; 128];
        let len = mem::size_of_val(&buf);
        loop {
            let n = unsafe {
                // SAFETY: buf is writable for its full length; the fd is
                // non-blocking, so this returns immediately.
                libc::read(monitor, buf.as_mut_ptr().cast::<libc::c_void>(), len)
            };
            if n <= 0 {
                return;
            }
            let base = buf.as_ptr().cast::<u8>();
            let mut offset = 0usize;
            while offset + mem::size_of::<libc::inotify_event>() <= n as usize {
                // SAFETY: the kernel packs whole inotify_event records into
                // the buffer; offset always lands on a record boundary.
                let event = unsafe { &*(base.add(offset).cast::<libc::inotify_event>()) };
                let name_at = offset + mem::size_of::<libc::inotify_event>();
                let next = name_at + event.len as usize;
                if event.len > 0 && next <= n as usize {
                    // SAFETY: `len` bytes of NUL-padded name follow the header.
                    let name = unsafe { CStr::from_ptr(base.add(name_at).cast()) };
                    if let Some(node) = joystick_node(name) {
                        // IN_ATTRIB matters for adds: the node often exists
                        // before udev grants read permission.
                        if event.mask & (libc::IN_CREATE | libc::IN_ATTRIB | libc::IN_MOVED_TO) != 0
                        {
                            if let Some(id) = self.open_node(node) {
                                out.push(PlugEvent::Added(id));
                            }
                        } else if event.mask & (libc::IN_DELETE | libc::IN_MOVED_FROM) != 0 {
                            if let Some(device) =
                                self.devices.iter().find(|device| device.node == node)
                            {
                                out.push(PlugEvent::Removed(device.id));
                            }
                        }
                    }
                }
                offset = next;
            }
        }
    }

    fn drain(&mut self, id: SourceId, out: &mut Vec<RawEvent>) -> DrainStatus {
        let Some(device) = self.devices.iter().find(|device| device.id == id) else {
            return DrainStatus::Gone;
        };
        let mut event = JsEvent::default();
        loop {
            let n = unsafe {
                // SAFETY: `event` is a plain repr(C) struct read whole.
                libc::read(
                    device.fd,
                    (&mut event as *mut JsEvent).cast::<libc::c_void>(),
                    mem::size_of::<JsEvent>(),
                )
            };
            if n == mem::size_of::<JsEvent>() as isize {
                match event.kind & !JS_EVENT_INIT {
                    JS_EVENT_BUTTON => out.push(RawEvent::Button {
                        index: event.number,
                        pressed: event.value != 0,
                    }),
                    JS_EVENT_AXIS => out.push(RawEvent::Axis {
                        index: event.number,
                        value: event.value,
                    }),
                    _ => {}
                }
            } else if n < 0 {
                let err = io::Error::last_os_error();
                return if err.raw_os_error() == Some(libc::EAGAIN) {
                    DrainStatus::Alive
                } else {
                    debug!(node = device.node, error = %err, "joystick read failed");
                    DrainStatus::Gone
                };
            } else {
                // EOF or a short read: the device went away.
                return DrainStatus::Gone;
            }
        }
    }

    fn release(&mut self, id: SourceId) {
        if let Some(pos) = self.devices.iter().position(|device| device.id == id) {
            let device = self.devices.remove(pos);
            // SAFETY: the fd is owned by the removed entry and closed once.
            unsafe { libc::close(device.fd) };
            debug!(node = device.node, "joystick closed");
        }
    }
}

impl Drop for JoydevSource {
    fn drop(&mut self) {
        for device in self.devices.drain(..) {
            // SAFETY: each fd is owned by its entry and closed exactly once.
            unsafe { libc::close(device.fd) };
        }
        if let Some(monitor) = self.monitor.take() {
            // SAFETY: the monitor fd is owned by this source.
            unsafe { libc::close(monitor) };
        }
    }
}

fn init_monitor() -> Option<libc::c_int> {
    // SAFETY: plain syscalls; the watch path literal is NUL-terminated.
    unsafe {
        let fd = libc::inotify_init1(libc::IN_NONBLOCK | libc::IN_CLOEXEC);
        if fd < 0 {
            return None;
        }
        let wd = libc::inotify_add_watch(
            fd,
            b"/dev/input\0".as_ptr().cast::<libc::c_char>(),
            libc::IN_CREATE | libc::IN_ATTRIB | libc::IN_DELETE | libc::IN_MOVED_TO
                | libc::IN_MOVED_FROM,
        );
        if wd < 0 {
            libc::close(fd);
            return None;
        }
        Some(fd)
    }
}

/// Parse a `/dev/input` entry name, accepting only the joystick class.
fn joystick_node(name: &CStr) -> Option<u32> {
    let name = name.to_str().ok()?;
    name.strip_prefix("js")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn joystick_class_filter() {
        let parse = |s: &str| joystick_node(&CString::new(s).unwrap());
        assert_eq!(parse("js0"), Some(0));
        assert_eq!(parse("js17"), Some(17));
        assert_eq!(parse("event3"), None);
        assert_eq!(parse("mouse0"), None);
        assert_eq!(parse("jsx"), None);
    }
}
