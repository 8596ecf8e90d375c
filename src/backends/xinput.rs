//! Windows XInput backend.
//!
//! XInput is slot-based: user indices 0..3 map one-to-one onto the crate's
//! four pad slots, and presence is polled rather than monitored — each
//! cycle `XInputGetState` answers for every slot, and success/failure
//! transitions become add/remove plug events.
//!
//! The API hands back a consolidated snapshot instead of an event stream,
//! so `drain` diffs the previous snapshot against the current one and
//! synthesizes deltas: one button event per flipped `wButtons` bit, one
//! axis event per moved stick or trigger. The `wButtons` bit positions are
//! exactly the crate's stable button bitmask, which makes this backend's
//! button table the identity on those bits.
//!
//! ## Raw value contract
//! - Stick axes: full-range `i16`, up already positive (no inversion).
//! - Triggers: byte-range `0..=255` ([`TriggerRange::Byte`]).

#![cfg(windows)]

use windows_sys::Win32::UI::Input::XboxController::{
    XInputGetState, XInputSetState, XINPUT_GAMEPAD, XINPUT_STATE, XINPUT_VIBRATION,
};

use crate::layout::{AxisRole, PadLayout, StickAxis, TriggerRange, MAX_AXES, MAX_BUTTONS};
use crate::pad::{Button, Stick, Trigger, PAD_COUNT};
use crate::source::{DrainStatus, EventSource, PlugEvent, RawEvent, SourceId};

const AXIS_LX: u8 = 0;
const AXIS_LY: u8 = 1;
const AXIS_RX: u8 = 2;
const AXIS_RY: u8 = 3;
const AXIS_LT: u8 = 4;
const AXIS_RT: u8 = 5;

/// What one slot last reported, reduced to the fields the crate folds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Snapshot {
    buttons: u16,
    thumb_lx: i16,
    thumb_ly: i16,
    thumb_rx: i16,
    thumb_ry: i16,
    left_trigger: u8,
    right_trigger: u8,
}

impl Snapshot {
    fn from_gamepad(gamepad: &XINPUT_GAMEPAD) -> Snapshot {
        Snapshot {
            buttons: gamepad.wButtons,
            thumb_lx: gamepad.sThumbLX,
            thumb_ly: gamepad.sThumbLY,
            thumb_rx: gamepad.sThumbRX,
            thumb_ry: gamepad.sThumbRY,
            left_trigger: gamepad.bLeftTrigger,
            right_trigger: gamepad.bRightTrigger,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct XinputSlot {
    connected: bool,
    /// Fetched by the presence poll this cycle.
    current: Snapshot,
    /// What `drain` last reported; the diff base.
    reported: Snapshot,
}

/// XInput event source (user slots 0..3).
pub struct XinputSource {
    layout: PadLayout,
    slots: [XinputSlot; PAD_COUNT],
}

impl XinputSource {
    pub fn new() -> XinputSource {
        XinputSource {
            layout: xinput_layout(),
            slots: [XinputSlot::default(); PAD_COUNT],
        }
    }

    /// Refresh presence and snapshots for every slot, reporting transitions.
    fn refresh(&mut self, out: &mut Vec<PlugEvent>) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            // SAFETY: XINPUT_STATE is plain data the call fully overwrites
            // on success.
            let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
            let present = unsafe { XInputGetState(index as u32, &mut state) } == 0;
            if present {
                slot.current = Snapshot::from_gamepad(&state.Gamepad);
                if !slot.connected {
                    slot.connected = true;
                    slot.reported = Snapshot::default();
                    out.push(PlugEvent::Added(SourceId::new(index as u32)));
                }
            } else if slot.connected {
                slot.connected = false;
                out.push(PlugEvent::Removed(SourceId::new(index as u32)));
            }
        }
    }

    fn slot_mut(&mut self, id: SourceId) -> Option<&mut XinputSlot> {
        self.slots.get_mut(id.raw() as usize)
    }
}

impl Default for XinputSource {
    fn default() -> XinputSource {
        XinputSource::new()
    }
}

impl EventSource for XinputSource {
    fn layout(&self) -> &PadLayout {
        &self.layout
    }

    fn scan(&mut self) -> Vec<SourceId> {
        let mut plugs = Vec::new();
        self.refresh(&mut plugs);
        plugs
            .into_iter()
            .filter_map(|plug| match plug {
                PlugEvent::Added(id) => Some(id),
                PlugEvent::Removed(_) => None,
            })
            .collect()
    }

    fn poll_plug(&mut self, out: &mut Vec<PlugEvent>) {
        self.refresh(out);
    }

    fn drain(&mut self, id: SourceId, out: &mut Vec<RawEvent>) -> DrainStatus {
        let Some(slot) = self.slot_mut(id) else {
            return DrainStatus::Gone;
        };
        if !slot.connected {
            return DrainStatus::Gone;
        }
        let last = slot.reported;
        let current = slot.current;

        let changed = last.buttons ^ current.buttons;
        for bit in 0..MAX_BUTTONS as u8 {
            if changed & (1u16 << bit) != 0 {
                out.push(RawEvent::Button {
                    index: bit,
                    pressed: current.buttons & (1u16 << bit) != 0,
                });
            }
        }

        let axes = [
            (AXIS_LX, last.thumb_lx, current.thumb_lx),
            (AXIS_LY, last.thumb_ly, current.thumb_ly),
            (AXIS_RX, last.thumb_rx, current.thumb_rx),
            (AXIS_RY, last.thumb_ry, current.thumb_ry),
            (
                AXIS_LT,
                i16::from(last.left_trigger),
                i16::from(current.left_trigger),
            ),
            (
                AXIS_RT,
                i16::from(last.right_trigger),
                i16::from(current.right_trigger),
            ),
        ];
        for (index, was, now) in axes {
            if was != now {
                out.push(RawEvent::Axis { index, value: now });
            }
        }

        slot.reported = current;
        DrainStatus::Alive
    }

    fn release(&mut self, _id: SourceId) {
        // Nothing to close: XInput slots are not owned handles. Presence
        // polling keeps running and will re-add the slot if it comes back.
    }

    fn set_rumble(&mut self, id: SourceId, left: f32, right: f32) {
        if self.slot_mut(id).map(|slot| slot.connected) != Some(true) {
            return;
        }
        let mut vibration = XINPUT_VIBRATION {
            wLeftMotorSpeed: (left * 65535.0) as u16,
            wRightMotorSpeed: (right * 65535.0) as u16,
        };
        // Best-effort: a failure here means the pad just left.
        // SAFETY: `vibration` is plain data owned by this frame.
        unsafe { XInputSetState(id.raw(), &mut vibration) };
    }
}

/// The `wButtons` bit positions double as the crate's button bits, so the
/// button table maps each bit index to the button with that bit. Sticks
/// are full-range with up already positive; triggers are bytes.
fn xinput_layout() -> PadLayout {
    let mut buttons = [None; MAX_BUTTONS];
    for button in Button::ALL {
        buttons[button.bit().trailing_zeros() as usize] = Some(button);
    }

    let mut axes = [None; MAX_AXES];
    axes[AXIS_LX as usize] = Some(AxisRole::Stick {
        stick: Stick::Left,
        axis: StickAxis::X,
        invert: false,
    });
    axes[AXIS_LY as usize] = Some(AxisRole::Stick {
        stick: Stick::Left,
        axis: StickAxis::Y,
        invert: false,
    });
    axes[AXIS_RX as usize] = Some(AxisRole::Stick {
        stick: Stick::Right,
        axis: StickAxis::X,
        invert: false,
    });
    axes[AXIS_RY as usize] = Some(AxisRole::Stick {
        stick: Stick::Right,
        axis: StickAxis::Y,
        invert: false,
    });
    axes[AXIS_LT as usize] = Some(AxisRole::Trigger {
        trigger: Trigger::Left,
        range: TriggerRange::Byte,
    });
    axes[AXIS_RT as usize] = Some(AxisRole::Trigger {
        trigger: Trigger::Right,
        range: TriggerRange::Byte,
    });

    PadLayout { buttons, axes }
}
