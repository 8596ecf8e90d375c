//! Pad identifiers and per-slot state.
//!
//! ## Value conventions
//! - **Button bits:** every semantic button maps to the same bit on every
//!   platform, so a bitmask captured on one source compares equal to one
//!   captured on another. Bits 10 and 11 are reserved.
//! - **Sticks:** raw samples span `[-32767, 32767]` per axis; after folding,
//!   increasing `y` always means the stick is pushed away from the player,
//!   regardless of what the source reports.
//! - **Triggers:** raw values span `0..=255` after folding; sources that
//!   report full-range axes are rescaled by the fold (see
//!   [`TriggerRange`](crate::layout::TriggerRange)).

use serde::{Deserialize, Serialize};

use crate::layout::{AxisRole, PadLayout, StickAxis, TriggerRange};
use crate::source::{RawEvent, SourceId};

/// Number of pad slots. Slot ids are [`PadId`] values and never exceed this.
pub const PAD_COUNT: usize = 4;

/// One of the four supported pad slots.
///
/// Queries take a `PadId`, so an out-of-range device id is unrepresentable.
/// The fallible entry point for loop counters is [`PadId::from_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadId {
    Pad0,
    Pad1,
    Pad2,
    Pad3,
}

impl PadId {
    pub const ALL: [PadId; PAD_COUNT] = [PadId::Pad0, PadId::Pad1, PadId::Pad2, PadId::Pad3];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<PadId> {
        PadId::ALL.get(index).copied()
    }
}

/// Semantic pad buttons.
///
/// Discriminants are the stable bitmask values shared across platforms; they
/// double as the `u16` bits stored in each slot's button generations.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    DpadUp = 1 << 0,
    DpadDown = 1 << 1,
    DpadLeft = 1 << 2,
    DpadRight = 1 << 3,
    Start = 1 << 4,
    Back = 1 << 5,
    LeftThumb = 1 << 6,
    RightThumb = 1 << 7,
    LeftShoulder = 1 << 8,
    RightShoulder = 1 << 9,
    A = 1 << 12,
    B = 1 << 13,
    X = 1 << 14,
    Y = 1 << 15,
}

impl Button {
    pub const ALL: [Button; 14] = [
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::Start,
        Button::Back,
        Button::LeftThumb,
        Button::RightThumb,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    /// The button's bit in a slot's button mask.
    #[inline]
    pub fn bit(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::DpadUp => "dpad-up",
            Button::DpadDown => "dpad-down",
            Button::DpadLeft => "dpad-left",
            Button::DpadRight => "dpad-right",
            Button::Start => "start",
            Button::Back => "back",
            Button::LeftThumb => "left-thumb",
            Button::RightThumb => "right-thumb",
            Button::LeftShoulder => "left-shoulder",
            Button::RightShoulder => "right-shoulder",
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
        }
    }
}

/// Analog stick selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Analog trigger selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Left,
    Right,
}

impl Trigger {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Cardinal stick direction, tested against the normalized angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickDir {
    Up,
    Down,
    Left,
    Right,
}

/// Raw and derived state of one analog stick.
///
/// `x`/`y` hold the folded raw samples (`i32`: inverting a full-deflection
/// `i16` sample must not wrap). The derived fields are valid after the
/// normalizer ran; inside the deadzone everything is hard-zeroed, angle
/// included.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StickState {
    pub x: i32,
    pub y: i32,
    pub nx: f32,
    pub ny: f32,
    pub magnitude: f32,
    pub angle: f32,
}

/// Raw and derived state of one analog trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriggerState {
    pub value: u8,
    pub intensity: f32,
}

/// One entry of the fixed four-slot table.
///
/// A slot is connected iff it holds a source handle. `buttons_prev` is only
/// written at the top of an update cycle, as a copy of the previous cycle's
/// `buttons`; edge queries compare the two generations.
#[derive(Debug, Default)]
pub(crate) struct PadSlot {
    pub(crate) source: Option<SourceId>,
    pub(crate) buttons: u16,
    pub(crate) buttons_prev: u16,
    pub(crate) sticks: [StickState; 2],
    pub(crate) triggers: [TriggerState; 2],
}

impl PadSlot {
    #[inline]
    pub(crate) fn connected(&self) -> bool {
        self.source.is_some()
    }

    /// Claim the slot for a newly attached device, zeroing all state.
    pub(crate) fn attach(&mut self, id: SourceId) {
        *self = PadSlot {
            source: Some(id),
            ..PadSlot::default()
        };
    }

    /// Return the slot to the unconnected, zeroed state.
    pub(crate) fn reset(&mut self) {
        *self = PadSlot::default();
    }

    /// Fold one raw event into the slot through the source's index tables.
    ///
    /// Unmapped indices are no-ops. Button folding is idempotent: a press
    /// sets the bit, a release clears it, so replaying an event cannot
    /// toggle state.
    pub(crate) fn fold(&mut self, layout: &PadLayout, event: RawEvent) {
        match event {
            RawEvent::Button { index, pressed } => {
                let Some(button) = layout.button(index) else {
                    return;
                };
                if pressed {
                    self.buttons |= button.bit();
                } else {
                    self.buttons &= !button.bit();
                }
            }
            RawEvent::Axis { index, value } => match layout.axis(index) {
                Some(AxisRole::Stick {
                    stick,
                    axis,
                    invert,
                }) => {
                    let v = if invert {
                        -i32::from(value)
                    } else {
                        i32::from(value)
                    };
                    let state = &mut self.sticks[stick.index()];
                    match axis {
                        StickAxis::X => state.x = v,
                        StickAxis::Y => state.y = v,
                    }
                }
                Some(AxisRole::Trigger { trigger, range }) => {
                    self.triggers[trigger.index()].value = match range {
                        TriggerRange::Full => ((i32::from(value) + 32768) >> 8) as u8,
                        TriggerRange::Byte => value.clamp(0, 255) as u8,
                    };
                }
                Some(AxisRole::Dpad { negative, positive }) => {
                    // Only the axis extremes count as presses; anything
                    // interior clears the pair. The pair stays exclusive.
                    if value <= -32767 {
                        self.buttons |= negative.bit();
                        self.buttons &= !positive.bit();
                    } else if value >= 32767 {
                        self.buttons |= positive.bit();
                        self.buttons &= !negative.bit();
                    } else {
                        self.buttons &= !(negative.bit() | positive.bit());
                    }
                }
                None => {}
            },
        }
    }
}
