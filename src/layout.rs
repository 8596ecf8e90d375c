//! Per-source index tables.
//!
//! Every event source declares a [`PadLayout`]: fixed lookup tables mapping
//! its platform-local button and axis indices onto the crate's semantic
//! button bits and axis roles. Folding is entirely table-driven, so the
//! update pipeline never branches on the platform.
//!
//! Layouts are validated when a table is built over a source
//! ([`Gamepads::with_source`](crate::gamepads::Gamepads::with_source));
//! a malformed table is a construction error, not a runtime surprise.

use thiserror::Error;

use crate::pad::{Button, Stick, Trigger};

/// Size of the button index table. Indices at or past this are unmapped.
pub const MAX_BUTTONS: usize = 16;
/// Size of the axis index table.
pub const MAX_AXES: usize = 8;

/// Which component of a stick an axis index feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickAxis {
    X,
    Y,
}

/// Raw value contract for a trigger axis, declared per source.
///
/// A source picks exactly one contract per trigger and never mixes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerRange {
    /// The source reports `-32768..=32767`; the fold rescales into `0..=255`.
    Full,
    /// The source already reports `0..=255`.
    Byte,
}

/// What a platform axis index means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisRole {
    Stick {
        stick: Stick,
        axis: StickAxis,
        invert: bool,
    },
    Trigger {
        trigger: Trigger,
        range: TriggerRange,
    },
    /// An opposing d-pad pair reported as one axis: the negative extreme
    /// presses `negative`, the positive extreme presses `positive`.
    Dpad { negative: Button, positive: Button },
}

/// Ways a layout can be malformed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("button {0:?} is bound to more than one index")]
    DuplicateButton(Button),
    #[error("{stick:?} stick {axis:?} axis is bound to more than one index")]
    DuplicateStickAxis { stick: Stick, axis: StickAxis },
    #[error("trigger {0:?} is bound to more than one index")]
    DuplicateTrigger(Trigger),
    #[error("{negative:?}/{positive:?} is not an opposing d-pad pair")]
    BadDpadPair { negative: Button, positive: Button },
}

/// Fixed per-source lookup tables.
///
/// `None` entries are deliberate holes: events for those indices fold to
/// no-ops (e.g. a guide button the crate does not model).
#[derive(Clone, Debug)]
pub struct PadLayout {
    pub buttons: [Option<Button>; MAX_BUTTONS],
    pub axes: [Option<AxisRole>; MAX_AXES],
}

impl PadLayout {
    /// The canonical Linux-joystick table, also used by the virtual source.
    ///
    /// Button indices follow the kernel's Xbox-style ordering; index 8 (the
    /// guide button) is intentionally unmapped. Stick Y axes are inverted
    /// because the kernel reports "up" as negative. Triggers arrive as
    /// full-range axes.
    pub fn standard() -> PadLayout {
        let mut buttons = [None; MAX_BUTTONS];
        buttons[0] = Some(Button::A);
        buttons[1] = Some(Button::B);
        buttons[2] = Some(Button::X);
        buttons[3] = Some(Button::Y);
        buttons[4] = Some(Button::LeftShoulder);
        buttons[5] = Some(Button::RightShoulder);
        buttons[6] = Some(Button::Back);
        buttons[7] = Some(Button::Start);
        buttons[9] = Some(Button::LeftThumb);
        buttons[10] = Some(Button::RightThumb);

        let mut axes = [None; MAX_AXES];
        axes[0] = Some(AxisRole::Stick {
            stick: Stick::Left,
            axis: StickAxis::X,
            invert: false,
        });
        axes[1] = Some(AxisRole::Stick {
            stick: Stick::Left,
            axis: StickAxis::Y,
            invert: true,
        });
        axes[2] = Some(AxisRole::Trigger {
            trigger: Trigger::Left,
            range: TriggerRange::Full,
        });
        axes[3] = Some(AxisRole::Stick {
            stick: Stick::Right,
            axis: StickAxis::X,
            invert: false,
        });
        axes[4] = Some(AxisRole::Stick {
            stick: Stick::Right,
            axis: StickAxis::Y,
            invert: true,
        });
        axes[5] = Some(AxisRole::Trigger {
            trigger: Trigger::Right,
            range: TriggerRange::Full,
        });
        axes[6] = Some(AxisRole::Dpad {
            negative: Button::DpadLeft,
            positive: Button::DpadRight,
        });
        axes[7] = Some(AxisRole::Dpad {
            negative: Button::DpadUp,
            positive: Button::DpadDown,
        });

        PadLayout { buttons, axes }
    }

    #[inline]
    pub fn button(&self, index: u8) -> Option<Button> {
        self.buttons.get(usize::from(index)).copied().flatten()
    }

    #[inline]
    pub fn axis(&self, index: u8) -> Option<AxisRole> {
        self.axes.get(usize::from(index)).copied().flatten()
    }

    /// Check the tables for double bindings and malformed d-pad pairs.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen_buttons: u16 = 0;
        let mut claim = |button: Button| {
            if seen_buttons & button.bit() != 0 {
                return Err(LayoutError::DuplicateButton(button));
            }
            seen_buttons |= button.bit();
            Ok(())
        };

        for button in self.buttons.iter().flatten() {
            claim(*button)?;
        }

        let mut seen_stick = [[false; 2]; 2];
        let mut seen_trigger = [false; 2];
        for role in self.axes.iter().flatten() {
            match *role {
                AxisRole::Stick { stick, axis, .. } => {
                    let slot = &mut seen_stick[stick.index()][axis as usize];
                    if *slot {
                        return Err(LayoutError::DuplicateStickAxis { stick, axis });
                    }
                    *slot = true;
                }
                AxisRole::Trigger { trigger, .. } => {
                    let slot = &mut seen_trigger[trigger.index()];
                    if *slot {
                        return Err(LayoutError::DuplicateTrigger(trigger));
                    }
                    *slot = true;
                }
                AxisRole::Dpad { negative, positive } => {
                    let opposing = matches!(
                        (negative, positive),
                        (Button::DpadLeft, Button::DpadRight)
                            | (Button::DpadRight, Button::DpadLeft)
                            | (Button::DpadUp, Button::DpadDown)
                            | (Button::DpadDown, Button::DpadUp)
                    );
                    if !opposing {
                        return Err(LayoutError::BadDpadPair { negative, positive });
                    }
                    claim(negative)?;
                    claim(positive)?;
                }
            }
        }
        Ok(())
    }
}
