//! The four-slot device table and its update cycle.
//!
//! [`Gamepads`] owns exactly four pad slots and one boxed
//! [`EventSource`](crate::source::EventSource). Once per frame the caller
//! runs [`update`](Gamepads::update), which drains hot-plug notifications,
//! folds every pending raw event and normalizes sticks and triggers; all
//! queries then read the finished double-buffered state.
//!
//! The table assumes single-threaded ownership by its caller and performs
//! no locking. `update` always runs to completion and never blocks.

use std::f32::consts::FRAC_PI_4;

use tracing::{debug, info};

use crate::config::PollConfig;
use crate::error::Error;
use crate::normalize::{normalize_stick, normalize_trigger};
use crate::pad::{Button, PadId, PadSlot, Stick, StickDir, Trigger, PAD_COUNT};
use crate::source::{DrainStatus, EventSource, PlugEvent, RawEvent, SourceId};

/// The pad table: four slots, one source, one deadzone config.
///
/// Dropping the table releases every held platform handle.
pub struct Gamepads {
    slots: [PadSlot; PAD_COUNT],
    source: Box<dyn EventSource>,
    config: PollConfig,
    plug_buf: Vec<PlugEvent>,
    event_buf: Vec<RawEvent>,
}

impl Gamepads {
    /// Open the default platform source with default deadzones and claim
    /// whatever is already plugged in.
    pub fn discover() -> Result<Gamepads, Error> {
        Gamepads::discover_with(PollConfig::default())
    }

    /// Like [`discover`](Gamepads::discover) with explicit deadzones.
    pub fn discover_with(config: PollConfig) -> Result<Gamepads, Error> {
        Gamepads::with_source(crate::backends::default_source(), config)
    }

    /// Build a table over any event source (e.g. a
    /// [`VirtualSource`](crate::backends::virtual_input::VirtualSource) in
    /// tests). The source's layout is validated here; a malformed table is
    /// a construction error.
    ///
    /// Devices reported by the initial scan fill slots in enumeration
    /// order, first free slot first; anything past the fourth is dropped.
    pub fn with_source(source: Box<dyn EventSource>, config: PollConfig) -> Result<Gamepads, Error> {
        source.layout().validate()?;
        let mut pads = Gamepads {
            slots: Default::default(),
            source,
            config,
            plug_buf: Vec::new(),
            event_buf: Vec::new(),
        };
        for id in pads.source.scan() {
            pads.attach(id);
        }
        Ok(pads)
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Advance every slot by one cycle.
    ///
    /// Must be called at least once per logical frame before querying.
    /// Order matters: button generations age first, so edges derived this
    /// cycle compare against the state the caller saw last cycle.
    pub fn update(&mut self) {
        for slot in &mut self.slots {
            slot.buttons_prev = slot.buttons;
        }

        // Hot-plug before draining, so a pad added this cycle gets its
        // first fold below (sources replay initial state on open).
        let mut plugs = std::mem::take(&mut self.plug_buf);
        self.source.poll_plug(&mut plugs);
        for plug in plugs.drain(..) {
            match plug {
                PlugEvent::Added(id) => self.attach(id),
                PlugEvent::Removed(id) => self.detach(id),
            }
        }
        self.plug_buf = plugs;

        let mut events = std::mem::take(&mut self.event_buf);
        for index in 0..PAD_COUNT {
            let Some(id) = self.slots[index].source else {
                continue;
            };
            events.clear();
            let status = self.source.drain(id, &mut events);
            {
                let layout = self.source.layout();
                for event in events.drain(..) {
                    self.slots[index].fold(layout, event);
                }
            }
            if status == DrainStatus::Gone {
                debug!(slot = index, "pad vanished mid-read");
                self.source.release(id);
                self.slots[index].reset();
                continue;
            }

            let slot = &mut self.slots[index];
            normalize_stick(
                &mut slot.sticks[Stick::Left.index()],
                self.config.left_stick_deadzone,
            );
            normalize_stick(
                &mut slot.sticks[Stick::Right.index()],
                self.config.right_stick_deadzone,
            );
            normalize_trigger(
                &mut slot.triggers[Trigger::Left.index()],
                self.config.trigger_deadzone,
            );
            normalize_trigger(
                &mut slot.triggers[Trigger::Right.index()],
                self.config.trigger_deadzone,
            );
        }
        self.event_buf = events;
    }

    fn attach(&mut self, id: SourceId) {
        let Some(free) = self.slots.iter().position(|slot| !slot.connected()) else {
            // Table full: no queueing, no error. Hand the device straight
            // back to the source so its handle does not leak.
            debug!(id = id.raw(), "pad table full, dropping device");
            self.source.release(id);
            return;
        };
        self.slots[free].attach(id);
        info!(slot = free, id = id.raw(), "pad connected");
    }

    fn detach(&mut self, id: SourceId) {
        let Some(index) = self.slots.iter().position(|slot| slot.source == Some(id)) else {
            return;
        };
        self.source.release(id);
        self.slots[index].reset();
        info!(slot = index, "pad disconnected");
    }

    /// Connected-slot access; disconnected slots answer every query with
    /// false/zero, a normal path for callers sweeping all four slots.
    fn slot(&self, pad: PadId) -> Option<&PadSlot> {
        let slot = &self.slots[pad.index()];
        slot.connected().then_some(slot)
    }

    pub fn is_connected(&self, pad: PadId) -> bool {
        self.slots[pad.index()].connected()
    }

    pub fn button_down(&self, pad: PadId, button: Button) -> bool {
        self.slot(pad)
            .is_some_and(|slot| slot.buttons & button.bit() != 0)
    }

    /// True for exactly the one cycle in which the button went down.
    pub fn button_triggered(&self, pad: PadId, button: Button) -> bool {
        self.slot(pad).is_some_and(|slot| {
            slot.buttons_prev & button.bit() == 0 && slot.buttons & button.bit() != 0
        })
    }

    /// True for exactly the one cycle in which the button came up.
    pub fn button_released(&self, pad: PadId, button: Button) -> bool {
        self.slot(pad).is_some_and(|slot| {
            slot.buttons & button.bit() == 0 && slot.buttons_prev & button.bit() != 0
        })
    }

    /// Deadzone-adjusted trigger intensity in `[0, 1]`.
    pub fn trigger_value(&self, pad: PadId, trigger: Trigger) -> f32 {
        self.slot(pad)
            .map_or(0.0, |slot| slot.triggers[trigger.index()].intensity)
    }

    /// Raw trigger byte, clamped to zero inside the deadzone.
    pub fn trigger_raw(&self, pad: PadId, trigger: Trigger) -> u8 {
        self.slot(pad)
            .map_or(0, |slot| slot.triggers[trigger.index()].value)
    }

    /// Raw stick sample, zeroed inside the deadzone.
    pub fn stick_xy(&self, pad: PadId, stick: Stick) -> (i32, i32) {
        self.slot(pad).map_or((0, 0), |slot| {
            let s = &slot.sticks[stick.index()];
            (s.x, s.y)
        })
    }

    /// Unit direction components, zero inside the deadzone.
    pub fn stick_norm_xy(&self, pad: PadId, stick: Stick) -> (f32, f32) {
        self.slot(pad).map_or((0.0, 0.0), |slot| {
            let s = &slot.sticks[stick.index()];
            (s.nx, s.ny)
        })
    }

    /// Deadzone-rescaled deflection in `[0, 1]`.
    pub fn stick_magnitude(&self, pad: PadId, stick: Stick) -> f32 {
        self.slot(pad)
            .map_or(0.0, |slot| slot.sticks[stick.index()].magnitude)
    }

    /// Stick angle in radians, `(-π, π]`; zero inside the deadzone.
    pub fn stick_angle(&self, pad: PadId, stick: Stick) -> f32 {
        self.slot(pad)
            .map_or(0.0, |slot| slot.sticks[stick.index()].angle)
    }

    /// Whether the stick points into the given cardinal band.
    ///
    /// False at rest: no direction is defined at magnitude zero. The four
    /// bands are half-open quarter circles centered on the cardinals, so
    /// every deflected angle lands in exactly one of them.
    pub fn stick_dir(&self, pad: PadId, stick: Stick, dir: StickDir) -> bool {
        let Some(slot) = self.slot(pad) else {
            return false;
        };
        let state = &slot.sticks[stick.index()];
        if state.magnitude == 0.0 {
            return false;
        }
        let angle = state.angle;
        match dir {
            StickDir::Right => angle >= -FRAC_PI_4 && angle < FRAC_PI_4,
            StickDir::Up => angle >= FRAC_PI_4 && angle < 3.0 * FRAC_PI_4,
            StickDir::Left => angle >= 3.0 * FRAC_PI_4 || angle < -3.0 * FRAC_PI_4,
            StickDir::Down => angle >= -3.0 * FRAC_PI_4 && angle < -FRAC_PI_4,
        }
    }

    /// Best-effort rumble. Strengths are clamped to `[0, 1]`; disconnected
    /// pads and sources without force feedback ignore the call.
    pub fn set_rumble(&mut self, pad: PadId, left: f32, right: f32) {
        let Some(id) = self.slots[pad.index()].source else {
            return;
        };
        self.source
            .set_rumble(id, left.clamp(0.0, 1.0), right.clamp(0.0, 1.0));
    }
}

impl Drop for Gamepads {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            if let Some(id) = slot.source.take() {
                self.source.release(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualSource;

    fn table(source: &VirtualSource) -> Gamepads {
        Gamepads::with_source(Box::new(source.clone()), PollConfig::default())
            .expect("standard layout is valid")
    }

    #[test]
    fn direction_bands_partition_the_circle() {
        use std::f32::consts::PI;

        let source = VirtualSource::new();
        source.plug_in();
        let mut pads = table(&source);
        pads.update();

        // Sweep angles directly through the slot; the bands must cover
        // every deflected angle exactly once.
        let dirs = [StickDir::Up, StickDir::Down, StickDir::Left, StickDir::Right];
        let steps = 720;
        for i in 0..steps {
            let angle = -PI + (2.0 * PI) * (i as f32 + 0.5) / steps as f32;
            let state = &mut pads.slots[0].sticks[Stick::Left.index()];
            state.angle = angle;
            state.magnitude = 0.5;
            let hits = dirs
                .iter()
                .filter(|&&dir| pads.stick_dir(PadId::Pad0, Stick::Left, dir))
                .count();
            assert_eq!(hits, 1, "angle {angle} hit {hits} bands");
        }

        // Boundary ties go to the lower band.
        let state = &mut pads.slots[0].sticks[Stick::Left.index()];
        state.angle = FRAC_PI_4;
        state.magnitude = 0.5;
        assert!(pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Up));
        assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Right));
    }

    #[test]
    fn at_rest_no_direction_is_defined() {
        let source = VirtualSource::new();
        source.plug_in();
        let mut pads = table(&source);
        pads.update();
        for dir in [StickDir::Up, StickDir::Down, StickDir::Left, StickDir::Right] {
            assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, dir));
        }
    }

    #[test]
    fn disconnected_pads_answer_defaults() {
        let source = VirtualSource::new();
        let pads = table(&source);
        for pad in PadId::ALL {
            assert!(!pads.is_connected(pad));
            assert!(!pads.button_down(pad, Button::A));
            assert!(!pads.button_triggered(pad, Button::A));
            assert!(!pads.button_released(pad, Button::A));
            assert_eq!(pads.trigger_value(pad, Trigger::Left), 0.0);
            assert_eq!(pads.trigger_raw(pad, Trigger::Right), 0);
            assert_eq!(pads.stick_xy(pad, Stick::Left), (0, 0));
            assert_eq!(pads.stick_norm_xy(pad, Stick::Right), (0.0, 0.0));
            assert_eq!(pads.stick_magnitude(pad, Stick::Left), 0.0);
            assert_eq!(pads.stick_angle(pad, Stick::Left), 0.0);
            assert!(!pads.stick_dir(pad, Stick::Left, StickDir::Up));
        }
    }

    #[test]
    fn rumble_is_clamped_and_forwarded() {
        let source = VirtualSource::new();
        let id = source.plug_in();
        let mut pads = table(&source);
        pads.update();

        pads.set_rumble(PadId::Pad0, 1.5, -0.25);
        assert_eq!(source.last_rumble(id), Some((1.0, 0.0)));

        // Disconnected pads swallow the call.
        pads.set_rumble(PadId::Pad3, 1.0, 1.0);
    }
}
