//! End-to-end update-cycle tests over a virtual source.
//!
//! These drive a [`Gamepads`] table exactly like a game loop would: feed
//! raw events, call `update`, assert on the query surface.

use quadpad::backends::virtual_input::VirtualSource;
use quadpad::{Button, Gamepads, PadId, PollConfig, Stick, StickDir, Trigger};

fn table(source: &VirtualSource) -> Gamepads {
    Gamepads::with_source(Box::new(source.clone()), PollConfig::default())
        .expect("standard layout is valid")
}

#[test]
fn triggered_fires_for_exactly_one_cycle() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    // Button index 0 is A in the standard layout.
    source.press_button(id, 0);
    pads.update();
    assert!(pads.button_down(PadId::Pad0, Button::A));
    assert!(pads.button_triggered(PadId::Pad0, Button::A));
    assert!(!pads.button_released(PadId::Pad0, Button::A));

    // No further events: still down, but the edge is consumed.
    pads.update();
    assert!(pads.button_down(PadId::Pad0, Button::A));
    assert!(!pads.button_triggered(PadId::Pad0, Button::A));

    source.release_button(id, 0);
    pads.update();
    assert!(!pads.button_down(PadId::Pad0, Button::A));
    assert!(pads.button_released(PadId::Pad0, Button::A));

    pads.update();
    assert!(!pads.button_released(PadId::Pad0, Button::A));
}

#[test]
fn duplicate_press_events_do_not_toggle() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    source.press_button(id, 0);
    source.press_button(id, 0);
    pads.update();
    assert!(pads.button_down(PadId::Pad0, Button::A));

    // A duplicated release must clear, not re-press.
    source.release_button(id, 0);
    source.release_button(id, 0);
    pads.update();
    assert!(!pads.button_down(PadId::Pad0, Button::A));
}

#[test]
fn press_and_release_within_one_cycle_leaves_button_up() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    source.press_button(id, 1);
    source.release_button(id, 1);
    pads.update();
    // Later events for the same control win within a cycle.
    assert!(!pads.button_down(PadId::Pad0, Button::B));
}

#[test]
fn fifth_device_is_dropped_silently() {
    let source = VirtualSource::new();
    let mut pads = table(&source);

    let ids: Vec<_> = (0..5).map(|_| source.plug_in()).collect();
    pads.update();

    let connected = PadId::ALL
        .iter()
        .filter(|&&pad| pads.is_connected(pad))
        .count();
    assert_eq!(connected, 4);

    // The dropped device's input must go nowhere.
    source.press_button(ids[4], 0);
    pads.update();
    for pad in PadId::ALL {
        assert!(!pads.button_down(pad, Button::A));
    }

    // Unplugging one frees a slot for the next arrival.
    source.unplug(ids[1]);
    pads.update();
    assert!(!pads.is_connected(PadId::Pad1));

    let late = source.plug_in();
    pads.update();
    assert!(pads.is_connected(PadId::Pad1));

    source.press_button(late, 0);
    pads.update();
    assert!(pads.button_down(PadId::Pad1, Button::A));
}

#[test]
fn unplug_resets_the_slot_to_defaults() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    source.press_button(id, 0);
    source.set_axis(id, 0, 20000);
    pads.update();
    assert!(pads.button_down(PadId::Pad0, Button::A));
    assert!(pads.stick_magnitude(PadId::Pad0, Stick::Left) > 0.0);

    source.unplug(id);
    pads.update();
    assert!(!pads.is_connected(PadId::Pad0));
    assert!(!pads.button_down(PadId::Pad0, Button::A));
    assert!(!pads.button_released(PadId::Pad0, Button::A));
    assert_eq!(pads.stick_xy(PadId::Pad0, Stick::Left), (0, 0));
    assert_eq!(pads.trigger_value(PadId::Pad0, Trigger::Left), 0.0);
}

#[test]
fn vanished_device_is_detected_on_drain() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);
    pads.update();
    assert!(pads.is_connected(PadId::Pad0));

    // No remove notification; the device just stops answering.
    source.vanish(id);
    pads.update();
    assert!(!pads.is_connected(PadId::Pad0));
}

#[test]
fn documented_normalization_scenario() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    source.set_axis(id, 0, 10000);
    pads.update();

    let (nx, ny) = pads.stick_norm_xy(PadId::Pad0, Stick::Left);
    assert!((nx - 1.0).abs() < 1e-6);
    assert_eq!(ny, 0.0);
    assert_eq!(pads.stick_angle(PadId::Pad0, Stick::Left), 0.0);
    let magnitude = pads.stick_magnitude(PadId::Pad0, Stick::Left);
    assert!((magnitude - 0.0863).abs() < 5e-4);

    assert!(pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Right));
    assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Up));
    assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Down));
    assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Left));
}

#[test]
fn centered_stick_has_no_direction() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    // Inside the deadzone counts as centered.
    source.set_axis(id, 0, 3000);
    source.set_axis(id, 1, -3000);
    pads.update();

    assert_eq!(pads.stick_xy(PadId::Pad0, Stick::Left), (0, 0));
    assert_eq!(pads.stick_norm_xy(PadId::Pad0, Stick::Left), (0.0, 0.0));
    assert_eq!(pads.stick_magnitude(PadId::Pad0, Stick::Left), 0.0);
    assert_eq!(pads.stick_angle(PadId::Pad0, Stick::Left), 0.0);
    for dir in [StickDir::Up, StickDir::Down, StickDir::Left, StickDir::Right] {
        assert!(!pads.stick_dir(PadId::Pad0, Stick::Left, dir));
    }
}

#[test]
fn stick_up_means_away_from_the_player() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    // The standard layout inverts Y: the kernel reports "up" as negative.
    source.set_axis(id, 1, -30000);
    pads.update();

    assert!(pads.stick_dir(PadId::Pad0, Stick::Left, StickDir::Up));
    let (_, ny) = pads.stick_norm_xy(PadId::Pad0, Stick::Left);
    assert!(ny > 0.99);
}

#[test]
fn right_stick_uses_its_own_deadzone() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    // Between the two defaults: alive on the left stick, dead on the right.
    source.set_axis(id, 0, 8000);
    source.set_axis(id, 3, 8000);
    pads.update();

    assert!(pads.stick_magnitude(PadId::Pad0, Stick::Left) > 0.0);
    assert_eq!(pads.stick_magnitude(PadId::Pad0, Stick::Right), 0.0);
}

#[test]
fn dpad_axis_maps_extremes_exclusively() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    source.set_axis(id, 6, -32767);
    source.set_axis(id, 7, -32767);
    pads.update();
    assert!(pads.button_down(PadId::Pad0, Button::DpadLeft));
    assert!(pads.button_down(PadId::Pad0, Button::DpadUp));
    assert!(!pads.button_down(PadId::Pad0, Button::DpadRight));
    assert!(!pads.button_down(PadId::Pad0, Button::DpadDown));

    // Flipping an axis swaps its pair and fires both edges.
    source.set_axis(id, 6, 32767);
    pads.update();
    assert!(pads.button_released(PadId::Pad0, Button::DpadLeft));
    assert!(pads.button_triggered(PadId::Pad0, Button::DpadRight));

    // Returning to center releases the pair.
    source.set_axis(id, 6, 0);
    source.set_axis(id, 7, 0);
    pads.update();
    for button in [
        Button::DpadLeft,
        Button::DpadRight,
        Button::DpadUp,
        Button::DpadDown,
    ] {
        assert!(!pads.button_down(PadId::Pad0, button));
    }
}

#[test]
fn full_range_triggers_rescale_through_the_deadzone() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let mut pads = table(&source);

    // Full deflection: byte 255, intensity 1.
    source.set_axis(id, 2, i16::MAX);
    pads.update();
    assert_eq!(pads.trigger_raw(PadId::Pad0, Trigger::Left), 255);
    assert!((pads.trigger_value(PadId::Pad0, Trigger::Left) - 1.0).abs() < 1e-6);

    // Rest position folds to byte 0.
    source.set_axis(id, 2, i16::MIN);
    pads.update();
    assert_eq!(pads.trigger_raw(PadId::Pad0, Trigger::Left), 0);
    assert_eq!(pads.trigger_value(PadId::Pad0, Trigger::Left), 0.0);

    // A sample folding to exactly the deadzone byte clamps to zero.
    source.set_axis(id, 2, (30i32 * 256 - 32768) as i16);
    pads.update();
    assert_eq!(pads.trigger_raw(PadId::Pad0, Trigger::Left), 0);
    assert_eq!(pads.trigger_value(PadId::Pad0, Trigger::Left), 0.0);
}

#[test]
fn custom_deadzones_apply() {
    let source = VirtualSource::new();
    let id = source.plug_in();
    let config = PollConfig {
        left_stick_deadzone: 0.0,
        trigger_deadzone: 0,
        ..PollConfig::default()
    };
    let mut pads = Gamepads::with_source(Box::new(source.clone()), config)
        .expect("standard layout is valid");

    source.set_axis(id, 0, 100);
    pads.update();
    assert!(pads.stick_magnitude(PadId::Pad0, Stick::Left) > 0.0);
}
