//! Console polling demo: one status line per connected pad, plus button
//! edge events as they happen. Run with a pad plugged in and mash away.

use std::time::Duration;

use quadpad::{Button, Gamepads, PadId, Stick, Trigger};

fn main() -> Result<(), quadpad::Error> {
    tracing_subscriber::fmt().init();

    let mut pads = Gamepads::discover()?;
    loop {
        pads.update();

        for pad in PadId::ALL {
            if !pads.is_connected(pad) {
                continue;
            }

            for button in Button::ALL {
                if pads.button_triggered(pad, button) {
                    println!("{:?}: {} pressed", pad, button.name());
                }
                if pads.button_released(pad, button) {
                    println!("{:?}: {} released", pad, button.name());
                }
            }

            let (lx, ly) = pads.stick_norm_xy(pad, Stick::Left);
            let (rx, ry) = pads.stick_norm_xy(pad, Stick::Right);
            let moving = pads.stick_magnitude(pad, Stick::Left) > 0.0
                || pads.stick_magnitude(pad, Stick::Right) > 0.0
                || pads.trigger_value(pad, Trigger::Left) > 0.0
                || pads.trigger_value(pad, Trigger::Right) > 0.0;
            if moving {
                println!(
                    "{:?}: L({lx:+.3},{ly:+.3} @{:+.3} *{:.3}) R({rx:+.3},{ry:+.3} @{:+.3} *{:.3}) LT:{:.3} RT:{:.3}",
                    pad,
                    pads.stick_angle(pad, Stick::Left),
                    pads.stick_magnitude(pad, Stick::Left),
                    pads.stick_angle(pad, Stick::Right),
                    pads.stick_magnitude(pad, Stick::Right),
                    pads.trigger_value(pad, Trigger::Left),
                    pads.trigger_value(pad, Trigger::Right),
                );
            }
        }

        // Keep CPU usage sane in the demo loop.
        std::thread::sleep(Duration::from_millis(16));
    }
}
