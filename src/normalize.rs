//! Stick and trigger normalization.
//!
//! Pure transforms run once per connected pad per cycle, after event folding.
//! Deterministic given the raw inputs; no hidden state.

use crate::pad::{StickState, TriggerState};

/// Maximum raw deflection of a stick axis.
pub const STICK_MAX: f32 = 32767.0;
/// Maximum raw trigger value after folding.
pub const TRIGGER_MAX: u8 = 255;

/// Default left-stick deadzone, in raw units.
pub const DEADZONE_LEFT_STICK: f32 = 7849.0;
/// Default right-stick deadzone. Larger than the left: right sticks ship
/// with more built-in play.
pub const DEADZONE_RIGHT_STICK: f32 = 8689.0;
/// Default trigger deadzone, in raw (byte) units.
pub const DEADZONE_TRIGGER: u8 = 30;

/// Derive `nx`/`ny`, `magnitude` and `angle` from the folded raw sample.
///
/// Inside the deadzone everything is hard-zeroed, the raw sample included;
/// there is no falloff. Outside it, `nx`/`ny` are the unit direction,
/// `magnitude` rescales the usable range linearly onto `[0, 1]`, and `angle`
/// is `atan2(y, x)` in `(-π, π]`.
pub fn normalize_stick(state: &mut StickState, deadzone: f32) {
    let x = state.x as f32;
    let y = state.y as f32;
    let len = (x * x + y * y).sqrt();

    if len <= deadzone {
        *state = StickState::default();
        return;
    }

    // Unit components come from the unclamped length, so they stay unit
    // even for corner samples whose magnitude exceeds a single axis's max.
    state.nx = x / len;
    state.ny = y / len;
    state.magnitude = (len.min(STICK_MAX) - deadzone) / (STICK_MAX - deadzone);
    state.angle = y.atan2(x);
}

/// Derive `intensity` from the folded raw trigger value.
///
/// At or below the deadzone the raw value is clamped to zero as well, so
/// raw queries agree with the derived intensity.
pub fn normalize_trigger(state: &mut TriggerState, deadzone: u8) {
    if state.value <= deadzone {
        *state = TriggerState::default();
        return;
    }
    state.intensity = f32::from(state.value - deadzone) / f32::from(TRIGGER_MAX - deadzone);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick(x: i32, y: i32, deadzone: f32) -> StickState {
        let mut s = StickState {
            x,
            y,
            ..StickState::default()
        };
        normalize_stick(&mut s, deadzone);
        s
    }

    #[test]
    fn inside_deadzone_is_hard_zero() {
        for (x, y) in [(0, 0), (100, -200), (5000, 5000), (-7848, 0)] {
            let s = stick(x, y, DEADZONE_LEFT_STICK);
            assert_eq!(s, StickState::default(), "({x},{y}) should zero out");
        }
        // Exactly at the deadzone still counts as centered.
        let s = stick(7849, 0, DEADZONE_LEFT_STICK);
        assert_eq!(s, StickState::default());
    }

    #[test]
    fn components_are_unit_outside_deadzone() {
        for (x, y) in [(10000, 0), (9000, -9000), (-20000, 15000), (32767, 32767)] {
            let s = stick(x, y, DEADZONE_LEFT_STICK);
            let norm = s.nx * s.nx + s.ny * s.ny;
            assert!((norm - 1.0).abs() < 1e-5, "({x},{y}) norm = {norm}");
        }
    }

    #[test]
    fn magnitude_is_monotone_with_exact_endpoints() {
        let dz = DEADZONE_LEFT_STICK;
        let mut last = 0.0f32;
        for raw in [7850, 10000, 16000, 24000, 32000, 32767] {
            let s = stick(raw, 0, dz);
            assert!(s.magnitude >= last, "magnitude dipped at {raw}");
            last = s.magnitude;
        }
        assert!((stick(32767, 0, dz).magnitude - 1.0).abs() < 1e-6);
        // Saturates past the per-axis max instead of overshooting.
        assert!((stick(32767, 32767, dz).magnitude - 1.0).abs() < 1e-6);
    }

    #[test]
    fn documented_scenario_holds() {
        // x=10000, y=0, left-stick deadzone: magnitude rescales to ~0.0863.
        let s = stick(10000, 0, DEADZONE_LEFT_STICK);
        assert!((s.nx - 1.0).abs() < 1e-6);
        assert_eq!(s.ny, 0.0);
        assert_eq!(s.angle, 0.0);
        let expected = (10000.0 - 7849.0) / (32767.0 - 7849.0);
        assert!((s.magnitude - expected).abs() < 1e-6);
        assert!((s.magnitude - 0.0863).abs() < 5e-4);
    }

    #[test]
    fn angle_covers_all_quadrants() {
        use std::f32::consts::{FRAC_PI_2, PI};
        let dz = 0.0;
        assert!((stick(20000, 0, dz).angle - 0.0).abs() < 1e-6);
        assert!((stick(0, 20000, dz).angle - FRAC_PI_2).abs() < 1e-6);
        assert!((stick(-20000, 0, dz).angle - PI).abs() < 1e-6);
        assert!((stick(0, -20000, dz).angle + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn trigger_deadzone_clamps_raw_value() {
        let mut t = TriggerState {
            value: DEADZONE_TRIGGER,
            intensity: 0.5,
        };
        normalize_trigger(&mut t, DEADZONE_TRIGGER);
        assert_eq!(t, TriggerState::default());
    }

    #[test]
    fn trigger_rescales_linearly() {
        let mut t = TriggerState {
            value: 255,
            intensity: 0.0,
        };
        normalize_trigger(&mut t, DEADZONE_TRIGGER);
        assert!((t.intensity - 1.0).abs() < 1e-6);

        let mut t = TriggerState {
            value: 31,
            intensity: 0.0,
        };
        normalize_trigger(&mut t, DEADZONE_TRIGGER);
        assert!((t.intensity - 1.0 / 225.0).abs() < 1e-6);
    }
}
