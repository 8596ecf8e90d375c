//! Deadzone configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::normalize::{DEADZONE_LEFT_STICK, DEADZONE_RIGHT_STICK, DEADZONE_TRIGGER};

/// Deadzone tuning applied by the update cycle.
///
/// The two sticks get independent deadzones since physical sticks differ in
/// built-in play. Defaults match the conventional XInput values.
///
/// All fields are optional in a config file; omitted ones keep their
/// defaults:
///
/// ```toml
/// left_stick_deadzone = 6500.0
/// trigger_deadzone = 24
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub left_stick_deadzone: f32,
    pub right_stick_deadzone: f32,
    pub trigger_deadzone: u8,
}

impl Default for PollConfig {
    fn default() -> PollConfig {
        PollConfig {
            left_stick_deadzone: DEADZONE_LEFT_STICK,
            right_stick_deadzone: DEADZONE_RIGHT_STICK,
            trigger_deadzone: DEADZONE_TRIGGER,
        }
    }
}

impl PollConfig {
    pub fn from_toml_str(text: &str) -> Result<PollConfig, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<PollConfig, Error> {
        PollConfig::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_deadzones() {
        let config = PollConfig::default();
        assert_eq!(config.left_stick_deadzone, 7849.0);
        assert_eq!(config.right_stick_deadzone, 8689.0);
        assert_eq!(config.trigger_deadzone, 30);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = PollConfig::from_toml_str("trigger_deadzone = 10\n").unwrap();
        assert_eq!(config.trigger_deadzone, 10);
        assert_eq!(config.left_stick_deadzone, DEADZONE_LEFT_STICK);
    }

    #[test]
    fn garbage_is_a_config_error() {
        assert!(matches!(
            PollConfig::from_toml_str("left_stick_deadzone = \"nope\""),
            Err(Error::Config(_))
        ));
    }
}
