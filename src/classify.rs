//! Analog to digital classification of stick and trigger readings.

use crate::gamepad::{Buttons, Gamepad};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEFT_THUMB_DEADZONE: i16 = 7849;
pub const DEFAULT_RIGHT_THUMB_DEADZONE: i16 = 8689;
pub const DEFAULT_TRIGGER_THRESHOLD: u8 = 50;

/// Deadzones and trigger threshold used to derive digital flags.
///
/// Values are not validated. A negative deadzone makes every reading leave the
/// dead zone, and a threshold of 255 never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Deadzone for the left stick (0 to 32767)
    pub left_thumb_deadzone: i16,
    /// Deadzone for the right stick (0 to 32767)
    pub right_thumb_deadzone: i16,
    /// Threshold for both triggers (0 to 255)
    pub trigger_threshold: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            left_thumb_deadzone: DEFAULT_LEFT_THUMB_DEADZONE,
            right_thumb_deadzone: DEFAULT_RIGHT_THUMB_DEADZONE,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
        }
    }
}

/// Flags for every stick axis outside its deadzone and every trigger above
/// the threshold. Never contains native button bits.
pub fn analog_to_digital(gamepad: &Gamepad, thresholds: &Thresholds) -> Buttons {
    let left = thresholds.left_thumb_deadzone;
    let right = thresholds.right_thumb_deadzone;

    axis(gamepad.thumb_lx, left, Buttons::LEFT_STICK_RIGHT, Buttons::LEFT_STICK_LEFT)
        | axis(gamepad.thumb_ly, left, Buttons::LEFT_STICK_UP, Buttons::LEFT_STICK_DOWN)
        | axis(gamepad.thumb_rx, right, Buttons::RIGHT_STICK_RIGHT, Buttons::RIGHT_STICK_LEFT)
        | axis(gamepad.thumb_ry, right, Buttons::RIGHT_STICK_UP, Buttons::RIGHT_STICK_DOWN)
        | trigger(gamepad.left_trigger, thresholds.trigger_threshold, Buttons::LEFT_TRIGGER)
        | trigger(gamepad.right_trigger, thresholds.trigger_threshold, Buttons::RIGHT_TRIGGER)
}

/// Native buttons merged with the analog flags.
pub fn digital_state(gamepad: &Gamepad, thresholds: &Thresholds) -> Buttons {
    Buttons::from_native(gamepad.buttons) | analog_to_digital(gamepad, thresholds)
}

// Widened to i32 so that -deadzone cannot overflow for i16::MIN.
fn axis(value: i16, deadzone: i16, positive: Buttons, negative: Buttons) -> Buttons {
    let (value, deadzone) = (value as i32, deadzone as i32);
    if value > deadzone {
        positive
    } else if value < -deadzone {
        negative
    } else {
        Buttons::empty()
    }
}

fn trigger(value: u8, threshold: u8, flag: Buttons) -> Buttons {
    if value > threshold {
        flag
    } else {
        Buttons::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STICK_BITS: Buttons = Buttons::LEFT_STICK_RIGHT.union(Buttons::LEFT_STICK_LEFT);

    fn left_x(value: i16, deadzone: i16) -> Buttons {
        let thresholds = Thresholds {
            left_thumb_deadzone: deadzone,
            ..Thresholds::default()
        };
        let pad = Gamepad {
            thumb_lx: value,
            ..Gamepad::default()
        };
        analog_to_digital(&pad, &thresholds)
    }

    #[test]
    fn test_axis_against_deadzone() {
        for deadzone in [0, 1, 7849, 8689, 32766, i16::MAX] {
            for value in (i16::MIN..=i16::MAX).step_by(97).chain([i16::MAX, -deadzone, deadzone]) {
                let bits = left_x(value, deadzone) & STICK_BITS;
                let v = value as i32;
                let d = deadzone as i32;
                assert_eq!(bits.contains(Buttons::LEFT_STICK_RIGHT), v > d, "v={} d={}", v, d);
                assert_eq!(bits.contains(Buttons::LEFT_STICK_LEFT), v < -d, "v={} d={}", v, d);
                assert_ne!(bits, STICK_BITS);
            }
        }
    }

    #[test]
    fn test_deadzone_boundary_is_inside() {
        let d = DEFAULT_LEFT_THUMB_DEADZONE;
        assert_eq!(left_x(d, d), Buttons::empty());
        assert_eq!(left_x(-d, d), Buttons::empty());
        assert_eq!(left_x(d + 1, d), Buttons::LEFT_STICK_RIGHT);
        assert_eq!(left_x(-d - 1, d), Buttons::LEFT_STICK_LEFT);
    }

    #[test]
    fn test_extreme_deadzones() {
        // -i16::MIN does not fit in an i16
        assert_eq!(left_x(i16::MIN, i16::MIN), Buttons::LEFT_STICK_LEFT);
        assert_eq!(left_x(0, i16::MIN), Buttons::LEFT_STICK_RIGHT);
        assert_eq!(left_x(i16::MIN, i16::MAX), Buttons::LEFT_STICK_LEFT);
        assert_eq!(left_x(i16::MAX, i16::MAX), Buttons::empty());
    }

    #[test]
    fn test_trigger_is_strictly_greater() {
        for threshold in 0..=u8::MAX {
            for value in 0..=u8::MAX {
                let thresholds = Thresholds {
                    trigger_threshold: threshold,
                    ..Thresholds::default()
                };
                let pad = Gamepad {
                    left_trigger: value,
                    right_trigger: value,
                    ..Gamepad::default()
                };
                let bits = analog_to_digital(&pad, &thresholds);
                let expected = if value > threshold {
                    Buttons::LEFT_TRIGGER | Buttons::RIGHT_TRIGGER
                } else {
                    Buttons::empty()
                };
                assert_eq!(bits, expected);
            }
        }
    }

    #[test]
    fn test_sticks_use_their_own_deadzone() {
        let thresholds = Thresholds {
            left_thumb_deadzone: 100,
            right_thumb_deadzone: 20000,
            trigger_threshold: 50,
        };
        let pad = Gamepad {
            thumb_lx: 5000,
            thumb_rx: 5000,
            thumb_ly: -5000,
            thumb_ry: -5000,
            ..Gamepad::default()
        };
        assert_eq!(
            analog_to_digital(&pad, &thresholds),
            Buttons::LEFT_STICK_RIGHT | Buttons::LEFT_STICK_DOWN
        );
    }

    #[test]
    fn test_all_directions() {
        let up_right = Gamepad {
            thumb_lx: 30000,
            thumb_ly: 30000,
            thumb_rx: 30000,
            thumb_ry: 30000,
            ..Gamepad::default()
        };
        assert_eq!(
            analog_to_digital(&up_right, &Thresholds::default()),
            Buttons::LEFT_STICK_RIGHT
                | Buttons::LEFT_STICK_UP
                | Buttons::RIGHT_STICK_RIGHT
                | Buttons::RIGHT_STICK_UP
        );

        let down_left = Gamepad {
            thumb_lx: -30000,
            thumb_ly: -30000,
            thumb_rx: -30000,
            thumb_ry: -30000,
            ..Gamepad::default()
        };
        assert_eq!(
            analog_to_digital(&down_left, &Thresholds::default()),
            Buttons::LEFT_STICK_LEFT
                | Buttons::LEFT_STICK_DOWN
                | Buttons::RIGHT_STICK_LEFT
                | Buttons::RIGHT_STICK_DOWN
        );
    }

    #[test]
    fn test_mixed_input_scenario() {
        let pad = Gamepad {
            buttons: 0x1000,
            left_trigger: 0,
            right_trigger: 200,
            thumb_lx: 9000,
            thumb_ly: 0,
            thumb_rx: 0,
            thumb_ry: -9000,
        };
        let mask = digital_state(&pad, &Thresholds::default());
        assert_eq!(
            mask,
            Buttons::A | Buttons::LEFT_STICK_RIGHT | Buttons::RIGHT_STICK_DOWN | Buttons::RIGHT_TRIGGER
        );
        // Same input, same answer
        assert_eq!(digital_state(&pad, &Thresholds::default()), mask);
    }

    #[test]
    fn test_idle_pad_is_empty() {
        assert_eq!(digital_state(&Gamepad::default(), &Thresholds::default()), Buttons::empty());
    }

    #[test]
    fn test_native_buttons_survive() {
        let pad = Gamepad {
            buttons: 0xF3FF,
            ..Gamepad::default()
        };
        assert_eq!(digital_state(&pad, &Thresholds::default()).bits(), 0xF3FF);
    }

    #[test]
    fn test_thresholds_from_partial_json() {
        let thresholds: Thresholds = serde_json::from_str(r#"{ "trigger_threshold": 10 }"#).unwrap();
        assert_eq!(thresholds.trigger_threshold, 10);
        assert_eq!(thresholds.left_thumb_deadzone, DEFAULT_LEFT_THUMB_DEADZONE);
        assert_eq!(thresholds.right_thumb_deadzone, DEFAULT_RIGHT_THUMB_DEADZONE);
    }
}
