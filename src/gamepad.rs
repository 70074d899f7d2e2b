use bitflags::bitflags;

/// Number of controller slots the driver exposes. Valid indices are 0-3.
pub const CONTROLLER_MAX: u32 = 4;

/// Iterate over the valid controller slots.
pub fn controllers() -> impl Iterator<Item = u32> {
    0..CONTROLLER_MAX
}

// Layouts below are read and written by the native driver; field order and
// widths must not change.

/// Full controller state as filled in by the driver.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// Incremented by the driver on every change of the controller state
    pub packet_number: u32,
    pub gamepad: Gamepad,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gamepad {
    /// Native digital buttons, see the low 16 bits of [`Buttons`]
    pub buttons: u16,
    /// 0 to 255
    pub left_trigger: u8,
    /// 0 to 255
    pub right_trigger: u8,
    /// -32768 to 32767
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// Motor speeds sent to the controller
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vibration {
    /// Low-frequency motor
    pub left_motor_speed: u16,
    /// High-frequency motor
    pub right_motor_speed: u16,
}

impl Vibration {
    pub fn new(left_motor_speed: u16, right_motor_speed: u16) -> Self {
        Self {
            left_motor_speed,
            right_motor_speed,
        }
    }

    pub fn off() -> Self {
        Self::default()
    }

    /// Build from motor strengths in the 0.0 to 1.0 range
    pub fn from_strength(large_motor: f32, small_motor: f32) -> Self {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
        Self::new(scale(large_motor), scale(small_motor))
    }
}

bitflags! {
    /// Digital buttons plus the digital flags derived from analog input.
    ///
    /// The low 16 bits mirror [`Gamepad::buttons`]; the rest are set by
    /// [`crate::classify::analog_to_digital`].
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const DPAD_UP        = 0x0001;
        const DPAD_DOWN      = 0x0002;
        const DPAD_LEFT      = 0x0004;
        const DPAD_RIGHT     = 0x0008;
        const START          = 0x0010;
        const BACK           = 0x0020;
        const LEFT_THUMB     = 0x0040;
        const RIGHT_THUMB    = 0x0080;
        const LEFT_SHOULDER  = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const A              = 0x1000;
        const B              = 0x2000;
        const X              = 0x4000;
        const Y              = 0x8000;

        const RIGHT_STICK_UP    = 0x0001_0000;
        const RIGHT_STICK_DOWN  = 0x0002_0000;
        const RIGHT_STICK_LEFT  = 0x0004_0000;
        const RIGHT_STICK_RIGHT = 0x0008_0000;

        const LEFT_STICK_UP     = 0x0010_0000;
        const LEFT_STICK_DOWN   = 0x0020_0000;
        const LEFT_STICK_LEFT   = 0x0040_0000;
        const LEFT_STICK_RIGHT  = 0x0080_0000;

        const LEFT_TRIGGER      = 0x0100_0000;
        const RIGHT_TRIGGER     = 0x0200_0000;
    }
}

impl Buttons {
    /// Mask of the native buttons only. Bits without a name are kept.
    pub fn from_native(buttons: u16) -> Self {
        Self::from_bits_retain(buttons as u32)
    }
}

/// True if every bit of `button` is set in `mask`.
///
/// `button` may combine several flags, e.g. `Buttons::A | Buttons::B`.
pub fn is_down(mask: Buttons, button: Buttons) -> bool {
    mask.contains(button)
}
