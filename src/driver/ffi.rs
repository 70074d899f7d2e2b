//! Entry point types and the calls that cross into the driver.
//!
//! Calling an entry point is only sound for pointers that really are the
//! driver's exports, so the call wrappers are `unsafe`:
//!
//! ```compile_fail,E0133
//! use padlink::driver::ffi::{self, GetStateFn};
//! use padlink::ControllerState;
//!
//! fn poll(entry: GetStateFn) -> u32 {
//!     let mut state = ControllerState::default();
//!     ffi::get_state(entry, 0, &mut state)
//! }
//! ```

use crate::gamepad::{ControllerState, Vibration};
use std::ffi::{c_void, CStr};
use std::ptr::NonNull;

pub const GET_STATE_SYMBOL: &CStr = c"XInputGetState";
pub const SET_STATE_SYMBOL: &CStr = c"XInputSetState";

pub type GetStateFn = unsafe extern "system" fn(u32, *mut ControllerState) -> u32;
pub type SetStateFn = unsafe extern "system" fn(u32, *mut Vibration) -> u32;

/// Reinterpret an exported symbol as `XInputGetState`.
///
/// # Safety
/// `symbol` must be the address of a function with the `GetStateFn` signature.
pub unsafe fn as_get_state(symbol: NonNull<c_void>) -> GetStateFn {
    std::mem::transmute::<*mut c_void, GetStateFn>(symbol.as_ptr())
}

/// Reinterpret an exported symbol as `XInputSetState`.
///
/// # Safety
/// `symbol` must be the address of a function with the `SetStateFn` signature.
pub unsafe fn as_set_state(symbol: NonNull<c_void>) -> SetStateFn {
    std::mem::transmute::<*mut c_void, SetStateFn>(symbol.as_ptr())
}

/// Call `XInputGetState`, letting it write into `state`.
///
/// # Safety
/// `entry` must be the driver's `XInputGetState`, resolved from a library
/// that is still loaded.
pub unsafe fn get_state(entry: GetStateFn, controller: u32, state: &mut ControllerState) -> u32 {
    entry(controller, state as *mut ControllerState)
}

/// Call `XInputSetState` with a copy of `vibration`.
///
/// # Safety
/// `entry` must be the driver's `XInputSetState`, resolved from a library
/// that is still loaded.
pub unsafe fn set_state(entry: SetStateFn, controller: u32, vibration: &Vibration) -> u32 {
    let mut vibration = *vibration;
    entry(controller, &mut vibration as *mut Vibration)
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "system" fn fill_state(controller: u32, state: *mut ControllerState) -> u32 {
        (*state).packet_number = controller + 1;
        (*state).gamepad.thumb_ly = -5;
        0
    }

    unsafe extern "system" fn echo_left_motor(_controller: u32, vibration: *mut Vibration) -> u32 {
        (*vibration).left_motor_speed as u32
    }

    #[test]
    fn test_get_state_writes_through_buffer() {
        let mut state = ControllerState::default();
        let status = unsafe { get_state(fill_state, 2, &mut state) };
        assert_eq!(status, 0);
        assert_eq!(state.packet_number, 3);
        assert_eq!(state.gamepad.thumb_ly, -5);
    }

    #[test]
    fn test_set_state_passes_a_copy() {
        let vibration = Vibration::new(42, 7);
        let status = unsafe { set_state(echo_left_motor, 0, &vibration) };
        assert_eq!(status, 42);
        assert_eq!(vibration, Vibration::new(42, 7));
    }
}
