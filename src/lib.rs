//! XInput gamepad access through a driver library bound at runtime.
//!
//! ```no_run
//! use padlink::{Buttons, ControllerState, Driver, Thresholds};
//!
//! let driver = Driver::load()?;
//! let mut state = ControllerState::default();
//! let buttons = driver.get_state(0, &mut state, &Thresholds::default())?;
//! if padlink::is_down(buttons, Buttons::A | Buttons::RIGHT_TRIGGER) {
//!     println!("fire");
//! }
//! # Ok::<(), padlink::PadError>(())
//! ```

pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod gamepad;
pub mod monitor;

pub use classify::{analog_to_digital, Thresholds};
pub use config::MonitorConfig;
pub use driver::{shared, Binding, Driver};
pub use error::{PadError, Result};
pub use gamepad::{controllers, is_down, Buttons, ControllerState, Gamepad, Vibration, CONTROLLER_MAX};
pub use monitor::{Monitor, MonitorHandle, PadEvent};
