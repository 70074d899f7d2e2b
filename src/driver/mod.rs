//! Runtime binding to the XInput driver library.
//!
//! [`Driver::load`] tries each of [`CANDIDATE_LIBRARIES`] in order and keeps
//! the first one that loads. A [`Driver`] only exists once both entry points
//! are resolved, so every poll and vibration call goes through a ready
//! binding.

pub mod ffi;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::SystemLibraries;
#[cfg(windows)]
pub use windows::SystemLibraries;

use crate::classify::{self, Thresholds};
use crate::error::{PadError, Result};
use crate::gamepad::{Buttons, ControllerState, Vibration};
use ffi::{GetStateFn, SetStateFn};
use std::ffi::{c_void, CStr};
use std::ptr::NonNull;
use std::sync::OnceLock;

/// Driver versions in order of preference, newest first.
pub const CANDIDATE_LIBRARIES: [&str; 3] = ["xinput1_4.dll", "xinput1_3.dll", "xinput9_1_0.dll"];

/// A loaded native library.
///
/// # Safety
/// Implementors promise that any address returned by `symbol` for the
/// XInput entry point names is a function with the matching signature in
/// [`ffi`], and that it stays callable for as long as the library is alive.
pub unsafe trait DriverLibrary: Send + Sync {
    fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>>;
}

/// Something that can open a library by file name.
pub trait LibrarySource {
    fn open(&self, name: &str) -> Result<Box<dyn DriverLibrary>>;
}

/// Targets without a dynamic driver: every candidate fails to load.
#[cfg(not(any(windows, target_os = "linux")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLibraries;

#[cfg(not(any(windows, target_os = "linux")))]
impl LibrarySource for SystemLibraries {
    fn open(&self, name: &str) -> Result<Box<dyn DriverLibrary>> {
        Err(PadError::DriverUnavailable(format!(
            "{}: dynamic driver loading is not supported on this platform",
            name
        )))
    }
}

/// Ready binding to the driver's two entry points.
pub struct Driver {
    get_state: GetStateFn,
    set_state: SetStateFn,
    library_name: &'static str,
    // Keeps the entry points valid
    _library: Box<dyn DriverLibrary>,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("library", &self.library_name)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Bind to the best driver found on the system.
    pub fn load() -> Result<Self> {
        Self::load_from(&SystemLibraries)
    }

    pub fn load_from(source: &dyn LibrarySource) -> Result<Self> {
        let (library_name, library) = open_first(source)?;

        let get_state = library.symbol(ffi::GET_STATE_SYMBOL);
        let set_state = library.symbol(ffi::SET_STATE_SYMBOL);
        let (Some(get_state), Some(set_state)) = (get_state, set_state) else {
            log::warn!("{} does not export the XInput entry points", library_name);
            return Err(PadError::DriverUnavailable(format!(
                "{}: missing {:?} or {:?}",
                library_name,
                ffi::GET_STATE_SYMBOL,
                ffi::SET_STATE_SYMBOL
            )));
        };

        // SAFETY: DriverLibrary guarantees these symbols have the driver ABI
        let (get_state, set_state) = unsafe { (ffi::as_get_state(get_state), ffi::as_set_state(set_state)) };

        log::info!("XInput bound via {}", library_name);
        Ok(Self {
            get_state,
            set_state,
            library_name,
            _library: library,
        })
    }

    /// File name of the library that was bound
    pub fn library_name(&self) -> &'static str {
        self.library_name
    }

    /// Poll a controller and return its buttons with analog input folded in
    /// as digital flags.
    ///
    /// The controller index is passed to the driver as is. On error the
    /// contents of `state` are stale.
    pub fn get_state(
        &self,
        controller: u32,
        state: &mut ControllerState,
        thresholds: &Thresholds,
    ) -> Result<Buttons> {
        self.get_simple_state(controller, state)?;
        Ok(classify::digital_state(&state.gamepad, thresholds))
    }

    /// Poll a controller without deriving any digital flags.
    pub fn get_simple_state(&self, controller: u32, state: &mut ControllerState) -> Result<()> {
        // SAFETY: resolved in `load_from`; `_library` keeps it loaded
        let status = unsafe { ffi::get_state(self.get_state, controller, state) };
        log::trace!("XInputGetState({}) -> {}", controller, status);
        check(controller, status)
    }

    /// Set the motor speeds of a controller.
    pub fn set_state(&self, controller: u32, vibration: &Vibration) -> Result<()> {
        // SAFETY: resolved in `load_from`; `_library` keeps it loaded
        let status = unsafe { ffi::set_state(self.set_state, controller, vibration) };
        log::trace!("XInputSetState({}, {:?}) -> {}", controller, vibration, status);
        check(controller, status)
    }
}

fn check(controller: u32, status: u32) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(PadError::Native { controller, status })
    }
}

// Only the last failure is reported; earlier ones are logged.
fn open_first(source: &dyn LibrarySource) -> Result<(&'static str, Box<dyn DriverLibrary>)> {
    let mut last_error = None;
    for name in CANDIDATE_LIBRARIES {
        match source.open(name) {
            Ok(library) => return Ok((name, library)),
            Err(e) => {
                log::debug!("Could not load {}: {}", name, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| PadError::DriverUnavailable("no candidate libraries".into())))
}

/// Outcome of a one-shot load: either a ready driver or the reason there is
/// none.
#[derive(Debug)]
pub struct Binding {
    outcome: Result<Driver>,
}

impl Binding {
    pub fn load() -> Self {
        Self::load_from(&SystemLibraries)
    }

    pub fn load_from(source: &dyn LibrarySource) -> Self {
        let outcome = Driver::load_from(source);
        if let Err(e) = &outcome {
            log::error!("XInput is not available: {}", e);
        }
        Self { outcome }
    }

    /// `(true, None)` when ready, `(false, Some(cause))` otherwise.
    pub fn is_loaded(&self) -> (bool, Option<&PadError>) {
        match &self.outcome {
            Ok(_) => (true, None),
            Err(e) => (false, Some(e)),
        }
    }

    /// The driver, or the load failure.
    pub fn driver(&self) -> Result<&Driver> {
        self.outcome.as_ref().map_err(|e| e.clone())
    }

    pub fn into_driver(self) -> Result<Driver> {
        self.outcome
    }
}

static SHARED: OnceLock<Binding> = OnceLock::new();

/// Process-wide binding, loaded on first use and never retried.
pub fn shared() -> &'static Binding {
    SHARED.get_or_init(Binding::load)
}
