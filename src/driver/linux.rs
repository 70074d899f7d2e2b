use super::{DriverLibrary, LibrarySource};
use crate::error::{PadError, Result};
use std::ffi::{c_void, CStr, CString};
use std::ptr::NonNull;

/// Shared objects found through the dynamic linker search path.
///
/// Useful with a compatibility layer that ships the xinput DLLs as native
/// libraries under the same file names.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLibraries;

impl LibrarySource for SystemLibraries {
    fn open(&self, name: &str) -> Result<Box<dyn DriverLibrary>> {
        let c_name = CString::new(name)
            .map_err(|_| PadError::DriverUnavailable(format!("{}: invalid library name", name)))?;
        let handle = unsafe { libc::dlopen(c_name.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        match NonNull::new(handle) {
            Some(handle) => Ok(Box::new(SharedObject { handle })),
            None => Err(PadError::DriverUnavailable(format!("{}: {}", name, dl_error()))),
        }
    }
}

fn dl_error() -> String {
    let message = unsafe { libc::dlerror() };
    if message.is_null() {
        "unknown dlopen error".to_string()
    } else {
        unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
    }
}

struct SharedObject {
    handle: NonNull<c_void>,
}

// dlopen handles are process-wide and usable from any thread.
unsafe impl Send for SharedObject {}
unsafe impl Sync for SharedObject {}

// Only loaded for the xinput candidates, whose exports have the driver ABI.
unsafe impl DriverLibrary for SharedObject {
    fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>> {
        NonNull::new(unsafe { libc::dlsym(self.handle.as_ptr(), name.as_ptr()) })
    }
}

impl Drop for SharedObject {
    fn drop(&mut self) {
        if unsafe { libc::dlclose(self.handle.as_ptr()) } != 0 {
            log::warn!("Failed to release driver library: {}", dl_error());
        }
    }
}
