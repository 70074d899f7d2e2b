use super::{DriverLibrary, LibrarySource};
use crate::error::{PadError, Result};
use std::ffi::{c_void, CStr};
use std::ptr::NonNull;
use windows::core::{PCSTR, PCWSTR};
use windows::Win32::Foundation::{FreeLibrary, HMODULE};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

/// Libraries found through the regular DLL search path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLibraries;

impl LibrarySource for SystemLibraries {
    fn open(&self, name: &str) -> Result<Box<dyn DriverLibrary>> {
        let wide_name: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        let module = unsafe { LoadLibraryW(PCWSTR(wide_name.as_ptr())) }
            .map_err(|e| PadError::DriverUnavailable(format!("{}: {}", name, e)))?;
        Ok(Box::new(Dll { module }))
    }
}

struct Dll {
    module: HMODULE,
}

// A module handle stays valid on any thread until FreeLibrary.
unsafe impl Send for Dll {}
unsafe impl Sync for Dll {}

// Only loaded for the xinput candidates, whose exports have the driver ABI.
unsafe impl DriverLibrary for Dll {
    fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>> {
        let proc = unsafe { GetProcAddress(self.module, PCSTR(name.as_ptr().cast())) }?;
        NonNull::new(proc as *mut c_void)
    }
}

impl Drop for Dll {
    fn drop(&mut self) {
        if let Err(e) = unsafe { FreeLibrary(self.module) } {
            log::warn!("Failed to release driver library: {}", e);
        }
    }
}
