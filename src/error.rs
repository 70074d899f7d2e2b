/// Status XInput returns for an empty controller slot.
pub const ERROR_DEVICE_NOT_CONNECTED: u32 = 1167;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PadError {
    /// No candidate library could be loaded, or one loaded without the
    /// required entry points.
    #[error("Input driver unavailable: {0}")]
    DriverUnavailable(String),

    #[error("Controller {controller}: {}", describe_status(.status))]
    Native { controller: u32, status: u32 },

    #[error("Config error: {0}")]
    Config(String),
}

impl PadError {
    /// The native status as an OS error, if this is a native call failure.
    pub fn os_error(&self) -> Option<std::io::Error> {
        match self {
            Self::Native { status, .. } => Some(std::io::Error::from_raw_os_error(*status as i32)),
            _ => None,
        }
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::Native { status, .. } if *status == ERROR_DEVICE_NOT_CONNECTED)
    }
}

fn describe_status(status: &u32) -> String {
    std::io::Error::from_raw_os_error(*status as i32).to_string()
}

pub type Result<T> = std::result::Result<T, PadError>;
