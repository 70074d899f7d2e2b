use padlink::{Binding, Monitor, MonitorConfig, PadEvent};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = MonitorConfig::load(config_path.as_deref()).unwrap_or_default();

    let binding = Binding::load();
    if let (false, Some(cause)) = binding.is_loaded() {
        anyhow::bail!("XInput could not be loaded: {}", cause);
    }
    let driver = Arc::new(binding.into_driver()?);
    log::info!("Using {}", driver.library_name());

    // Runs until the process is killed; dropping the handle stops the thread.
    let handle = Monitor::new(driver, config).spawn()?;

    for event in handle.events() {
        match event {
            PadEvent::Changed {
                controller,
                packet_number,
                buttons,
            } => {
                log::info!("Pad {} #{}: {:?}", controller, packet_number, buttons);
            }
            PadEvent::Failed { controller, error } if error.is_not_connected() => {
                log::info!("Pad {} not connected", controller);
            }
            PadEvent::Failed { controller, error } => {
                log::warn!("Pad {}: {}", controller, error);
            }
        }
    }

    anyhow::bail!("Monitor thread exited unexpectedly")
}
