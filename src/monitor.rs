//! Background polling that reports controller changes over a channel.

use crate::config::MonitorConfig;
use crate::driver::Driver;
use crate::error::PadError;
use crate::gamepad::{Buttons, ControllerState, Vibration};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadEvent {
    /// The driver reported a new packet for this controller
    Changed {
        controller: u32,
        packet_number: u32,
        buttons: Buttons,
    },
    /// A poll failed after the previous one for this controller did not
    Failed { controller: u32, error: PadError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotStatus {
    Unpolled,
    Packet(u32),
    Failed,
}

pub struct Monitor {
    driver: Arc<Driver>,
    config: MonitorConfig,
    slots: HashMap<u32, SlotStatus>,
    state: ControllerState,
}

impl Monitor {
    pub fn new(driver: Arc<Driver>, config: MonitorConfig) -> Self {
        let slots = config
            .controllers
            .iter()
            .map(|&c| (c, SlotStatus::Unpolled))
            .collect();
        Self {
            driver,
            config,
            slots,
            state: ControllerState::default(),
        }
    }

    /// Poll every configured controller once.
    pub fn poll_once(&mut self) -> Vec<PadEvent> {
        let mut events = Vec::new();
        for &controller in &self.config.controllers {
            let previous = self.slots.get(&controller).copied().unwrap_or(SlotStatus::Unpolled);
            let result = self
                .driver
                .get_state(controller, &mut self.state, &self.config.thresholds);

            let status = match result {
                Ok(buttons) => {
                    let packet_number = self.state.packet_number;
                    if previous != SlotStatus::Packet(packet_number) {
                        events.push(PadEvent::Changed {
                            controller,
                            packet_number,
                            buttons,
                        });
                        if self.config.rumble_with_triggers {
                            self.rumble(controller);
                        }
                    }
                    SlotStatus::Packet(packet_number)
                }
                Err(error) => {
                    if previous != SlotStatus::Failed {
                        events.push(PadEvent::Failed { controller, error });
                    }
                    SlotStatus::Failed
                }
            };
            self.slots.insert(controller, status);
        }
        events
    }

    fn rumble(&self, controller: u32) {
        let gamepad = &self.state.gamepad;
        let vibration = Vibration::from_strength(
            gamepad.left_trigger as f32 / 255.0,
            gamepad.right_trigger as f32 / 255.0,
        );
        if let Err(e) = self.driver.set_state(controller, &vibration) {
            log::warn!("Failed to set vibration: {}", e);
        }
    }

    /// Run the monitor on its own thread until the handle is stopped.
    pub fn spawn(mut self) -> anyhow::Result<MonitorHandle> {
        let (event_sender, events) = crossbeam_channel::unbounded();
        let (stop, stop_receiver) = crossbeam_channel::bounded::<()>(1);
        let interval = self.config.poll_interval();

        let thread = std::thread::Builder::new()
            .name("padlink-monitor".into())
            .spawn(move || {
                log::info!("Monitoring controllers {:?}", self.config.controllers);
                loop {
                    if !send_all(&event_sender, self.poll_once()) {
                        break;
                    }
                    match stop_receiver.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
                log::info!("Monitor stopped");
            })?;

        Ok(MonitorHandle {
            events,
            stop,
            thread: Some(thread),
        })
    }
}

// False once nobody is listening anymore.
fn send_all(sender: &Sender<PadEvent>, events: Vec<PadEvent>) -> bool {
    events.into_iter().all(|event| sender.send(event).is_ok())
}

pub struct MonitorHandle {
    events: Receiver<PadEvent>,
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn events(&self) -> &Receiver<PadEvent> {
        &self.events
    }

    pub fn stop(mut self) -> anyhow::Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        let _ = self.stop.try_send(());
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| anyhow::anyhow!("Monitor thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("{}", e);
        }
    }
}
