//! Application state and switch logic.
//!
//! `Switcher` owns the device list and cursor; `AppState` wires it to the
//! tray icon and the loaded images.

use crate::audio::device::PlaybackDevice;
use crate::audio::switcher::SetDefaultCommand;
use crate::platform::icons::{IconKind, TrayIcons};
use crate::ui::tray::{TrayManager, TrayMenuAction};
use tracing::{debug, error, info, warn};
use tray_icon::menu::MenuId;

/// Circular cursor over the playback device list plus the external
/// set-default command.
pub struct Switcher {
    devices: Vec<PlaybackDevice>,
    cursor: usize,
    command: Box<dyn SetDefaultCommand>,
}

impl Switcher {
    pub fn new(devices: Vec<PlaybackDevice>, command: Box<dyn SetDefaultCommand>) -> Self {
        Self {
            devices,
            cursor: 0,
            command,
        }
    }

    pub fn devices(&self) -> &[PlaybackDevice] {
        &self.devices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance to the next device and ask the external command to make it
    /// the system default. Returns the device now under the cursor, or
    /// `None` when the list is empty.
    ///
    /// The cursor advances even when the external command reports failure,
    /// so the UI stays in step with the cursor rather than with confirmed
    /// success. Command errors are logged, never propagated.
    pub fn switch(&mut self) -> Option<&PlaybackDevice> {
        if self.devices.is_empty() {
            info!("No playback devices found.");
            return None;
        }

        self.cursor = (self.cursor + 1) % self.devices.len();
        let device = &self.devices[self.cursor];

        match self.command.set_default(&device.id) {
            Ok(output) if output.succeeded() => info!("Switched to {}", device.name),
            Ok(output) => warn!(
                "Set-default did not take effect for {} (exit code {:?}): {}",
                device.name,
                output.exit_code,
                output.stdout.trim()
            ),
            Err(e) => error!("Error setting default audio device: {e}"),
        }

        Some(device)
    }
}

/// Main application state, owned by the UI thread.
pub struct AppState {
    switcher: Switcher,
    icons: TrayIcons,
    tray: TrayManager,
}

impl AppState {
    pub fn new(
        devices: Vec<PlaybackDevice>,
        icons: TrayIcons,
        tray: TrayManager,
        command: Box<dyn SetDefaultCommand>,
    ) -> Self {
        Self {
            switcher: Switcher::new(devices, command),
            icons,
            tray,
        }
    }

    /// Map a menu event id to its action.
    pub fn action_for(&self, id: &MenuId) -> Option<TrayMenuAction> {
        self.tray.action_for(id)
    }

    /// Switch to the next playback device and refresh the tray icon.
    /// Bound to both the menu entry and a left-click on the tray icon.
    pub fn switch_audio_device(&mut self) {
        let Some(device) = self.switcher.switch() else {
            return;
        };
        let name = device.name.clone();
        self.update_icon(&name);
    }

    /// Pick the icon for `device_name` (case-insensitive substring match)
    /// and display it. Names matching neither category, or categories whose
    /// asset failed to load, leave the current icon unchanged.
    fn update_icon(&mut self, device_name: &str) {
        debug!("Updating icon for device: {device_name}");

        let Some(kind) = IconKind::for_device_name(device_name) else {
            return;
        };
        let Some(icon) = self.icons.get(kind) else {
            return;
        };
        if let Err(e) = self.tray.set_icon(icon.clone()) {
            warn!("Error updating icon: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::AudioError;
    use crate::audio::switcher::CommandOutput;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingCommand {
        calls: Rc<RefCell<Vec<String>>>,
        exit_code: Option<i32>,
        stdout: &'static str,
    }

    impl RecordingCommand {
        fn succeeding(calls: Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                calls,
                exit_code: Some(0),
                stdout: "",
            }
        }
    }

    impl SetDefaultCommand for RecordingCommand {
        fn set_default(&self, device_id: &str) -> Result<CommandOutput, AudioError> {
            self.calls.borrow_mut().push(device_id.to_string());
            Ok(CommandOutput {
                exit_code: self.exit_code,
                stdout: self.stdout.to_string(),
            })
        }
    }

    struct FailingCommand;

    impl SetDefaultCommand for FailingCommand {
        fn set_default(&self, _device_id: &str) -> Result<CommandOutput, AudioError> {
            Err(AudioError::CommandSpawnFailed(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "powershell missing",
            )))
        }
    }

    fn two_devices() -> Vec<PlaybackDevice> {
        vec![
            PlaybackDevice::new("A", "Speakers"),
            PlaybackDevice::new("B", "Headphones"),
        ]
    }

    #[test]
    fn test_switch_on_empty_list_is_noop() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut switcher = Switcher::new(
            Vec::new(),
            Box::new(RecordingCommand::succeeding(calls.clone())),
        );

        assert!(switcher.switch().is_none());
        assert!(calls.borrow().is_empty());
        assert_eq!(switcher.cursor(), 0);
    }

    #[test]
    fn test_switching_returns_to_start_after_full_lap() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let devices = vec![
            PlaybackDevice::new("A", "Speakers"),
            PlaybackDevice::new("B", "Headphones"),
            PlaybackDevice::new("C", "HDMI Output"),
        ];
        let mut switcher = Switcher::new(
            devices,
            Box::new(RecordingCommand::succeeding(calls.clone())),
        );

        let start = switcher.cursor();
        for _ in 0..switcher.devices().len() {
            assert!(switcher.switch().is_some());
        }
        assert_eq!(switcher.cursor(), start);
    }

    #[test]
    fn test_two_device_scenario_alternates_targets() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut switcher = Switcher::new(
            two_devices(),
            Box::new(RecordingCommand::succeeding(calls.clone())),
        );

        let first = switcher.switch().cloned().unwrap();
        assert_eq!(first.id, "B");
        assert_eq!(IconKind::for_device_name(&first.name), Some(IconKind::Headphone));

        let second = switcher.switch().cloned().unwrap();
        assert_eq!(second.id, "A");
        assert_eq!(IconKind::for_device_name(&second.name), Some(IconKind::Speaker));

        assert_eq!(*calls.borrow(), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_cursor_advances_when_command_reports_device_not_found() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let command = RecordingCommand {
            calls: calls.clone(),
            exit_code: Some(0),
            stdout: "Device not found\n",
        };
        let mut switcher = Switcher::new(two_devices(), Box::new(command));

        // Optimistic behavior: the switch is still reflected.
        let device = switcher.switch().cloned();
        assert_eq!(device.map(|d| d.id), Some("B".to_string()));
        assert_eq!(switcher.cursor(), 1);
    }

    #[test]
    fn test_command_errors_do_not_propagate() {
        let mut switcher = Switcher::new(two_devices(), Box::new(FailingCommand));

        let device = switcher.switch().cloned();
        assert_eq!(device.map(|d| d.id), Some("B".to_string()));
        assert_eq!(switcher.cursor(), 1);
    }
}
