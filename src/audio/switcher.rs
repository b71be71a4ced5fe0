//! External set-default command.
//!
//! The actual default-device change is delegated to the AudioDeviceCmdlets
//! PowerShell module (`Get-AudioDevice` / `Set-AudioDevice`), invoked as a
//! child process. The command is modeled as a trait so tests can substitute
//! a mock instead of spawning a real shell.

use super::device::AudioError;
use std::process::Command;
use tracing::{debug, info};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VK_VOLUME_UP,
};

/// Result of one external set-default invocation.
///
/// Exit status and stdout are observed for logging only; a failed command
/// does not stop the switch from being reflected in the UI.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code, `None` if terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,
}

impl CommandOutput {
    /// True when the command exited cleanly and did not report a missing
    /// device.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.stdout.contains("Device not found")
    }
}

/// Makes a device the OS default playback device.
///
/// Inputs: the opaque device id. Outputs: exit code plus captured text.
pub trait SetDefaultCommand {
    fn set_default(&self, device_id: &str) -> Result<CommandOutput, AudioError>;
}

/// Production implementation shelling out to PowerShell.
#[derive(Debug, Default)]
pub struct PowerShellCommand;

impl PowerShellCommand {
    pub fn new() -> Self {
        Self
    }
}

impl SetDefaultCommand for PowerShellCommand {
    fn set_default(&self, device_id: &str) -> Result<CommandOutput, AudioError> {
        info!("Setting default audio device to {device_id}...");

        // The audio stack sometimes ignores the change until it sees input
        // activity, so nudge it with a synthetic keystroke first.
        send_wake_keystroke();

        let script = build_set_default_script(device_id);
        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .output()
            .map_err(AudioError::CommandSpawnFailed)?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Build the PowerShell pipeline that filters the playback device list by
/// exact id and sets the match as default.
///
/// The id is embedded as a single-quoted PowerShell literal, so variable
/// expansion and backtick escapes do not apply and an id containing shell
/// metacharacters cannot alter the command.
pub fn build_set_default_script(device_id: &str) -> String {
    format!(
        "$devices = Get-AudioDevice -Playback; \
         $deviceToSet = $devices | Where-Object {{ $_.ID -eq {} }}; \
         if ($deviceToSet) {{ $deviceToSet | Set-AudioDevice -Verbose }} \
         else {{ Write-Host 'Device not found' }}",
        quote_literal(device_id)
    )
}

/// Quote a string as a PowerShell single-quoted literal. Only embedded
/// single quotes need doubling.
fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Send one benign press/release of the volume key (VK 0xAF).
fn send_wake_keystroke() {
    let key_input = |flags: KEYBD_EVENT_FLAGS| INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VK_VOLUME_UP,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let inputs = [
        key_input(KEYBD_EVENT_FLAGS(0)),
        key_input(KEYEVENTF_KEYUP),
    ];

    let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent != inputs.len() as u32 {
        debug!("SendInput delivered {sent} of {} events", inputs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_targets_exact_id() {
        let script = build_set_default_script("{0.0.0.00000000}.{abc}");
        assert!(script.contains("$_.ID -eq '{0.0.0.00000000}.{abc}'"));
        assert!(script.contains("Set-AudioDevice"));
        assert!(script.contains("Device not found"));
    }

    #[test]
    fn test_script_escapes_single_quotes() {
        let script = build_set_default_script("dev'; Stop-Computer; '");
        // Embedded quotes are doubled, keeping the id inside one literal.
        assert!(script.contains("$_.ID -eq 'dev''; Stop-Computer; '''"));
    }

    #[test]
    fn test_script_leaves_expansion_characters_verbatim() {
        let script = build_set_default_script("id-$env:TEMP-`u{41}");
        // Single-quoted literals are verbatim in PowerShell; the id must be
        // embedded unchanged.
        assert!(script.contains("'id-$env:TEMP-`u{41}'"));
    }

    #[test]
    fn test_command_output_succeeded() {
        let ok = CommandOutput {
            exit_code: Some(0),
            stdout: String::new(),
        };
        assert!(ok.succeeded());

        let not_found = CommandOutput {
            exit_code: Some(0),
            stdout: "Device not found\n".to_string(),
        };
        assert!(!not_found.succeeded());

        let failed = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
        };
        assert!(!failed.succeeded());
    }
}
