//! Windows Audio Device Switcher - Library
//!
//! A system tray utility that cycles the default audio playback device.
//!
//! ## Features
//!
//! - Cycles through the active playback devices on a tray left-click or
//!   menu selection
//! - Speaker / headphone tray icon reflecting the selected device
//! - Re-launches itself with a `runas` elevation request when started
//!   unprivileged
//! - Delegates the default-device change to the AudioDeviceCmdlets
//!   PowerShell module

pub mod app;
pub mod audio;
pub mod platform;
pub mod ui;

pub use app::{AppState, Switcher};
pub use audio::{AudioError, PlaybackDevice, PowerShellCommand, SetDefaultCommand};
pub use platform::{IconKind, TrayIcons};
pub use ui::{TrayError, TrayManager, TrayMenuAction};
