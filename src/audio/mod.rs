//! Audio module for Windows Core Audio API interactions.
//!
//! This module provides playback device enumeration and the external
//! set-default command.

pub mod device;
pub mod enumerator;
pub mod switcher;

pub use device::{AudioError, PlaybackDevice};
pub use enumerator::{list_playback_devices, ComGuard, DeviceEnumerator};
pub use switcher::{CommandOutput, PowerShellCommand, SetDefaultCommand};
