//! UI module for the system tray.

pub mod tray;

pub use tray::{TrayError, TrayManager, TrayMenuAction};
