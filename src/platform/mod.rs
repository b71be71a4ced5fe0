//! Platform-specific module for Windows utilities.
//!
//! This module contains Windows-specific functionality including
//! privilege elevation and icon management.

pub mod elevation;
pub mod icons;

pub use elevation::ElevationError;
pub use icons::{IconKind, TrayIcons};
