//! System tray icon management.
//!
//! Manages the system tray icon, tooltip, and context menu.

use thiserror::Error;
use tray_icon::{
    menu::{Menu, MenuId, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

/// Tooltip shown on the tray icon.
pub const TOOLTIP: &str = "Audio Device Switcher";

/// Actions the context menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    /// Advance to the next playback device
    Switch,

    /// Stop the event loop and exit
    Exit,
}

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),

    #[error("Failed to update tray icon: {0}")]
    UpdateFailed(String),
}

/// System tray manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    switch_menu_id: MenuId,
    exit_menu_id: MenuId,
}

impl TrayManager {
    /// Create and show the tray icon with its two-entry menu.
    ///
    /// `initial_icon` is the speaker image; `None` (asset failed to load)
    /// builds the tray without an image rather than failing.
    pub fn create(initial_icon: Option<Icon>) -> Result<Self, TrayError> {
        let menu = Menu::new();

        let switch_item = MenuItem::new("Switch Audio Device", true, None);
        let switch_menu_id = switch_item.id().clone();
        menu.append(&switch_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let exit_item = MenuItem::new("Exit", true, None);
        let exit_menu_id = exit_item.id().clone();
        menu.append(&exit_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let mut builder = TrayIconBuilder::new()
            .with_tooltip(TOOLTIP)
            .with_menu(Box::new(menu));
        if let Some(icon) = initial_icon {
            builder = builder.with_icon(icon);
        }

        let tray_icon = builder
            .build()
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        Ok(Self {
            tray_icon,
            switch_menu_id,
            exit_menu_id,
        })
    }

    /// Map a menu event id to the action it stands for.
    pub fn action_for(&self, id: &MenuId) -> Option<TrayMenuAction> {
        if *id == self.switch_menu_id {
            Some(TrayMenuAction::Switch)
        } else if *id == self.exit_menu_id {
            Some(TrayMenuAction::Exit)
        } else {
            None
        }
    }

    /// Swap the displayed image.
    pub fn set_icon(&mut self, icon: Icon) -> Result<(), TrayError> {
        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| TrayError::UpdateFailed(e.to_string()))
    }
}
