//! Icon loading and device classification.
//!
//! Loads the two PNG assets shipped next to the executable and maps device
//! names to the icon that should represent them.

use std::path::{Path, PathBuf};
use tracing::{error, info};
use tray_icon::Icon;

/// Asset file names, resolved against the executable's directory.
pub const SPEAKER_ICON_FILE: &str = "speaker_icon.png";
pub const HEADPHONE_ICON_FILE: &str = "headphone_icon.png";

/// Which of the two bundled tray images a device maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Speaker,
    Headphone,
}

impl IconKind {
    /// Classify a device by friendly name.
    ///
    /// Case-insensitive substring match; a name matching neither category
    /// returns `None` and the displayed icon stays as it is.
    pub fn for_device_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        if lowered.contains("speaker") {
            Some(Self::Speaker)
        } else if lowered.contains("headphone") {
            Some(Self::Headphone)
        } else {
            None
        }
    }
}

/// The two tray images, loaded once at startup.
///
/// Either may be absent when its asset failed to load; the tray is then
/// built or left with whatever image it currently shows instead of
/// failing.
pub struct TrayIcons {
    speaker: Option<Icon>,
    headphone: Option<Icon>,
}

impl TrayIcons {
    /// Load both assets from the installation directory.
    pub fn load() -> Self {
        Self {
            speaker: load_icon(SPEAKER_ICON_FILE),
            headphone: load_icon(HEADPHONE_ICON_FILE),
        }
    }

    /// The speaker image (the tray's startup image).
    pub fn speaker(&self) -> Option<&Icon> {
        self.speaker.as_ref()
    }

    pub fn get(&self, kind: IconKind) -> Option<&Icon> {
        match kind {
            IconKind::Speaker => self.speaker.as_ref(),
            IconKind::Headphone => self.headphone.as_ref(),
        }
    }
}

/// Load a PNG from the installation directory into a tray icon handle.
///
/// Resolves against the executable's directory (not the working
/// directory) so the asset is found regardless of launch location.
/// Missing or undecodable assets are logged and yield `None`.
pub fn load_icon(file_name: &str) -> Option<Icon> {
    let Some(path) = install_dir_path(file_name) else {
        error!("Error loading icon '{file_name}': cannot resolve installation directory");
        return None;
    };

    info!("Loading icon: {}", path.display());
    let (rgba, width, height) = match read_rgba(&path) {
        Ok(decoded) => decoded,
        Err(e) => {
            error!("Error loading icon '{file_name}': {e}");
            return None;
        }
    };

    match Icon::from_rgba(rgba, width, height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            error!("Error loading icon '{file_name}': {e}");
            None
        }
    }
}

fn install_dir_path(file_name: &str) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(file_name))
}

fn read_rgba(path: &Path) -> Result<(Vec<u8>, u32, u32), image::ImageError> {
    let img = image::open(path)?.into_rgba8();
    let (width, height) = img.dimensions();
    Ok((img.into_raw(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            IconKind::for_device_name("Rear Speaker (Realtek)"),
            Some(IconKind::Speaker)
        );
        assert_eq!(
            IconKind::for_device_name("USB Headphones"),
            Some(IconKind::Headphone)
        );
        assert_eq!(
            IconKind::for_device_name("HEADPHONE jack"),
            Some(IconKind::Headphone)
        );
    }

    #[test]
    fn test_unmatched_names_leave_icon_unchanged() {
        assert_eq!(IconKind::for_device_name("HDMI Output"), None);
        assert_eq!(IconKind::for_device_name(""), None);
    }

    #[test]
    fn test_absent_assets_yield_no_icon() {
        // Both assets failing to load leaves a usable (empty) icon set;
        // lookups return None and the tray keeps its current image.
        let icons = TrayIcons {
            speaker: None,
            headphone: None,
        };
        assert!(icons.speaker().is_none());
        assert!(icons.get(IconKind::Speaker).is_none());
        assert!(icons.get(IconKind::Headphone).is_none());
    }

    #[test]
    fn test_load_icon_missing_file_is_none() {
        assert!(load_icon("no_such_icon_asset.png").is_none());
    }
}
