//! Device enumeration using Windows MMDevice API.
//!
//! Provides COM initialization and playback endpoint enumeration.

use super::device::{AudioError, PlaybackDevice};
use tracing::{error, info};
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::{
    eRender, IMMDevice, IMMDeviceEnumerator, MMDeviceEnumerator, DEVICE_STATE_ACTIVE,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Initialize COM for the current thread.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            // Use apartment-threaded for UI compatibility
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(AudioError::ComInitFailed)?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

/// Device enumerator using Windows MMDevice API.
pub struct DeviceEnumerator {
    enumerator: IMMDeviceEnumerator,
}

impl DeviceEnumerator {
    /// Create a new DeviceEnumerator.
    ///
    /// Note: COM must be initialized before calling this function.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(AudioError::EnumerationFailed)?;

            Ok(Self { enumerator })
        }
    }

    /// Get all active playback devices, in OS enumeration order.
    pub fn get_devices(&self) -> Result<Vec<PlaybackDevice>, AudioError> {
        unsafe {
            let collection = self
                .enumerator
                .EnumAudioEndpoints(eRender, DEVICE_STATE_ACTIVE)
                .map_err(AudioError::EnumerationFailed)?;

            let count = collection
                .GetCount()
                .map_err(AudioError::EnumerationFailed)?;

            let mut devices = Vec::with_capacity(count as usize);

            for i in 0..count {
                let device = collection.Item(i).map_err(AudioError::EnumerationFailed)?;

                if let Ok(playback) = self.device_to_playback(&device) {
                    devices.push(playback);
                }
            }

            Ok(devices)
        }
    }

    /// Convert an IMMDevice to a PlaybackDevice.
    fn device_to_playback(&self, device: &IMMDevice) -> Result<PlaybackDevice, AudioError> {
        unsafe {
            // Get device ID
            let id = device.GetId().map_err(AudioError::EnumerationFailed)?;
            let id_string = id
                .to_string()
                .map_err(|e| AudioError::StringConversion(e.to_string()))?;

            // Get device name from properties
            let props: IPropertyStore = device
                .OpenPropertyStore(STGM(0))
                .map_err(AudioError::EnumerationFailed)?;

            let name = self
                .get_device_name(&props)
                .unwrap_or_else(|| "Unknown".to_string());

            Ok(PlaybackDevice {
                id: id_string,
                name,
            })
        }
    }

    /// Get the friendly name of a device from its property store.
    fn get_device_name(&self, props: &IPropertyStore) -> Option<String> {
        unsafe {
            // Convert DEVPROPKEY to PROPERTYKEY
            let key = PROPERTYKEY {
                fmtid: DEVPKEY_Device_FriendlyName.fmtid,
                pid: DEVPKEY_Device_FriendlyName.pid,
            };

            let prop = match props.GetValue(&key) {
                Ok(p) => p,
                Err(_) => return None,
            };

            // Use the Display trait to get the string value
            let s = prop.to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        }
    }
}

/// Snapshot of the active playback devices, taken once at startup.
///
/// Never fails: COM initialization and enumeration errors are logged and
/// yield an empty list, which turns switching into a no-op. The snapshot
/// holds no COM interfaces, so COM is uninitialized again on return. The
/// list is not refreshed while the program runs (documented limitation).
pub fn list_playback_devices() -> Vec<PlaybackDevice> {
    info!("Enumerating audio devices...");

    let _com = match ComGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Error getting audio devices: {e}");
            return Vec::new();
        }
    };

    match DeviceEnumerator::new().and_then(|e| e.get_devices()) {
        Ok(devices) => {
            info!("Found {} playback device(s)", devices.len());
            devices
        }
        Err(e) => {
            error!("Error getting audio devices: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_playback_devices_is_infallible() {
        // The startup snapshot must come back as a plain list on every
        // failure path; the tray is built either way.
        let devices = list_playback_devices();
        for device in &devices {
            assert!(!device.id.is_empty());
        }
    }
}
