//! Audio Device Switcher - tray utility entry point.
//!
//! Gates on elevation, builds the tray controller, then blocks on the
//! Win32 message loop. Menu selections and tray clicks are dispatched on
//! this thread by the tray library while the loop pumps.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tray_icon::menu::MenuEvent;
use tray_icon::{MouseButton, MouseButtonState, TrayIconEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostQuitMessage, TranslateMessage, MSG,
};

use audio_switcher_rs::app::AppState;
use audio_switcher_rs::audio::{list_playback_devices, PowerShellCommand};
use audio_switcher_rs::platform::elevation;
use audio_switcher_rs::platform::icons::TrayIcons;
use audio_switcher_rs::ui::{TrayManager, TrayMenuAction};

thread_local! {
    static APP_STATE: RefCell<Option<Rc<RefCell<AppState>>>> = const { RefCell::new(None) };
}

fn with_app_state<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut AppState) -> R,
{
    APP_STATE.with(|state| state.borrow().as_ref().map(|app| f(&mut app.borrow_mut())))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Switching the default playback device needs administrative rights.
    // An unprivileged instance only issues the relaunch request and exits;
    // no enumeration, icon loading, or tray construction happens here.
    if !elevation::is_elevated() {
        info!("Requesting administrator privileges...");
        if let Err(e) = elevation::relaunch_elevated() {
            error!("Failed to request elevation: {e}");
            pause_for_acknowledgement();
        }
        return;
    }

    if let Err(e) = run() {
        error!("An error occurred: {e:#}");
        pause_for_acknowledgement();
    }
}

fn run() -> Result<()> {
    info!("Initializing audio switcher...");

    let devices = list_playback_devices();
    let icons = TrayIcons::load();
    let tray = TrayManager::create(icons.speaker().cloned())?;
    let app = AppState::new(devices, icons, tray, Box::new(PowerShellCommand::new()));

    APP_STATE.with(|state| *state.borrow_mut() = Some(Rc::new(RefCell::new(app))));

    // Both handlers run on this thread while the loop below pumps.
    MenuEvent::set_event_handler(Some(|event: MenuEvent| {
        let action = with_app_state(|app| app.action_for(&event.id)).flatten();
        match action {
            Some(TrayMenuAction::Switch) => {
                with_app_state(|app| app.switch_audio_device());
            }
            Some(TrayMenuAction::Exit) => unsafe {
                PostQuitMessage(0);
            },
            None => {}
        }
    }));

    // Left click on the tray icon switches, same as the menu entry.
    TrayIconEvent::set_event_handler(Some(|event: TrayIconEvent| {
        if let TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } = event
        {
            with_app_state(|app| app.switch_audio_device());
        }
    }));

    info!("Running...");
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).into() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Dropping the state tears the tray icon down before exit.
    APP_STATE.with(|state| state.borrow_mut().take());

    Ok(())
}

/// Keep the console open so the error stays readable when the program was
/// launched by double-click.
fn pause_for_acknowledgement() {
    println!("Press Enter to close...");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}
