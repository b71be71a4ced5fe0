//! Privilege elevation.
//!
//! Changing the system default playback device requires administrative
//! rights, so an unprivileged process re-launches itself with a `runas`
//! request and exits.

use std::os::windows::ffi::OsStrExt;
use thiserror::Error;
use windows::core::{w, PCWSTR};
use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

/// Elevation error types.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("Failed to locate current executable: {0}")]
    ExePathUnavailable(#[source] std::io::Error),

    #[error("ShellExecuteW returned error code {0}")]
    LaunchFailed(isize),
}

/// Whether the current process has administrative rights.
///
/// The shell call has no failure channel; a FALSE result covers both
/// "not elevated" and "could not determine".
pub fn is_elevated() -> bool {
    unsafe { IsUserAnAdmin().as_bool() }
}

/// Re-launch the current executable with an elevation request, passing
/// through the original argument vector. The caller exits immediately
/// after this returns; the elevated instance takes over.
pub fn relaunch_elevated() -> Result<(), ElevationError> {
    let exe = std::env::current_exe().map_err(ElevationError::ExePathUnavailable)?;
    let args: Vec<String> = std::env::args().skip(1).map(quote_arg).collect();
    let args = args.join(" ");

    let exe_wide: Vec<u16> = exe
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let args_wide: Vec<u16> = args.encode_utf16().chain(std::iter::once(0)).collect();

    let result = unsafe {
        ShellExecuteW(
            None,
            w!("runas"),
            PCWSTR(exe_wide.as_ptr()),
            PCWSTR(args_wide.as_ptr()),
            None,
            SW_SHOWNORMAL,
        )
    };

    // ShellExecuteW reports failure with values <= 32.
    let code = result.0 as isize;
    if code <= 32 {
        return Err(ElevationError::LaunchFailed(code));
    }
    Ok(())
}

/// Quote an argument for the relaunch command line.
///
/// Follows the MSVCRT parsing rules: backslashes are literal except when
/// they precede a double quote, where they and the quote itself must be
/// escaped.
fn quote_arg(arg: String) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                quoted.push(c);
            }
            '"' => {
                // Double the run of preceding backslashes, then escape
                // the quote.
                quoted.extend(std::iter::repeat('\\').take(backslashes + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                backslashes = 0;
                quoted.push(c);
            }
        }
    }
    // A trailing backslash run would otherwise escape the closing quote.
    quoted.extend(std::iter::repeat('\\').take(backslashes));
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_arg_passes_plain_arguments_through() {
        assert_eq!(quote_arg("--verbose".to_string()), "--verbose");
    }

    #[test]
    fn test_quote_arg_wraps_whitespace() {
        assert_eq!(
            quote_arg("C:\\Program Files\\x".to_string()),
            "\"C:\\Program Files\\x\""
        );
    }

    #[test]
    fn test_quote_arg_escapes_embedded_quotes() {
        assert_eq!(quote_arg("say \"hi\"".to_string()), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_quote_arg_doubles_trailing_backslashes() {
        assert_eq!(
            quote_arg("C:\\Program Files\\".to_string()),
            "\"C:\\Program Files\\\\\""
        );
    }

    #[test]
    fn test_quote_arg_quotes_empty_argument() {
        assert_eq!(quote_arg(String::new()), "\"\"");
    }
}
