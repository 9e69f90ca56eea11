pub mod config;
pub mod dns;
pub mod placeholder;
pub mod progress;
pub mod prompts;
pub mod status;
pub mod tenant;
pub mod upn;

use crate::clipboard::{CopyControl, Osc52Clipboard};
use crate::error::Result;
use serde::Serialize;

/// Copy a produced value and report whether it worked
pub(crate) fn copy_to_clipboard(text: &str) {
    let mut control = CopyControl::new();
    if control.copy(&Osc52Clipboard, text) {
        prompts::success(&format!("{} Copied to clipboard", control.icon()));
    } else {
        prompts::warning("Could not copy to clipboard");
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
