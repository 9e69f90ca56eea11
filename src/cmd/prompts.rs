//! Console prompts and status lines

use crate::error::Result;
use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};

/// Prompt for a value that may not be left empty
pub fn input_required(message: &str) -> Result<String> {
    let result: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .validate_with(|value: &String| -> std::result::Result<(), &'static str> {
            if value.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(result)
}

/// Use the given value, or ask for it
pub fn value_or_prompt(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => input_required(message),
    }
}

pub fn section_header(title: &str, description: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!("{}", description.dimmed());
    println!("{}", "─".repeat(60).dimmed());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_or_prompt_prefers_value() {
        let value = value_or_prompt(Some("jane@contoso.com".into()), "Email").unwrap();
        assert_eq!(value, "jane@contoso.com");
    }
}
