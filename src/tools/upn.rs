//! User Principal Name generator

use crate::error::{Result, ToolsError};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpnInput {
    pub first: String,
    pub last: String,
    pub domain: String,
}

impl UpnInput {
    pub fn new(first: impl Into<String>, last: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            domain: domain.into(),
        }
    }

    /// All three fields filled in with something other than whitespace
    pub fn is_complete(&self) -> bool {
        [&self.first, &self.last, &self.domain]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Lowercase and drop everything outside `[a-z0-9]`
pub fn normalize_name_segment(segment: &str) -> String {
    segment
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// `first.last@domain`, with the domain taken verbatim
pub fn generate_upn(input: &UpnInput) -> Result<String> {
    if !input.is_complete() {
        return Err(ToolsError::InvalidInput(
            "first name, last name and domain are all required".into(),
        ));
    }

    Ok(format!(
        "{}.{}@{}",
        normalize_name_segment(&input.first),
        normalize_name_segment(&input.last),
        input.domain
    ))
}
