use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Interactive prompt error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("{0}")]
    ToolFailed(String),
}

pub type Result<T> = std::result::Result<T, ToolsError>;

/// Short description of an HTTP failure for debug logs.
///
/// Microsoft identity endpoints answer unknown domains with a JSON body
/// carrying `error` and `error_description`; surface those when present.
pub fn describe_http_failure(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let code = json.get("error").and_then(|c| c.as_str());
        let description = json.get("error_description").and_then(|d| d.as_str());

        if let Some(code) = code {
            let first_line = description
                .and_then(|d| d.lines().next())
                .unwrap_or("No description");
            return format!("HTTP {}: {}: {}", status, code, first_line);
        }
    }

    format!("HTTP {}: {}", status, body.trim())
}
