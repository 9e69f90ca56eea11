//! Microsoft 365 admin utilities
//!
//! Small, independent tools for Microsoft 365 administrators:
//!
//! - tenant ID lookup from an email address (OpenID discovery)
//! - user principal name generation
//! - links to the Microsoft service status dashboards
//! - MX / SPF / DKIM presence checks over DNS-over-HTTPS
//!
//! The tool logic lives in [`tools`] and only depends on the injected
//! [`http::Fetcher`] and [`clipboard::Clipboard`] traits. [`cmd`] wires the
//! tools to the command line and [`tui`] to a tabbed terminal UI.

pub mod clipboard;
pub mod cmd;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod tools;
pub mod tui;
