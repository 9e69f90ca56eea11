//! Interactive terminal UI
//!
//! Every tool gets its own tab, mirroring the tabbed web page the tools
//! started out as. Network lookups run on the background worker in
//! [`tasks`] so the UI stays responsive while a request is in flight.

pub mod app;
pub mod tasks;

pub use app::run_tui;
