//! The individual admin tools. Each one is independent of the others.

pub mod dns;
pub mod placeholder;
pub mod status;
pub mod tenant;
pub mod upn;
