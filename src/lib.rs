pub mod aggregate;
pub mod docs;
pub mod download;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod naming;
pub mod remote;
pub mod timefmt;
pub mod tui;

mod tui_shell;
