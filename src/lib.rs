//! `gw-viz` library crate.
//!
//! The binary (`gwviz`) is a thin wrapper around this library so that:
//!
//! - the generate/derive/render pipeline is testable without spawning processes
//! - the generator backend can be swapped behind a trait
//! - CLI and TUI front-ends share one code path

pub mod app;
pub mod backend;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod physics;
pub mod plot;
pub mod report;
pub mod tui;
