//! Plain-text plots for the one-shot CLI.

pub mod ascii;

pub use ascii::*;
