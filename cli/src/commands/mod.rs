//! CLI command implementations.

pub mod snipe;
