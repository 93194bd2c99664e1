//! # Game Rules
//!
//! The state side of TamaCovid: the stat and flag stores scripts operate on,
//! the authored content those scripts live in, configuration, and the
//! simulation mechanics the day loop calls into.
//! This crate holds data and rules only; the scripting language lives in
//! `narrative_core`.

pub mod config;
pub mod content;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use content::*;
pub use mechanics::*;
pub use world_state::*;
