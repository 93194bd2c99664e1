//! # Narrative Core
//!
//! The scripting side of TamaCovid. Designers write conditions and commands as
//! short strings inside dialogues, events and actions; this crate parses and
//! runs them against the `game_rules` state and sequences the day.
//!
//! ## Core Components
//!
//! - **expression**: Condition and command language plus its evaluator
//! - **dialogue**: Line-by-line playback of gated dialogues
//! - **events**: First-match dispatch of scripted start-of-day events
//! - **game_loop**: The day/activity/ending state machine and its presenter port
//! - **validate**: Authoring-time checks that report bad scripts
//!
//! ## Design Philosophy
//!
//! - **Forgiving at runtime**: A bad script reads as false or does nothing, and is logged
//! - **Strict in tooling**: The same problems surface as typed errors through `validate`
//! - **Reproducible**: Every random choice comes from an injectable, seedable RNG

pub mod dialogue;
pub mod events;
pub mod expression;
pub mod game_loop;
pub mod validate;

pub use dialogue::*;
pub use events::*;
pub use expression::*;
pub use game_loop::*;
pub use validate::*;
