//! Memory-matching card game engine.
//!
//! The engine owns every card instance in an arena and is driven by two kinds
//! of input: clicks from the host and the passage of time (`advance`). All
//! animation sequencing runs on a virtual-time [`scheduler::Scheduler`] so
//! hosts can render at whatever cadence they like.

pub mod config;
pub mod error;
pub mod flip;
pub mod game;
pub mod layout;
pub mod log;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::*;
pub use game::MemoryGame;
pub use layout::{Layout, Surface};
pub use types::*;
pub use view::*;
