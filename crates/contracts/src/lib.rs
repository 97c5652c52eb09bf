//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Indexing Model
//! - Rows and columns are 1-based, matching the tabular store
//! - Snapshots are plain `Vec`s; convert with `index - 1` at the edge

mod blueprint;
mod cell;
mod error;
mod event;
mod message;
mod rule;
mod sink;
mod store;
mod strategy;
mod subscriber;

pub use blueprint::*;
pub use cell::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use rule::*;
pub use sink::*;
pub use store::TabularStore;
pub use strategy::{InterpretationStrategy, StrategyRegistry};
pub use subscriber::{DeliveryError, Subscriber};
