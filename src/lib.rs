//! Connect four (workspace facade crate).
//!
//! This package exposes `connect_four::{types, core, agent}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use connect_four_agent as agent;
pub use connect_four_core as core;
pub use connect_four_types as types;
