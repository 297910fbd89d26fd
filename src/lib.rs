//! townctl
//!
//! Address resolution and settings compliance for a town of role-tagged agent
//! sessions. The [`fleet`] module resolves address patterns to session names
//! and back; [`compliance`] scans settings files for drift and removes
//! misplaced copies; [`prune`] removes polecat branches nobody owns.

pub mod compliance;
pub mod config;
pub mod error;
pub mod fleet;
pub mod logging;
pub mod prune;
pub mod tooling;
pub mod topology;

pub use error::ApiError;
