//! indent-detective - infer the indentation style of source text
//!
//! The [`inference`] module holds the detection algorithm. Everything else
//! connects it to a host: [`buffer`] and [`scopes`] provide lines and syntax
//! scopes, [`driver`] applies results to editors, [`registry`] tracks manual
//! overrides and [`config`] loads settings.

pub mod buffer;
pub mod config;
pub mod driver;
pub mod inference;
pub mod models;
pub mod registry;
pub mod scopes;

pub use driver::{Driver, Editor};
pub use inference::{InferenceConfig, InferenceEngine, SourceBuffer};
pub use models::{BufferId, Decision, IndentChoice, IndentLength, Whitelist};
pub use registry::ManualOverrideRegistry;
