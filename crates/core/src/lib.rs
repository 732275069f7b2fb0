//! # BRX Core
//!
//! Domain types, traits, and error definitions for the BRX request pipeline.
//! This crate has **no framework dependencies**: it defines the domain model
//! that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Capabilities are defined as traits here and implemented in their own
//! crates. This enables:
//! - Swapping tool implementations without touching the pipeline
//! - Easy testing with stub tools and fake ledgers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod request;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PipelineError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use request::{Exchange, Request};
pub use tool::{Tool, ToolMode, ToolOrigin, ToolOutput, ToolRegistry};
